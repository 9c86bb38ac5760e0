use crate::error::{Error, Result};
use crate::geocoding::traits::GeocoderTrait;
use crate::geocoding::types::{GeocodeParams, NominatimPlace};
use crate::models::{Location, LocationKind};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Nominatim geocoder, scoped to a bounding box and country
pub struct NominatimGeocoder {
    client: Client,
    params: GeocodeParams,
}

impl NominatimGeocoder {
    /// Create a geocoder with default parameters (Nepal, public Nominatim)
    pub fn new() -> Result<Self> {
        Self::with_params(GeocodeParams::default())
    }

    /// Create a geocoder with custom parameters
    pub fn with_params(params: GeocodeParams) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(params.timeout_secs))
            .user_agent(params.user_agent.clone())
            .build()?;

        Ok(Self { client, params })
    }

    pub fn params(&self) -> &GeocodeParams {
        &self.params
    }

    fn search_url(&self, query: &str) -> Result<url::Url> {
        let mut url = self.params.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::Validation(format!("Geocoder base URL {} cannot take a path", self.params.base_url)))?
            .pop_if_empty()
            .push("search");
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("q", query)
            .append_pair("addressdetails", "1")
            .append_pair("limit", &self.params.limit.to_string())
            .append_pair("countrycodes", &self.params.country_code)
            .append_pair("viewbox", &self.params.bounding_box.to_viewbox())
            .append_pair("bounded", "1");
        Ok(url)
    }
}

/// Map a raw Nominatim hit into a [`Location`]. Hits with unparseable
/// coordinates are dropped.
pub(crate) fn place_to_location(place: NominatimPlace) -> Option<Location> {
    let latitude: f64 = place.lat.trim().parse().ok()?;
    let longitude: f64 = place.lon.trim().parse().ok()?;

    let kind = match place.place_type.as_deref() {
        Some("neighbourhood" | "suburb" | "quarter" | "residential") => LocationKind::Neighborhood,
        Some("city" | "town" | "village" | "municipality" | "administrative") => LocationKind::City,
        _ => LocationKind::Landmark,
    };

    // Prefer the short name; fall back to the first display-name segment.
    let name = place
        .name
        .filter(|n| !n.is_empty())
        .or_else(|| {
            place
                .display_name
                .split(',')
                .next()
                .map(|s| s.trim().to_string())
        })
        .unwrap_or_default();

    let address = place.address;
    Some(Location {
        id: format!("osm-{}", place.place_id),
        name,
        city: address.settlement().map(str::to_string),
        state: address.state.clone(),
        country: address.country.clone().unwrap_or_else(|| "Nepal".to_string()),
        latitude,
        longitude,
        description: Some(place.display_name),
        kind,
        property_count: None,
    })
}

#[async_trait]
impl GeocoderTrait for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<Location>> {
        let url = self.search_url(query)?;
        debug!("Geocoding {:?} via {}", query, url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            warn!("Nominatim returned status: {}", response.status());
            return Err(Error::Http {
                status: response.status().as_u16(),
            });
        }

        let body = response.text().await?;
        let places: Vec<NominatimPlace> = serde_json::from_str(&body)?;
        let total = places.len();

        let locations: Vec<Location> = places.into_iter().filter_map(place_to_location).collect();

        if locations.len() < total {
            debug!("Dropped {} hits with invalid coordinates", total - locations.len());
        }
        info!("Geocoded {:?} to {} locations", query, locations.len());

        Ok(locations)
    }

    fn provider_name(&self) -> &'static str {
        "Nominatim"
    }
}
