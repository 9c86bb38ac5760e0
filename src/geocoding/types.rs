use serde::{Deserialize, Serialize};
use url::Url;

/// Geographic rectangle geocoding lookups are restricted to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// Nepal.
    pub const NEPAL: Self = Self {
        west: 80.05,
        south: 26.34,
        east: 88.20,
        north: 30.45,
    };

    /// Nominatim `viewbox` order: `x1,y1,x2,y2` = west,north,east,south.
    pub fn to_viewbox(&self) -> String {
        format!("{},{},{},{}", self.west, self.north, self.east, self.south)
    }

    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (self.south..=self.north).contains(&lat) && (self.west..=self.east).contains(&lng)
    }
}

/// Parameters for geocoding lookups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeParams {
    /// Nominatim-compatible base URL
    pub base_url: Url,
    /// ISO 3166-1 alpha-2 country filter
    pub country_code: String,
    pub bounding_box: BoundingBox,
    /// Maximum results requested per lookup
    pub limit: u32,
    /// Nominatim's usage policy requires an identifying user agent
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Quiet period after the last keystroke before a lookup is issued
    pub debounce_ms: u64,
    /// Shorter (trimmed) queries never reach the network
    pub min_query_len: usize,
}

impl Default for GeocodeParams {
    fn default() -> Self {
        Self {
            base_url: Url::parse("https://nominatim.openstreetmap.org/")
                .expect("static geocoder URL is valid"),
            country_code: "np".to_string(),
            bounding_box: BoundingBox::NEPAL,
            limit: 8,
            user_agent: concat!("agriha/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 10,
            debounce_ms: 300,
            min_query_len: 3,
        }
    }
}

/// Raw search hit as returned by Nominatim with `addressdetails=1`
#[derive(Debug, Clone, Deserialize)]
pub struct NominatimPlace {
    pub place_id: u64,
    /// Coordinates arrive as strings
    pub lat: String,
    pub lon: String,
    pub display_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub place_type: Option<String>,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub address: NominatimAddress,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimAddress {
    pub neighbourhood: Option<String>,
    pub suburb: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub municipality: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

impl NominatimAddress {
    /// Nominatim puts the settlement under whichever key matches its rank.
    pub fn settlement(&self) -> Option<&str> {
        self.city
            .as_deref()
            .or(self.town.as_deref())
            .or(self.village.as_deref())
            .or(self.municipality.as_deref())
    }
}
