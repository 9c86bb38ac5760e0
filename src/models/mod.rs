use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Amenities offered as toggles on the listing form.
pub const AMENITIES: &[&str] = &[
    "Parking",
    "Garden",
    "Balcony",
    "Swimming Pool",
    "Gym",
    "Security",
    "Elevator",
    "Furnished",
    "Water Supply",
    "Backup Power",
];

/// A validated latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Returns `None` unless both values are finite and within range.
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some(Self { lat, lng })
    }

    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Option<Self> {
        Self::new(lat?, lng?)
    }
}

/// Kind of property being listed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PropertyType {
    #[default]
    House,
    Apartment,
    Land,
    Commercial,
    Villa,
}

/// Core property view model, as returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub property_type: PropertyType,
    pub price: i64,
    #[serde(default)]
    pub bedrooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    /// Floor area in square feet
    pub area: Option<f64>,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default)]
    pub for_sale: bool,
    #[serde(default)]
    pub for_rent: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    pub agent_id: Option<String>,
    pub average_rating: Option<f32>,
    pub created_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl Property {
    /// Coordinates, if present and valid. Properties without them get no map marker.
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }
}

/// Kind of place a [`Location`] refers to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Neighborhood,
    Landmark,
    City,
}

/// A place the user can search for and fly the map to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub description: Option<String>,
    pub kind: LocationKind,
    pub property_count: Option<u32>,
}

impl Location {
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// "Name, City, State" without repeated or empty parts.
    pub fn label(&self) -> String {
        let mut parts: Vec<&str> = vec![self.name.as_str()];
        for part in [self.city.as_deref(), self.state.as_deref()]
            .into_iter()
            .flatten()
        {
            if !part.is_empty() && !parts.contains(&part) {
                parts.push(part);
            }
        }
        parts.join(", ")
    }
}

/// Form-side shape sent with create/update mutations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PropertyInput {
    pub name: String,
    pub property_type: PropertyType,
    pub price: i64,
    pub bedrooms: u32,
    pub bathrooms: u32,
    pub area: Option<f64>,
    pub address: String,
    pub city: String,
    pub state: String,
    pub description: String,
    pub amenities: Vec<String>,
    pub for_sale: bool,
    pub for_rent: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<&Property> for PropertyInput {
    fn from(property: &Property) -> Self {
        Self {
            name: property.name.clone(),
            property_type: property.property_type,
            price: property.price,
            bedrooms: property.bedrooms,
            bathrooms: property.bathrooms,
            area: property.area,
            address: property.address.clone(),
            city: property.city.clone(),
            state: property.state.clone(),
            description: property.description.clone(),
            amenities: property.amenities.clone(),
            for_sale: property.for_sale,
            for_rent: property.for_rent,
            latitude: property.latitude,
            longitude: property.longitude,
        }
    }
}

/// A buyer's review shown on the property detail page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: String,
    pub property_id: String,
    pub author_name: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Buyer,
    Agent,
    Admin,
}

/// The signed-in account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn property(id: &str, lat: Option<f64>, lng: Option<f64>) -> Property {
        Property {
            id: id.to_string(),
            name: format!("Property {id}"),
            property_type: PropertyType::House,
            price: 25_000_000,
            bedrooms: 3,
            bathrooms: 2,
            area: Some(1_800.0),
            address: "Jhamsikhel Road".to_string(),
            city: "Lalitpur".to_string(),
            state: "Bagmati".to_string(),
            description: String::new(),
            amenities: vec!["Parking".to_string()],
            images: vec![],
            latitude: lat,
            longitude: lng,
            for_sale: true,
            for_rent: false,
            is_active: true,
            is_featured: false,
            agent_id: None,
            average_rating: None,
            created_at: None,
        }
    }
}
