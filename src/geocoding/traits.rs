use crate::error::Result;
use crate::models::Location;
use async_trait::async_trait;

/// Common trait for free-text place lookups
/// Lets the search flow run against Nominatim in production and fakes in tests
#[async_trait]
pub trait GeocoderTrait: Send + Sync {
    /// Resolve a free-text query into candidate locations
    async fn geocode(&self, query: &str) -> Result<Vec<Location>>;

    /// Get the name of the geocoding provider
    fn provider_name(&self) -> &'static str;
}
