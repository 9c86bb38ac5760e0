pub mod nominatim;
pub mod popular;
pub mod traits;
pub mod types;

pub use nominatim::NominatimGeocoder;
pub use popular::popular_locations;
pub use traits::GeocoderTrait;
pub use types::{BoundingBox, GeocodeParams};
