pub mod bounds;
pub mod view;

pub use bounds::LatLngBounds;
pub use view::{follow, MapCommand, MapSettings, MapView, Marker, MarkerKind, TileLayer};
