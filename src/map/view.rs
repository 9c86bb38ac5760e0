//! Map view model.
//!
//! Holds the markers for the current property set and turns the two
//! independent triggers (active property, selected location) into camera
//! commands for whatever draws the map. Fly commands are never cancelled;
//! two quick selections yield two overlapping animations.

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::map::bounds::LatLngBounds;
use crate::models::{Coordinates, Location, Property};
use crate::selection::{ActivePropertyStore, Selection};

/// XYZ raster tile source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileLayer {
    /// Template with `{z}`, `{x}`, `{y}` placeholders
    pub url_template: String,
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "© OpenStreetMap contributors".to_string(),
        }
    }
}

impl TileLayer {
    pub fn tile_url(&self, z: u8, x: u32, y: u32) -> String {
        self.url_template
            .replace("{z}", &z.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapSettings {
    pub tiles: TileLayer,
    pub default_center: Coordinates,
    pub default_zoom: f64,
    pub property_zoom: f64,
    pub property_fly_secs: f64,
    pub location_zoom: f64,
    pub location_fly_secs: f64,
    pub fit_padding_px: u32,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            tiles: TileLayer::default(),
            // Kathmandu
            default_center: Coordinates {
                lat: 27.7172,
                lng: 85.3240,
            },
            default_zoom: 12.0,
            property_zoom: 16.0,
            property_fly_secs: 1.0,
            location_zoom: 14.0,
            location_fly_secs: 1.5,
            fit_padding_px: 50,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Property,
    /// The highlighted property: drawn larger and in the accent color
    ActiveProperty,
    /// The place picked in the location search
    SelectedLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// Property id, or location id for `SelectedLocation`
    pub id: String,
    pub position: Coordinates,
    pub kind: MarkerKind,
    pub label: String,
}

impl Marker {
    pub fn size_px(&self) -> u32 {
        match self.kind {
            MarkerKind::Property => 28,
            MarkerKind::ActiveProperty => 40,
            MarkerKind::SelectedLocation => 34,
        }
    }

    pub fn color(&self) -> &'static str {
        match self.kind {
            MarkerKind::Property => "#1f2937",
            MarkerKind::ActiveProperty => "#16a34a",
            MarkerKind::SelectedLocation => "#dc2626",
        }
    }
}

/// Camera instruction for the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MapCommand {
    FitBounds { bounds: LatLngBounds, padding_px: u32 },
    SetView { center: Coordinates, zoom: f64 },
    FlyTo { center: Coordinates, zoom: f64, duration_secs: f64 },
}

#[derive(Debug, Clone)]
pub struct MapView {
    settings: MapSettings,
    properties: Vec<Property>,
    active_id: Option<String>,
    selected_location: Option<Location>,
}

impl MapView {
    pub fn new(settings: MapSettings, properties: Vec<Property>) -> Self {
        Self {
            settings,
            properties,
            active_id: None,
            selected_location: None,
        }
    }

    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    pub fn set_properties(&mut self, properties: Vec<Property>) {
        self.properties = properties;
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active_id.as_deref()
    }

    /// One marker per property with valid coordinates, plus the selected location.
    pub fn markers(&self) -> Vec<Marker> {
        let mut markers: Vec<Marker> = self
            .properties
            .iter()
            .filter_map(|property| {
                let position = property.coordinates()?;
                let kind = if self.active_id.as_deref() == Some(property.id.as_str()) {
                    MarkerKind::ActiveProperty
                } else {
                    MarkerKind::Property
                };
                Some(Marker {
                    id: property.id.clone(),
                    position,
                    kind,
                    label: property.name.clone(),
                })
            })
            .collect();

        if let Some(location) = &self.selected_location {
            if let Some(position) = location.coordinates() {
                markers.push(Marker {
                    id: location.id.clone(),
                    position,
                    kind: MarkerKind::SelectedLocation,
                    label: location.label(),
                });
            }
        }

        markers
    }

    /// Initial camera: fit every marker, or the default view when there are none.
    pub fn mount(&self) -> MapCommand {
        match LatLngBounds::from_points(self.markers().into_iter().map(|m| m.position)) {
            Some(bounds) => MapCommand::FitBounds {
                bounds,
                padding_px: self.settings.fit_padding_px,
            },
            None => MapCommand::SetView {
                center: self.settings.default_center,
                zoom: self.settings.default_zoom,
            },
        }
    }

    /// React to a new active property. Ids without a marker restyle nothing and move nothing.
    pub fn on_active_property_changed(&mut self, property_id: Option<String>) -> Option<MapCommand> {
        self.active_id = property_id;
        let id = self.active_id.as_deref()?;
        let center = self
            .properties
            .iter()
            .find(|p| p.id == id)
            .and_then(Property::coordinates);

        if center.is_none() {
            debug!("Active property {} has no marker on this map", id);
        }

        center.map(|center| MapCommand::FlyTo {
            center,
            zoom: self.settings.property_zoom,
            duration_secs: self.settings.property_fly_secs,
        })
    }

    pub fn on_location_selected(&mut self, location: Option<Location>) -> Option<MapCommand> {
        self.selected_location = location;
        let center = self.selected_location.as_ref()?.coordinates()?;
        Some(MapCommand::FlyTo {
            center,
            zoom: self.settings.location_zoom,
            duration_secs: self.settings.location_fly_secs,
        })
    }

    /// Whether `property_id` has a marker; properties without valid coordinates do not.
    pub fn has_marker(&self, property_id: &str) -> bool {
        self.properties
            .iter()
            .any(|p| p.id == property_id && p.coordinates().is_some())
    }

    /// Marker clicks report back to the shared selection.
    pub fn click_marker(&self, property_id: &str, store: &ActivePropertyStore) -> bool {
        if !self.has_marker(property_id) {
            return false;
        }
        store.set(Some(property_id.to_string()));
        true
    }
}

/// Drive `view` from the selection store and the location channel, emitting
/// camera commands until either input or the output closes.
pub async fn follow(
    mut view: MapView,
    mut selection: watch::Receiver<Selection>,
    mut location: watch::Receiver<Option<Location>>,
    commands: mpsc::UnboundedSender<MapCommand>,
) {
    if commands.send(view.mount()).is_err() {
        return;
    }

    loop {
        let command = tokio::select! {
            changed = selection.changed() => {
                if changed.is_err() {
                    break;
                }
                let id = selection.borrow_and_update().property_id.clone();
                view.on_active_property_changed(id)
            }
            changed = location.changed() => {
                if changed.is_err() {
                    break;
                }
                let picked = location.borrow_and_update().clone();
                view.on_location_selected(picked)
            }
        };

        if let Some(command) = command {
            if commands.send(command).is_err() {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::property;
    use crate::models::LocationKind;

    fn view() -> MapView {
        MapView::new(
            MapSettings::default(),
            vec![
                property("a", Some(27.70), Some(85.30)),
                property("b", Some(27.68), Some(85.32)),
                property("no-coords", None, None),
                property("bad", Some(120.0), Some(85.0)),
            ],
        )
    }

    #[test]
    fn markers_skip_invalid_coordinates_and_style_active() {
        let mut view = view();
        assert_eq!(view.markers().len(), 2);

        view.on_active_property_changed(Some("b".into()));
        let markers = view.markers();
        let active: Vec<_> = markers.iter().filter(|m| m.kind == MarkerKind::ActiveProperty).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, "b");
        assert!(active[0].size_px() > markers[0].size_px());
    }

    #[test]
    fn mount_fits_markers_or_uses_default() {
        match view().mount() {
            MapCommand::FitBounds { bounds, padding_px } => {
                assert_eq!(padding_px, 50);
                assert!((bounds.north_east.lat - 27.70).abs() < 1e-9);
            }
            other => panic!("expected FitBounds, got {other:?}"),
        }

        let empty = MapView::new(MapSettings::default(), vec![]);
        assert!(matches!(empty.mount(), MapCommand::SetView { zoom, .. } if (zoom - 12.0).abs() < 1e-9));
    }

    #[test]
    fn triggers_use_their_own_zoom_and_duration() {
        let mut view = view();
        let fly_property = view.on_active_property_changed(Some("a".into())).unwrap();
        assert_eq!(
            fly_property,
            MapCommand::FlyTo {
                center: Coordinates { lat: 27.70, lng: 85.30 },
                zoom: 16.0,
                duration_secs: 1.0,
            }
        );

        let location = Location {
            id: "popular-lakeside".into(),
            name: "Lakeside".into(),
            city: Some("Pokhara".into()),
            state: None,
            country: "Nepal".into(),
            latitude: 28.2096,
            longitude: 83.9580,
            description: None,
            kind: LocationKind::Neighborhood,
            property_count: None,
        };
        let fly_location = view.on_location_selected(Some(location)).unwrap();
        assert!(matches!(fly_location, MapCommand::FlyTo { zoom, duration_secs, .. }
            if (zoom - 14.0).abs() < 1e-9 && (duration_secs - 1.5).abs() < 1e-9));
        assert!(view.markers().iter().any(|m| m.kind == MarkerKind::SelectedLocation));
    }

    #[test]
    fn unknown_or_markerless_ids_do_not_move_camera() {
        let mut view = view();
        assert!(view.on_active_property_changed(Some("ghost".into())).is_none());
        assert!(view.on_active_property_changed(Some("no-coords".into())).is_none());
        assert!(view.on_active_property_changed(None).is_none());
    }

    #[test]
    fn marker_click_sets_selection() {
        let view = view();
        let store = ActivePropertyStore::new();
        assert!(view.click_marker("a", &store));
        assert_eq!(store.get().as_deref(), Some("a"));
        assert!(!view.click_marker("ghost", &store));
        assert!(!view.click_marker("no-coords", &store));
        assert!(!view.click_marker("bad", &store));
        assert_eq!(store.get().as_deref(), Some("a"));
    }

    #[test]
    fn tile_url_fills_template() {
        let tiles = TileLayer::default();
        assert_eq!(tiles.tile_url(12, 3017, 1715), "https://tile.openstreetmap.org/12/3017/1715.png");
    }
}
