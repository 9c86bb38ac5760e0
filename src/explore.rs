//! Map-based explore page.
//!
//! Wires the pieces together: a picked location flies the map; a clicked
//! card or marker writes the shared selection, which the map follows in its
//! own task and the list follows by scrolling the card into view.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::geocoding::GeocoderTrait;
use crate::listing::{BottomSheet, PropertyList, ScrollTarget};
use crate::map::{follow, MapCommand, MapView};
use crate::models::{Location, Property};
use crate::search::LocationSearch;
use crate::selection::ActivePropertyStore;

pub struct Explore {
    pub store: ActivePropertyStore,
    pub search: LocationSearch,
    pub list: PropertyList,
    pub sheet: BottomSheet,
    map: MapView,
    location: watch::Receiver<Option<Location>>,
    map_commands: mpsc::UnboundedReceiver<MapCommand>,
    map_task: JoinHandle<()>,
}

impl Explore {
    /// Must be called inside a tokio runtime; the map follower is spawned here.
    pub fn new(
        config: &Config,
        geocoder: Arc<dyn GeocoderTrait>,
        properties: Vec<Property>,
        viewport_width_px: u32,
    ) -> Self {
        let store = ActivePropertyStore::new();
        let (location_tx, location_rx) = watch::channel(None);

        let on_select = Arc::new(move |location: Location| {
            location_tx.send_replace(Some(location));
        });
        let search = LocationSearch::new(geocoder, &config.geocoder, on_select);

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let map = MapView::new(config.map.clone(), properties.clone());
        let map_task = tokio::spawn(follow(map.clone(), store.subscribe(), location_rx.clone(), command_tx));

        Self {
            list: PropertyList::new(properties, config.listing, viewport_width_px),
            sheet: BottomSheet::new(),
            map,
            store,
            search,
            location: location_rx,
            map_commands: command_rx,
            map_task,
        }
    }

    /// Card click: select it, then report where the list should scroll.
    pub fn click_card(&mut self, property_id: &str) -> Option<ScrollTarget> {
        if !self.list.click_card(property_id, &self.store) {
            return None;
        }
        self.sync_list()
    }

    /// Marker click on the map; the list follows the same way.
    pub fn click_marker(&mut self, property_id: &str) -> Option<ScrollTarget> {
        if !self.map.click_marker(property_id, &self.store) {
            return None;
        }
        self.sync_list()
    }

    /// Viewport width changed; the page size follows the breakpoints.
    pub fn resize(&mut self, viewport_width_px: u32) -> Option<ScrollTarget> {
        self.list.resize(viewport_width_px);
        self.sync_list()
    }

    /// Bring the list in line with whatever the selection currently holds.
    pub fn sync_list(&mut self) -> Option<ScrollTarget> {
        let active = self.store.get();
        self.list.scroll_to(active.as_deref())
    }

    pub fn selected_location(&self) -> Option<Location> {
        self.location.borrow().clone()
    }

    /// Next camera command for the renderer; `None` once the map task ends.
    pub async fn next_map_command(&mut self) -> Option<MapCommand> {
        self.map_commands.recv().await
    }

    pub fn focus_search(&mut self) {
        self.sheet.search_focused();
        self.search.focus();
    }

    pub fn blur_search(&mut self) {
        self.sheet.search_blurred();
        self.search.dismiss();
    }
}

impl Drop for Explore {
    fn drop(&mut self) {
        self.map_task.abort();
    }
}
