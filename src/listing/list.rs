use tracing::debug;

use crate::listing::pagination::{PageSizes, Paginator};
use crate::models::Property;
use crate::selection::ActivePropertyStore;

/// Card the list should bring into view after a selection change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollTarget {
    pub property_id: String,
    pub page: usize,
    /// Position within the page
    pub index: usize,
}

/// Paged property grid
pub struct PropertyList {
    properties: Vec<Property>,
    sizes: PageSizes,
    pager: Paginator,
}

impl PropertyList {
    pub fn new(properties: Vec<Property>, sizes: PageSizes, viewport_width_px: u32) -> Self {
        let pager = Paginator::new(properties.len(), sizes.for_width(viewport_width_px));
        Self {
            properties,
            sizes,
            pager,
        }
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn set_properties(&mut self, properties: Vec<Property>) {
        self.pager = Paginator::new(properties.len(), self.pager.page_size());
        self.properties = properties;
    }

    pub fn pager(&self) -> &Paginator {
        &self.pager
    }

    pub fn pager_mut(&mut self) -> &mut Paginator {
        &mut self.pager
    }

    pub fn resize(&mut self, viewport_width_px: u32) {
        self.pager.set_page_size(self.sizes.for_width(viewport_width_px));
    }

    /// Cards on the current page.
    pub fn visible(&self) -> &[Property] {
        self.properties.get(self.pager.range()).unwrap_or_default()
    }

    /// A card was clicked: make it the active property.
    pub fn click_card(&self, property_id: &str, store: &ActivePropertyStore) -> bool {
        if !self.properties.iter().any(|p| p.id == property_id) {
            return false;
        }
        store.set(Some(property_id.to_string()));
        true
    }

    /// Follow a selection change: switch to the card's page and report where it sits.
    pub fn scroll_to(&mut self, property_id: Option<&str>) -> Option<ScrollTarget> {
        let id = property_id?;
        let Some(position) = self.properties.iter().position(|p| p.id == id) else {
            debug!("Active property {} is not in the list", id);
            return None;
        };

        let page = self.pager.page_of(position);
        self.pager.go_to(page);
        Some(ScrollTarget {
            property_id: id.to_string(),
            page,
            index: position - self.pager.range().start,
        })
    }
}
