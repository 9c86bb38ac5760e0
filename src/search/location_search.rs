//! Debounced, generation-guarded location search.
//!
//! Every call to [`LocationSearch::input`] supersedes the previous one: the
//! pending debounce timer is aborted and the generation counter is bumped.
//! A lookup that was already sent is left to finish, but its response is
//! dropped unless its generation is still the latest when it lands.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::geocoding::{popular_locations, GeocodeParams, GeocoderTrait};
use crate::models::Location;
use crate::search::fuzzy;

/// Callback invoked with the location the user picked.
pub type OnSelect = Arc<dyn Fn(Location) + Send + Sync>;

/// Where the current suggestions came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionSource {
    /// Static list shown for an empty query
    Popular,
    /// Ranked geocoder hits
    Geocoded,
}

/// Observable state of the search box and its suggestion panel
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub suggestions: Vec<Location>,
    pub source: SuggestionSource,
    pub panel_open: bool,
    /// A lookup is waiting on its debounce timer or on the network
    pub loading: bool,
}

impl Default for SearchState {
    fn default() -> Self {
        Self {
            query: String::new(),
            suggestions: Vec::new(),
            source: SuggestionSource::Popular,
            panel_open: false,
            loading: false,
        }
    }
}

pub struct LocationSearch {
    geocoder: Arc<dyn GeocoderTrait>,
    debounce: Duration,
    min_query_len: usize,
    state: Arc<watch::Sender<SearchState>>,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
    on_select: OnSelect,
}

impl LocationSearch {
    pub fn new(geocoder: Arc<dyn GeocoderTrait>, params: &GeocodeParams, on_select: OnSelect) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            geocoder,
            debounce: Duration::from_millis(params.debounce_ms),
            min_query_len: params.min_query_len,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
            on_select,
        }
    }

    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// The search box gained focus. An empty box shows popular locations.
    pub fn focus(&self) {
        self.state.send_modify(|state| {
            if state.query.trim().is_empty() {
                state.suggestions = popular_locations();
                state.source = SuggestionSource::Popular;
            }
            state.panel_open = true;
        });
    }

    /// Close the suggestion panel without selecting anything.
    pub fn dismiss(&self) {
        self.cancel_pending();
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|state| {
            state.panel_open = false;
            state.loading = false;
        });
    }

    /// Handle a change of the search text. Must be called inside a tokio runtime.
    pub fn input(&self, text: &str) {
        self.cancel_pending();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let trimmed = text.trim();

        if trimmed.is_empty() {
            self.state.send_modify(|state| {
                state.query = text.to_string();
                state.suggestions = popular_locations();
                state.source = SuggestionSource::Popular;
                state.panel_open = true;
                state.loading = false;
            });
            return;
        }

        if trimmed.chars().count() < self.min_query_len {
            self.state.send_modify(|state| {
                state.query = text.to_string();
                state.suggestions.clear();
                state.source = SuggestionSource::Geocoded;
                state.loading = false;
            });
            return;
        }

        self.state.send_modify(|state| {
            state.query = text.to_string();
            state.loading = true;
        });

        let query = trimmed.to_string();
        let debounce = self.debounce;
        let geocoder = Arc::clone(&self.geocoder);
        let state = Arc::clone(&self.state);
        let latest = Arc::clone(&self.generation);

        let timer = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            // Detached so a later keystroke only cancels the timer, never a sent request.
            tokio::spawn(async move {
                debug!(generation, "Issuing geocode for {:?}", query);
                let locations = match geocoder.geocode(&query).await {
                    Ok(locations) => fuzzy::rank(&query, locations),
                    Err(err) => {
                        warn!("Geocoding {:?} via {} failed: {}", query, geocoder.provider_name(), err);
                        Vec::new()
                    }
                };

                // Checked under the watch lock: newer input bumps the
                // generation before it takes the lock for its own write.
                let applied = state.send_if_modified(|state| {
                    if latest.load(Ordering::SeqCst) != generation {
                        return false;
                    }
                    state.suggestions = locations;
                    state.source = SuggestionSource::Geocoded;
                    state.panel_open = true;
                    state.loading = false;
                    true
                });
                if !applied {
                    debug!(generation, "Discarding stale results for {:?}", query);
                }
            });
        });

        if let Ok(mut pending) = self.pending.lock() {
            *pending = Some(timer);
        }
    }

    /// Pick a suggestion: notify the callback, then clear the panel.
    pub fn select(&self, location: Location) {
        self.cancel_pending();
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.state.send_modify(|state| {
            state.query = location.name.clone();
            state.suggestions.clear();
            state.panel_open = false;
            state.loading = false;
        });
        (self.on_select)(location);
    }

    /// Pick the `index`-th current suggestion. Returns `false` if out of range.
    pub fn select_index(&self, index: usize) -> bool {
        let chosen = self.state.borrow().suggestions.get(index).cloned();
        match chosen {
            Some(location) => {
                self.select(location);
                true
            }
            None => false,
        }
    }

    fn cancel_pending(&self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(timer) = pending.take() {
                timer.abort();
            }
        }
    }
}

impl Drop for LocationSearch {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
