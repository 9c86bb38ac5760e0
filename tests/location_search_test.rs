// Debounce, short-query and stale-response behavior of `LocationSearch`,
// driven by a fake geocoder under paused tokio time.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use agriha::geocoding::{popular_locations, GeocodeParams, GeocoderTrait};
use agriha::models::{Location, LocationKind};
use agriha::search::{LocationSearch, SuggestionSource};
use agriha::{Error, Result};

// ── Fake geocoder ───────────────────────────────────────────────────

#[derive(Default)]
struct FakeGeocoder {
    calls: Mutex<Vec<String>>,
    count: AtomicUsize,
    /// Per-query response latency
    delays: HashMap<String, Duration>,
    fail: bool,
}

impl FakeGeocoder {
    fn with_delays(delays: &[(&str, u64)]) -> Self {
        Self {
            delays: delays
                .iter()
                .map(|(q, ms)| ((*q).to_string(), Duration::from_millis(*ms)))
                .collect(),
            ..Self::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

fn location(name: &str) -> Location {
    Location {
        id: format!("osm-{name}"),
        name: name.to_string(),
        city: Some("Kathmandu".into()),
        state: None,
        country: "Nepal".into(),
        latitude: 27.7,
        longitude: 85.3,
        description: None,
        kind: LocationKind::Neighborhood,
        property_count: None,
    }
}

#[async_trait]
impl GeocoderTrait for FakeGeocoder {
    async fn geocode(&self, query: &str) -> Result<Vec<Location>> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(query.to_string());
        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail {
            return Err(Error::Http { status: 503 });
        }
        Ok(vec![location(&format!("{query} result"))])
    }

    fn provider_name(&self) -> &'static str {
        "Fake"
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

type Picked = Arc<Mutex<Vec<Location>>>;

fn search_with(geocoder: Arc<FakeGeocoder>) -> (LocationSearch, Picked) {
    let picked: Picked = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&picked);
    let search = LocationSearch::new(
        geocoder,
        &GeocodeParams::default(),
        Arc::new(move |location: Location| sink.lock().unwrap().push(location)),
    );
    (search, picked)
}

async fn wait(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn short_queries_never_hit_the_network() {
    let geocoder = Arc::new(FakeGeocoder::default());
    let (search, _) = search_with(Arc::clone(&geocoder));

    search.input("t");
    search.input("th");
    search.input("  th  ");
    wait(1_000).await;

    assert_eq!(geocoder.count.load(Ordering::SeqCst), 0);
    let state = search.state();
    assert!(state.suggestions.is_empty());
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn typing_fast_issues_one_request_after_debounce() {
    let geocoder = Arc::new(FakeGeocoder::default());
    let (search, _) = search_with(Arc::clone(&geocoder));

    search.input("tha");
    wait(100).await;
    search.input("tham");
    wait(100).await;
    search.input("thamel");

    wait(250).await;
    assert_eq!(geocoder.count.load(Ordering::SeqCst), 0, "still inside debounce window");
    assert!(search.state().loading);

    wait(100).await;
    assert_eq!(geocoder.calls(), vec!["thamel".to_string()]);

    let state = search.state();
    assert_eq!(state.source, SuggestionSource::Geocoded);
    assert!(state.panel_open);
    assert!(!state.loading);
    assert_eq!(state.suggestions[0].name, "thamel result");
}

#[tokio::test(start_paused = true)]
async fn stale_response_does_not_overwrite_newer_results() {
    let geocoder = Arc::new(FakeGeocoder::with_delays(&[("thamel", 500), ("baneshwor", 50)]));
    let (search, _) = search_with(Arc::clone(&geocoder));

    search.input("thamel");
    wait(350).await; // "thamel" request is now in flight until t=800
    search.input("baneshwor");
    wait(1_000).await; // "baneshwor" lands at t=700, "thamel" at t=800

    assert_eq!(geocoder.calls(), vec!["thamel".to_string(), "baneshwor".to_string()]);
    let names: Vec<String> = search.state().suggestions.into_iter().map(|l| l.name).collect();
    assert_eq!(names, vec!["baneshwor result".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn empty_input_shows_popular_without_network() {
    let geocoder = Arc::new(FakeGeocoder::default());
    let (search, _) = search_with(Arc::clone(&geocoder));

    search.input("");
    wait(1_000).await;

    let state = search.state();
    assert_eq!(state.source, SuggestionSource::Popular);
    assert_eq!(state.suggestions, popular_locations());
    assert_eq!(geocoder.count.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn selecting_popular_location_fires_callback_immediately() {
    let geocoder = Arc::new(FakeGeocoder::default());
    let (search, picked) = search_with(geocoder);

    search.focus();
    assert!(search.select_index(0));

    let picked = picked.lock().unwrap().clone();
    let expected = &popular_locations()[0];
    assert_eq!(picked.len(), 1);
    assert_eq!(picked[0].coordinates(), expected.coordinates());

    let state = search.state();
    assert!(!state.panel_open);
    assert!(state.suggestions.is_empty());
}

#[tokio::test(start_paused = true)]
async fn geocoder_failure_degrades_to_empty_list() {
    let geocoder = Arc::new(FakeGeocoder {
        fail: true,
        ..FakeGeocoder::default()
    });
    let (search, picked) = search_with(geocoder);

    search.input("pokhara");
    wait(400).await;

    let state = search.state();
    assert!(state.suggestions.is_empty());
    assert!(!state.loading);
    assert!(picked.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn selection_discards_in_flight_results() {
    let geocoder = Arc::new(FakeGeocoder::with_delays(&[("lakeside", 200)]));
    let (search, picked) = search_with(geocoder);

    search.input("lakeside");
    wait(350).await; // request in flight
    search.select(location("Lakeside"));
    wait(500).await;

    assert_eq!(picked.lock().unwrap().len(), 1);
    let state = search.state();
    assert!(!state.panel_open);
    assert!(state.suggestions.is_empty());
    assert_eq!(state.query, "Lakeside");
}

#[tokio::test(start_paused = true)]
async fn clearing_the_box_wins_over_a_request_in_flight() {
    let geocoder = Arc::new(FakeGeocoder::with_delays(&[("thamel", 200)]));
    let (search, _) = search_with(Arc::clone(&geocoder));

    search.input("thamel");
    wait(350).await; // request in flight until t=500
    search.input("");
    wait(500).await;

    assert_eq!(geocoder.count.load(Ordering::SeqCst), 1);
    let state = search.state();
    assert_eq!(state.source, SuggestionSource::Popular);
    assert_eq!(state.suggestions, popular_locations());
    assert!(!state.loading);
}

#[tokio::test(start_paused = true)]
async fn dismissing_keeps_panel_closed_when_results_land() {
    let geocoder = Arc::new(FakeGeocoder::with_delays(&[("thamel", 200)]));
    let (search, _) = search_with(geocoder);

    search.input("thamel");
    wait(350).await;
    search.dismiss();
    wait(500).await;

    let state = search.state();
    assert!(!state.panel_open);
    assert!(state.suggestions.is_empty());
}
