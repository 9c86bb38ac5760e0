// Integration tests for `NominatimGeocoder` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use agriha::geocoding::{GeocodeParams, GeocoderTrait, NominatimGeocoder};
use agriha::models::LocationKind;
use agriha::Error;

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, NominatimGeocoder) {
    let server = MockServer::start().await;
    let params = GeocodeParams {
        base_url: Url::parse(&format!("{}/", server.uri())).unwrap(),
        ..GeocodeParams::default()
    };
    let geocoder = NominatimGeocoder::with_params(params).unwrap();
    (server, geocoder)
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_geocode_scoped_request_maps_results() {
    let (server, geocoder) = setup().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "baneshwor"))
        .and(query_param("countrycodes", "np"))
        .and(query_param("viewbox", "80.05,30.45,88.2,26.34"))
        .and(query_param("bounded", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "place_id": 11,
                "lat": "27.6915",
                "lon": "85.3420",
                "display_name": "Baneshwor, Kathmandu, Bagmati Province, Nepal",
                "name": "Baneshwor",
                "type": "suburb",
                "address": { "suburb": "Baneshwor", "city": "Kathmandu", "state": "Bagmati Province", "country": "Nepal" }
            },
            {
                "place_id": 12,
                "lat": "27.6890",
                "lon": "85.3370",
                "display_name": "New Baneshwor Chowk, Kathmandu, Nepal",
                "name": "New Baneshwor Chowk",
                "type": "junction",
                "address": { "city": "Kathmandu", "country": "Nepal" }
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let locations = geocoder.geocode("baneshwor").await.unwrap();

    assert_eq!(locations.len(), 2);
    assert_eq!(locations[0].name, "Baneshwor");
    assert_eq!(locations[0].kind, LocationKind::Neighborhood);
    assert_eq!(locations[0].state.as_deref(), Some("Bagmati Province"));
    assert_eq!(locations[1].kind, LocationKind::Landmark);
}

#[tokio::test]
async fn test_geocode_http_error() {
    let (server, geocoder) = setup().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
        .mount(&server)
        .await;

    let result = geocoder.geocode("thamel").await;
    assert!(
        matches!(result, Err(Error::Http { status: 429 })),
        "expected Http error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_geocode_malformed_body() {
    let (server, geocoder) = setup().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = geocoder.geocode("thamel").await;
    assert!(matches!(result, Err(Error::Decode(_))), "got: {result:?}");
}
