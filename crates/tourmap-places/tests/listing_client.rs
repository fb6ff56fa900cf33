//! Integration tests for `ListingClient` using wiremock HTTP mocks.

use serde_json::json;
use tourmap_places::{ListingClient, PlacesError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> ListingClient {
    ListingClient::new(&format!("{base_url}/api"), 5).expect("client construction should not fail")
}

#[tokio::test]
async fn get_destination_returns_markers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/destinations/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Destination retrieved",
            "data": {
                "id": 12,
                "name": "Nusa Penida",
                "slug": "nusa-penida",
                "updated_at": "2026-03-01T10:00:00Z",
                "locations": [
                    { "id": 1, "name": "Kelingking Beach", "place_id": "ChIJ-kelingking", "latitude": "-8.7500", "longitude": "115.4744" },
                    { "id": 2, "name": "Broken Beach", "place_id": "ChIJ-broken", "latitude": -8.7302, "longitude": 115.4507 },
                    { "id": 3, "name": "Unmapped", "place_id": null, "latitude": null, "longitude": null }
                ]
            },
            "meta": null
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let destination = client.get_destination(12).await.expect("should parse");

    assert_eq!(destination.name, "Nusa Penida");
    assert!(destination.updated_at.is_some());
    let markers = destination.markers();
    assert_eq!(markers.len(), 2);
    assert_eq!(markers[0].place_id, "ChIJ-kelingking");
    assert!((markers[0].coordinate.lat - (-8.75)).abs() < 1e-9);
}

#[tokio::test]
async fn list_destinations_returns_page_meta() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/destinations"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "ok",
            "data": [
                { "id": 3, "name": "Ubud", "locations": [] },
                { "id": 4, "name": "Canggu" }
            ],
            "meta": { "current_page": 2, "last_page": 5, "per_page": 2, "total": 10 }
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let page = client.list_destinations(2).await.expect("should parse");

    assert_eq!(page.destinations.len(), 2);
    assert_eq!(page.destinations[1].name, "Canggu");
    let meta = page.meta.expect("meta present");
    assert_eq!(meta.current_page, 2);
    assert_eq!(meta.total, 10);
}

#[tokio::test]
async fn failed_envelope_is_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/destinations/99"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Destination not found",
            "data": null
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let result = client.get_destination(99).await;
    assert!(
        matches!(result, Err(PlacesError::Api(ref m)) if m == "Destination not found"),
        "{result:?}"
    );
}

#[tokio::test]
async fn not_found_status_is_http_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/destinations/5"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    assert!(matches!(
        client.get_destination(5).await,
        Err(PlacesError::Http(_))
    ));
}
