//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: upstream pages → aggregation → normalized
//! response, through both the service API and the HTTP router.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use spotify_proxy::cli::{router, AppState};
use spotify_proxy::fetch::HttpPageFetcher;
use spotify_proxy::http::HttpClient;
use spotify_proxy::{
    AggregationConfig, AggregationPolicy, Aggregator, Error, ProxyConfig, SpotifyService,
};
use std::sync::Arc;
use std::time::Duration;
use test_case::test_case;
use tower::ServiceExt;
use url::Url;
use wiremock::matchers::{header as header_matcher, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helpers
// ============================================================================

fn saved_album(index: usize) -> Value {
    json!({
        "added_at": format!("2024-01-{:02}T00:00:00Z", index % 28 + 1),
        "album": {
            "id": format!("album-{index}"),
            "name": format!("Album {index}"),
            "artists": [{ "name": "Artist" }],
            "release_date": "2020-01-01",
            "total_tracks": 10,
            "images": [{ "url": format!("https://i.scdn.co/image/{index}") }],
            "external_urls": { "spotify": format!("https://open.spotify.com/album/{index}") }
        }
    })
}

/// Mount one page per offset of a saved-albums collection of `total` items
///
/// Each page carries an absolute `next` URL so both policies can walk it.
async fn mount_library(server: &MockServer, total: usize, page_size: usize) {
    let mut offset = 0;
    loop {
        let end = (offset + page_size).min(total);
        let items: Vec<Value> = (offset..end).map(saved_album).collect();
        let next = (end < total).then(|| {
            format!(
                "{}/v1/me/albums?offset={end}&limit={page_size}",
                server.uri()
            )
        });

        Mock::given(method("GET"))
            .and(path("/v1/me/albums"))
            .and(query_param("offset", offset.to_string()))
            .and(header_matcher("Authorization", "Bearer user-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": items,
                "total": total,
                "next": next
            })))
            .expect(1)
            .mount(server)
            .await;

        offset = end;
        if offset >= total {
            break;
        }
    }
}

fn proxy_config(server: &MockServer) -> ProxyConfig {
    let mut config = ProxyConfig::default();
    config.spotify.api_url = format!("{}/v1", server.uri());
    config.spotify.accounts_url = server.uri();
    config.aggregation.window_delay_ms = 0;
    config
}

fn service(server: &MockServer) -> SpotifyService {
    SpotifyService::new(Arc::new(proxy_config(server))).unwrap()
}

fn aggregation(policy: AggregationPolicy, window_size: usize) -> AggregationConfig {
    AggregationConfig::builder()
        .page_size(50)
        .window_size(window_size)
        .window_delay(Duration::ZERO)
        .policy(policy)
        .build()
}

// ============================================================================
// Saved Albums
// ============================================================================

#[test_case(AggregationPolicy::Parallel; "parallel")]
#[test_case(AggregationPolicy::Sequential; "sequential")]
#[tokio::test]
async fn test_saved_albums_full_library(policy: AggregationPolicy) {
    let server = MockServer::start().await;
    mount_library(&server, 237, 50).await;

    let response = service(&server)
        .saved_albums_with("user-token", aggregation(policy, 2))
        .await
        .unwrap();

    assert_eq!(response.total_albums, 237);
    assert_eq!(response.albums.len(), 237);

    // Upstream order is preserved across pages and windows
    for (index, album) in response.albums.iter().enumerate() {
        assert_eq!(album.id, format!("album-{index}"));
    }
    assert_eq!(
        response.albums[236].image_url.as_deref(),
        Some("https://i.scdn.co/image/236")
    );
}

#[tokio::test]
async fn test_saved_albums_single_page() {
    let server = MockServer::start().await;
    mount_library(&server, 12, 50).await;

    let response = service(&server).saved_albums("user-token").await.unwrap();
    assert_eq!(response.total_albums, 12);
    assert_eq!(response.albums[0].name, "Album 0");
}

#[tokio::test]
async fn test_saved_albums_empty_library() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me/albums"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [],
            "total": 0,
            "next": null
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = service(&server).saved_albums("user-token").await.unwrap();
    assert_eq!(response.total_albums, 0);
    assert!(response.albums.is_empty());
}

#[tokio::test]
async fn test_saved_albums_fail_when_any_page_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me/albums"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": (0..50).map(saved_album).collect::<Vec<_>>(),
            "total": 150
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/me/albums"))
        .and(query_param("offset", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": (50..100).map(saved_album).collect::<Vec<_>>(),
            "total": 150
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/me/albums"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "status": 429, "message": "API rate limit exceeded" }
        })))
        .mount(&server)
        .await;

    let err = service(&server)
        .saved_albums_with("user-token", aggregation(AggregationPolicy::Parallel, 10))
        .await
        .unwrap_err();

    match err {
        Error::UpstreamRejection { message } => {
            assert_eq!(
                message,
                "Failed to get saved albums: API rate limit exceeded"
            );
        }
        other => panic!("expected upstream rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn test_saved_albums_transport_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me/albums"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = service(&server).saved_albums("user-token").await.unwrap_err();
    assert!(err.is_transport());
    assert!(matches!(err, Error::HttpStatus { status: 502, .. }));
}

// ============================================================================
// Aggregator over HTTP
// ============================================================================

#[tokio::test]
async fn test_aggregator_keeps_extra_query_params() {
    let server = MockServer::start().await;

    for offset in [0, 2] {
        Mock::given(method("GET"))
            .and(path("/v1/playlists/pl/tracks"))
            .and(query_param("market", "SE"))
            .and(query_param("limit", "2"))
            .and(query_param("offset", offset.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{ "n": offset }, { "n": offset + 1 }],
                "total": 4
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let url = Url::parse(&format!(
        "{}/v1/playlists/pl/tracks?market=SE",
        server.uri()
    ))
    .unwrap();
    let aggregator = Aggregator::with_config(
        HttpPageFetcher::new(HttpClient::new().unwrap()),
        AggregationConfig::builder()
            .page_size(2)
            .window_delay(Duration::ZERO)
            .build(),
    );

    let collection = aggregator.aggregate(&url, "token").await.unwrap();
    assert!(collection.is_complete());
    assert_eq!(collection.stats.pages_fetched, 2);

    let numbers: Vec<i64> = collection
        .into_items()
        .iter()
        .map(|item| item["n"].as_i64().unwrap())
        .collect();
    assert_eq!(numbers, vec![0, 1, 2, 3]);
}

// ============================================================================
// HTTP Router
// ============================================================================

#[tokio::test]
async fn test_album_list_route_end_to_end() {
    let server = MockServer::start().await;
    mount_library(&server, 75, 50).await;

    let app = router(AppState::from_config(proxy_config(&server)).unwrap());
    let request = Request::get("/api/album-list")
        .header(header::COOKIE, "spotifyAccessToken=user-token")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(body["totalAlbums"], 75);
    assert_eq!(body["albums"][74]["id"], "album-74");
    assert_eq!(body["albums"][0]["spotifyUrl"], "https://open.spotify.com/album/0");
}

#[tokio::test]
async fn test_album_list_route_upstream_rejection() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/me/albums"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "status": 401, "message": "Invalid access token" }
        })))
        .mount(&server)
        .await;

    let app = router(AppState::from_config(proxy_config(&server)).unwrap());
    let request = Request::get("/api/album-list")
        .header(header::COOKIE, "spotifyAccessToken=bogus")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        body,
        json!({ "error": "Failed to get saved albums: Invalid access token" })
    );
}
