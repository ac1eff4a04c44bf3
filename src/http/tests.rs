//! Tests for the HTTP client module

use super::*;
use crate::error::Error;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn url(server: &MockServer, path: &str) -> String {
    format!("{}{path}", server.uri())
}

#[test]
fn test_http_client_config_default() {
    let config = HttpClientConfig::default();
    assert_eq!(config.timeout, Duration::from_secs(30));
    assert!(config.user_agent.starts_with("spotify-proxy/"));
}

#[test]
fn test_http_client_config_builder() {
    let config = HttpClientConfig::builder()
        .timeout(Duration::from_secs(5))
        .build();

    assert_eq!(config.timeout, Duration::from_secs(5));
}

#[test]
fn test_request_config_builder() {
    let config = RequestConfig::new()
        .header("X-Request-Id", "abc123")
        .bearer("token")
        .form_field("grant_type", "client_credentials")
        .form_field("scope", "user-library-read");

    assert_eq!(
        config.headers.get("X-Request-Id"),
        Some(&"abc123".to_string())
    );
    assert_eq!(config.bearer.as_deref(), Some("token"));
    assert_eq!(config.form.as_ref().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_http_client_bearer() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/albums"))
        .and(header("Authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let (status, body) = client
        .get_json_with_config(
            &url(&mock_server, "/me/albums?limit=50"),
            RequestConfig::new().bearer("tok-123"),
        )
        .await
        .unwrap();

    assert_eq!(status, 200);
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn test_http_client_post_form_with_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(header("Authorization", "Basic abc"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "at"
        })))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let (status, body) = client
        .post_json_with_config(
            &url(&mock_server, "/api/token"),
            RequestConfig::new()
                .header("Authorization", "Basic abc")
                .form_field("grant_type", "authorization_code")
                .form_field("code", "xyz"),
        )
        .await
        .unwrap();

    assert_eq!(status, 200);
    assert_eq!(body["access_token"], "at");
}

#[tokio::test]
async fn test_http_client_error_status_is_not_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/albums"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": {"status": 401, "message": "The access token expired"}
        })))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let (status, body) = client
        .get_json_with_config(&url(&mock_server, "/me/albums"), RequestConfig::new())
        .await
        .unwrap();

    assert_eq!(status, 401);
    assert_eq!(body["error"]["message"], "The access token expired");
}

#[tokio::test]
async fn test_read_json_non_json_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let result = client
        .get_json_with_config(&url(&mock_server, "/broken"), RequestConfig::new())
        .await;

    match result {
        Err(Error::HttpStatus { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "upstream down");
        }
        other => panic!("Expected HttpStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn test_read_json_non_json_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/html"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(&mock_server)
        .await;

    let client = HttpClient::new().unwrap();
    let result = client
        .get_json_with_config(&url(&mock_server, "/html"), RequestConfig::new())
        .await;

    assert!(matches!(result, Err(Error::JsonParse(_))));
}

#[tokio::test]
async fn test_http_client_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&mock_server)
        .await;

    let config = HttpClientConfig::builder()
        .timeout(Duration::from_millis(50))
        .build();
    let client = HttpClient::with_config(config).unwrap();
    let result = client
        .get_json_with_config(&url(&mock_server, "/slow"), RequestConfig::new())
        .await;

    assert!(matches!(result, Err(Error::Timeout { timeout_ms: 50 })));
}

#[test]
fn test_http_client_debug() {
    let client = HttpClient::new().unwrap();
    let debug_str = format!("{client:?}");
    assert!(debug_str.contains("HttpClient"));
    assert!(debug_str.contains("config"));
}
