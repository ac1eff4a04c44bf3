//! Response helpers for the HTTP server
//!
//! Error bodies, redirects and the session cookies set by the OAuth callback.

use crate::error::{Error, ErrorKind};
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

/// Cookie holding the user access token
pub const ACCESS_TOKEN_COOKIE: &str = "spotifyAccessToken";

/// Cookie holding the user refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "spotifyRefreshToken";

/// Message shown for failures whose details stay in the logs
pub const GENERIC_FAILURE: &str = "An unexpected error occurred";

// ============================================================================
// Errors
// ============================================================================

/// JSON body of every failed request
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human-readable failure message
    pub error: String,
}

/// Error returned by route handlers
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// Unknown route or resource, answered with 404
    #[error("{0}")]
    NotFound(String),

    /// Local failure with a message safe to show, answered with 500
    #[error("{0}")]
    Internal(String),

    /// Failure from the proxy itself, mapped through [`Error::kind`]
    #[error(transparent)]
    Proxy(#[from] Error),
}

impl ApiError {
    /// HTTP status for this error
    ///
    /// Upstream rejections and transport failures are 502; everything else
    /// is 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Proxy(err) => match err.kind() {
                ErrorKind::UpstreamRejection | ErrorKind::TransportFailure => {
                    StatusCode::BAD_GATEWAY
                }
                ErrorKind::ConfigurationMissing | ErrorKind::Other => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }

    /// Message placed in the response body
    ///
    /// Upstream messages pass through; transport details do not.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Proxy(Error::UpstreamRejection { message }) => message.clone(),
            ApiError::Proxy(err) if err.is_transport() => GENERIC_FAILURE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Proxy(err) if err.is_transport() => error!("Upstream failure: {err}"),
            ApiError::Proxy(err) => warn!("Request failed: {err}"),
            ApiError::NotFound(message) | ApiError::Internal(message) => {
                warn!("Request failed: {message}");
            }
        }

        let code = self.status_code();
        let body = ErrorBody {
            error: self.public_message(),
        };
        (code, Json(body)).into_response()
    }
}

// ============================================================================
// Redirects and cookies
// ============================================================================

/// 302 to `location`
pub fn redirect(location: &str) -> Response {
    match HeaderValue::from_str(location) {
        Ok(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        Err(_) => ApiError::Internal(format!("Invalid redirect target: {location}")).into_response(),
    }
}

/// Percent-encode a query component
pub fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Value of the named request cookie, if present and non-empty
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

/// `Set-Cookie` value for an HttpOnly, site-wide cookie
pub fn session_cookie(name: &str, value: &str, max_age: Option<u64>) -> String {
    match max_age {
        Some(max_age) => format!("{name}={value}; Path=/; HttpOnly; Max-Age={max_age}"),
        None => format!("{name}={value}; Path=/; HttpOnly"),
    }
}

/// Append a `Set-Cookie` header; values that are not valid header text are dropped
pub fn append_cookie(response: &mut Response, cookie: &str) {
    match HeaderValue::from_str(cookie) {
        Ok(value) => {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
        Err(_) => warn!("Dropping cookie with invalid characters"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_api_error_status_codes() {
        assert_eq!(
            ApiError::NotFound("gone".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::Internal("broken".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(Error::upstream("Invalid access token")).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(Error::http_status(503, "down")).status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            ApiError::from(Error::missing_field("spotify.client_id")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_error_public_message() {
        assert_eq!(
            ApiError::from(Error::upstream("Invalid access token")).public_message(),
            "Invalid access token"
        );
        assert_eq!(
            ApiError::from(Error::http_status(503, "down")).public_message(),
            GENERIC_FAILURE
        );
        assert_eq!(ApiError::NotFound("gone".into()).public_message(), "gone");
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody {
            error: "gone".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "error": "gone" })
        );
    }
}
