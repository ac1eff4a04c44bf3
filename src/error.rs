//! Error types for the Spotify proxy
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the proxy
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// A configuration value is unusable
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong with the value
        message: String,
    },

    /// A required credential or identifier is not configured
    #[error("Missing required config field: {field}")]
    MissingConfigField {
        /// Dotted name of the missing field
        field: String,
    },

    /// The config file is not valid YAML
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    // ============================================================================
    // Upstream Errors
    // ============================================================================
    /// The upstream API answered with a structured error envelope
    #[error("Upstream rejected request: {message}")]
    UpstreamRejection {
        /// Upstream message, prefixed with the failed operation
        message: String,
    },

    /// A token request or code exchange failed
    #[error("OAuth2 error: {message}")]
    OAuth2 {
        /// Reason reported by the token endpoint
        message: String,
    },

    // ============================================================================
    // Transport Errors
    // ============================================================================
    /// The request could not be sent or its body not read
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status without an error envelope
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Response status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// The request did not complete in time
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout
        timeout_ms: u64,
    },

    /// A body that should be JSON is not
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// JSON of the wrong shape
    #[error("Failed to decode response: {message}")]
    Decode {
        /// What was missing or mistyped
        message: String,
    },

    /// A configured or upstream URL does not parse
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    /// Local I/O failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    /// Anything else
    #[error("{0}")]
    Other(String),
}

/// Coarse classification used when reporting errors to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A credential or identifier was not configured
    ConfigurationMissing,
    /// Upstream returned an error envelope
    UpstreamRejection,
    /// Network, status or parse failure talking to upstream
    TransportFailure,
    /// Anything else (local I/O, token exchange, ...)
    Other,
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an upstream rejection
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamRejection {
            message: message.into(),
        }
    }

    /// Create an OAuth2 error
    pub fn oauth2(message: impl Into<String>) -> Self {
        Self::OAuth2 {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Config { .. } | Error::MissingConfigField { .. } | Error::YamlParse(_) => {
                ErrorKind::ConfigurationMissing
            }
            Error::UpstreamRejection { .. } => ErrorKind::UpstreamRejection,
            Error::Http(_)
            | Error::HttpStatus { .. }
            | Error::Timeout { .. }
            | Error::JsonParse(_)
            | Error::Decode { .. }
            | Error::InvalidUrl(_) => ErrorKind::TransportFailure,
            Error::OAuth2 { .. } | Error::Io(_) | Error::Other(_) => ErrorKind::Other,
        }
    }

    /// Check if this error came from talking to upstream
    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::TransportFailure
    }
}

/// Result type alias for the proxy
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("client_id");
        assert_eq!(err.to_string(), "Missing required config field: client_id");

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");

        let err = Error::upstream("The access token expired");
        assert_eq!(
            err.to_string(),
            "Upstream rejected request: The access token expired"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            Error::missing_field("playlist_id").kind(),
            ErrorKind::ConfigurationMissing
        );
        assert_eq!(
            Error::upstream("Invalid access token").kind(),
            ErrorKind::UpstreamRejection
        );
        assert_eq!(
            Error::http_status(500, "").kind(),
            ErrorKind::TransportFailure
        );
        assert_eq!(
            Error::Timeout { timeout_ms: 1000 }.kind(),
            ErrorKind::TransportFailure
        );
        assert_eq!(Error::decode("bad").kind(), ErrorKind::TransportFailure);
        assert_eq!(Error::oauth2("invalid_grant").kind(), ErrorKind::Other);
    }

    #[test]
    fn test_is_transport() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(Error::JsonParse(parse_err).is_transport());
        assert!(!Error::upstream("nope").is_transport());
        assert!(!Error::config("nope").is_transport());
    }
}
