//! Auth configuration types
//!
//! Client credentials plus the token payloads returned by the
//! accounts service.

use serde::{Deserialize, Serialize};

/// Client credentials used to obtain an app token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Token endpoint URL
    pub token_url: String,
    /// Client ID
    pub client_id: String,
    /// Client secret
    pub client_secret: String,
}

/// Successful response of the token endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The access token
    pub access_token: String,
    /// Token type, normally "Bearer"
    #[serde(default)]
    pub token_type: Option<String>,
    /// Lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
    /// Refresh token (authorization code flow only)
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Granted scopes
    #[serde(default)]
    pub scope: Option<String>,
}
