//! Authenticator implementation
//!
//! Obtains app tokens through the client credentials flow. Tokens are
//! fetched on first use and kept for the lifetime of the authenticator;
//! handlers build one authenticator per request, so nothing outlives a call.

use super::types::{AuthConfig, TokenResponse};
use crate::decode::error_message;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Authenticator holding a client-credentials app token
pub struct Authenticator {
    /// Client credentials
    config: AuthConfig,
    /// Token obtained through the client-credentials flow
    cached_token: Arc<RwLock<Option<String>>>,
    /// HTTP client for token requests
    http_client: Client,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Create an authenticator with a custom HTTP client
    pub fn with_client(config: AuthConfig, http_client: Client) -> Self {
        Self {
            config,
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
        }
    }

    /// Get the app token, fetching it on first use
    pub async fn access_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                return Ok(token.clone());
            }
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have fetched while we waited for the lock
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let token = self.fetch_client_credentials().await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    /// Fetch an app token using the client credentials flow
    async fn fetch_client_credentials(&self) -> Result<String> {
        let AuthConfig {
            token_url,
            client_id,
            client_secret,
        } = &self.config;
        debug!("Requesting client credentials token from {token_url}");

        let response = self
            .http_client
            .post(token_url)
            .header(
                reqwest::header::AUTHORIZATION,
                basic_credentials(client_id, client_secret),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await?;

        let status = response.status();
        let body: JsonValue = response.json().await?;

        if let Some(message) = error_message(&body) {
            return Err(Error::oauth2(format!(
                "Failed to get access token: {message}"
            )));
        }
        if !status.is_success() {
            return Err(Error::oauth2(format!(
                "Token request failed with status {}",
                status.as_u16()
            )));
        }

        let token: TokenResponse = serde_json::from_value(body)?;
        Ok(token.access_token)
    }
}

/// Build a `Basic` authorization header value
pub fn basic_credentials(client_id: &str, client_secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{client_id}:{client_secret}"))
    )
}
