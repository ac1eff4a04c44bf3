//! Configuration for the proxy
//!
//! `ProxyConfig` is loaded from an optional YAML file and then overlaid with
//! environment variables. Every field has a default so an empty file (or no
//! file at all) yields a usable config; credentials and the playlist id are
//! only checked by the operations that need them.

use crate::aggregate::{AggregationConfig, AggregationPolicy};
use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete proxy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Listener and public URL settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Upstream API endpoints and credentials
    #[serde(default)]
    pub spotify: SpotifySettings,

    /// Collection aggregation tuning
    #[serde(default)]
    pub aggregation: AggregationSettings,

    /// Random song endpoint settings
    #[serde(default)]
    pub random_song: RandomSongSettings,

    /// OAuth callback relay settings
    #[serde(default)]
    pub relay: RelaySettings,

    /// Outbound HTTP settings
    #[serde(default)]
    pub http: HttpSettings,
}

impl ProxyConfig {
    /// Load config from an optional YAML file, then apply the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load config from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config {}: {e}", path.display()))
        })?;
        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Overlay values from an environment lookup
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = get("PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }
        if let Some(url) = get("PUBLIC_BASE_URL") {
            self.server.public_base_url = url;
        }
        if let Some(environment) = get("VERCEL_ENV") {
            self.server.environment = environment;
        }
        if let Some(url) = get("SPOTIFY_API_URL") {
            self.spotify.api_url = url;
        }
        if let Some(url) = get("SPOTIFY_ACCOUNTS_URL") {
            self.spotify.accounts_url = url;
        }
        if let Some(id) = get("SPOTIFY_CLIENT_ID") {
            self.spotify.client_id = Some(id);
        }
        if let Some(secret) = get("SPOTIFY_CLIENT_SECRET") {
            self.spotify.client_secret = Some(secret);
        }
        if let Some(id) = get("SPOTIFY_PLAYLIST_ID") {
            self.spotify.playlist_id = Some(id);
        }
        if let Some(total) = get("SPOTIFY_PLAYLIST_TOTAL_TRACKS").and_then(|v| v.parse().ok()) {
            self.spotify.playlist_total_tracks = Some(total);
        }
        if let Some(target) = get("EZBOOKKEEPING_CALLBACK_TARGET") {
            self.relay.callback_target = target;
        }
    }

    /// Client id and secret, or `MissingConfigField`
    pub fn require_client_credentials(&self) -> Result<(&str, &str)> {
        let id = self
            .spotify
            .client_id
            .as_deref()
            .ok_or_else(|| Error::missing_field("SPOTIFY_CLIENT_ID"))?;
        let secret = self
            .spotify
            .client_secret
            .as_deref()
            .ok_or_else(|| Error::missing_field("SPOTIFY_CLIENT_SECRET"))?;
        Ok((id, secret))
    }

    /// Playlist id, or `MissingConfigField`
    pub fn require_playlist_id(&self) -> Result<&str> {
        self.spotify
            .playlist_id
            .as_deref()
            .ok_or_else(|| Error::missing_field("SPOTIFY_PLAYLIST_ID"))
    }

    /// URL Spotify redirects back to after authorization
    pub fn redirect_uri(&self) -> String {
        format!(
            "{}/api/auth/callback",
            self.server.public_base_url.trim_end_matches('/')
        )
    }

    /// Absolute URL on this service for a path
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.server.public_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Upstream API URL for a path
    pub fn api_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.spotify.api_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Accounts service URL for a path
    pub fn accounts_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.spotify.accounts_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Externally visible base URL (used for redirects)
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Deployment name reported by `/api/demo`
    #[serde(default = "default_environment")]
    pub environment: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: default_port(),
            public_base_url: default_public_base_url(),
            environment: default_environment(),
        }
    }
}

fn default_port() -> u16 {
    3000
}

fn default_public_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_environment() -> String {
    "development".to_string()
}

/// Upstream settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpotifySettings {
    /// Web API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Accounts service base URL (authorize + token endpoints)
    #[serde(default = "default_accounts_url")]
    pub accounts_url: String,

    /// OAuth client id
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth client secret
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Playlist sampled by the random song endpoint
    #[serde(default)]
    pub playlist_id: Option<String>,

    /// Known playlist size; looked up upstream when unset
    #[serde(default)]
    pub playlist_total_tracks: Option<u32>,

    /// Scope requested during authorization
    #[serde(default = "default_scope")]
    pub scope: String,
}

impl Default for SpotifySettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            accounts_url: default_accounts_url(),
            client_id: None,
            client_secret: None,
            playlist_id: None,
            playlist_total_tracks: None,
            scope: default_scope(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.spotify.com/v1".to_string()
}

fn default_accounts_url() -> String {
    "https://accounts.spotify.com".to_string()
}

fn default_scope() -> String {
    "user-library-read".to_string()
}

/// Aggregation tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregationSettings {
    /// Items requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Concurrent requests per window (parallel policy)
    #[serde(default = "default_window_size")]
    pub window_size: usize,

    /// Pause between windows in milliseconds
    #[serde(default = "default_window_delay_ms")]
    pub window_delay_ms: u64,

    /// Aggregation policy
    #[serde(default)]
    pub policy: AggregationPolicy,
}

impl Default for AggregationSettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
            window_size: default_window_size(),
            window_delay_ms: default_window_delay_ms(),
            policy: AggregationPolicy::default(),
        }
    }
}

impl AggregationSettings {
    /// Build the aggregator config from these settings
    pub fn to_aggregation_config(&self) -> AggregationConfig {
        AggregationConfig::builder()
            .page_size(self.page_size)
            .window_size(self.window_size)
            .window_delay(Duration::from_millis(self.window_delay_ms))
            .policy(self.policy)
            .build()
    }
}

fn default_page_size() -> u32 {
    50
}

fn default_window_size() -> usize {
    10
}

fn default_window_delay_ms() -> u64 {
    10
}

/// Random song settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomSongSettings {
    /// Tracks per playlist page
    #[serde(default = "default_random_page_size")]
    pub page_size: u32,
}

impl Default for RandomSongSettings {
    fn default() -> Self {
        Self {
            page_size: default_random_page_size(),
        }
    }
}

fn default_random_page_size() -> u32 {
    100
}

/// Callback relay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelaySettings {
    /// Where OAuth callbacks are forwarded to
    #[serde(default = "default_callback_target")]
    pub callback_target: String,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            callback_target: default_callback_target(),
        }
    }
}

fn default_callback_target() -> String {
    "http://localhost:8080/api/bank_integration/callback".to_string()
}

/// Outbound HTTP settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HttpSettings {
    /// Build the outbound client config from these settings
    pub fn to_client_config(&self) -> HttpClientConfig {
        HttpClientConfig::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()
    }
}

fn default_timeout_secs() -> u64 {
    30
}
