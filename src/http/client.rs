//! HTTP client for upstream calls
//!
//! Provides a thin wrapper over reqwest that handles:
//! - Per-request headers, bearer credentials and form bodies
//! - Timeout classification
//! - Reading JSON bodies regardless of status, so callers can inspect
//!   error envelopes embedded in non-2xx responses
//!
//! No retries happen here. A failed call is reported once and the caller
//! decides what to do with it.

use crate::error::{Error, Result};
use crate::types::{JsonValue, StringMap};
use reqwest::{Client, Method, Response, StatusCode};
use std::time::Duration;
use tracing::debug;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: format!("spotify-proxy/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Request headers
    pub headers: StringMap,
    /// Bearer credential
    pub bearer: Option<String>,
    /// Form-encoded body
    pub form: Option<Vec<(String, String)>>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a header
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Authenticate with a bearer token
    #[must_use]
    pub fn bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// Add a form field (switches the body to `application/x-www-form-urlencoded`)
    #[must_use]
    pub fn form_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }
}

/// HTTP client shared by all upstream calls
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the underlying reqwest client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Make a GET request and read the body as JSON, whatever the status
    pub async fn get_json_with_config(
        &self,
        url: &str,
        config: RequestConfig,
    ) -> Result<(StatusCode, JsonValue)> {
        let response = self.request(Method::GET, url, config).await?;
        read_json(response).await
    }

    /// Make a POST request and read the body as JSON, whatever the status
    pub async fn post_json_with_config(
        &self,
        url: &str,
        config: RequestConfig,
    ) -> Result<(StatusCode, JsonValue)> {
        let response = self.request(Method::POST, url, config).await?;
        read_json(response).await
    }

    /// Send one request
    ///
    /// Only transport failures are errors here; any HTTP status is returned
    /// to the caller as a response.
    async fn request(&self, method: Method, url: &str, config: RequestConfig) -> Result<Response> {
        let mut req = self.client.request(method.clone(), url);

        for (key, value) in &config.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(ref form) = config.form {
            req = req.form(form);
        }

        if let Some(ref token) = config.bearer {
            req = req.bearer_auth(token);
        }

        match req.send().await {
            Ok(response) => {
                debug!("{} {} -> {}", method, url, response.status().as_u16());
                Ok(response)
            }
            Err(e) if e.is_timeout() => Err(Error::Timeout {
                timeout_ms: self.config.timeout.as_millis() as u64,
            }),
            Err(e) => Err(Error::Http(e)),
        }
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Read a response body as JSON
///
/// A body that is not JSON on an error status becomes `HttpStatus` so the
/// status is not lost behind a parse error.
async fn read_json(response: Response) -> Result<(StatusCode, JsonValue)> {
    let status = response.status();
    let body = response.text().await?;

    match serde_json::from_str::<JsonValue>(&body) {
        Ok(json) => Ok((status, json)),
        Err(_) if !status.is_success() => Err(Error::http_status(status.as_u16(), body)),
        Err(e) => Err(Error::JsonParse(e)),
    }
}
