//! Page Fetcher
//!
//! One outbound GET per call, classified into a [`PageOutcome`]. Fetchers
//! hold no mutable state, so a single instance serves every concurrent
//! request of a window.

use crate::decode::{decode_page, PageOutcome};
use crate::error::Result;
use crate::http::{HttpClient, RequestConfig};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

// ============================================================================
// Page Fetcher Trait
// ============================================================================

/// Fetches a single page of an upstream collection
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page at `url` with a bearer credential
    ///
    /// Error envelopes come back as [`PageOutcome::Rejected`]; only
    /// transport and parse failures are `Err`.
    async fn fetch(&self, url: &Url, credential: &str) -> Result<PageOutcome>;
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for std::sync::Arc<F> {
    async fn fetch(&self, url: &Url, credential: &str) -> Result<PageOutcome> {
        (**self).fetch(url, credential).await
    }
}

// ============================================================================
// HTTP Page Fetcher
// ============================================================================

/// Page fetcher backed by [`HttpClient`]
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: HttpClient,
}

impl HttpPageFetcher {
    /// Create a fetcher over `client`
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &Url, credential: &str) -> Result<PageOutcome> {
        let config = RequestConfig::new().bearer(credential);
        let (status, body) = self.client.get_json_with_config(url.as_str(), config).await?;

        let outcome = decode_page(status, &body)?;
        if let PageOutcome::Rejected(rejection) = &outcome {
            debug!(
                url = %url,
                status = rejection.status,
                "Upstream rejected page: {}",
                rejection.message
            );
        }
        Ok(outcome)
    }
}
