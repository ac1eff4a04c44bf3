//! Spotify operations behind the HTTP routes and CLI commands
//!
//! Each operation takes everything it needs from the [`ProxyConfig`] it was
//! built with and the credential passed in; nothing is cached between calls.

use crate::aggregate::{AggregationConfig, Aggregator};
use crate::auth::{AuthConfig, Authenticator, CodeExchange, TokenResponse};
use crate::config::ProxyConfig;
use crate::error::{Error, Result};
use crate::fetch::{HttpPageFetcher, PageFetcher};
use crate::http::HttpClient;
use crate::normalize::{
    AlbumNormalizer, CollectionResponse, Normalizer, SongInfo, TrackNormalizer,
};
use crate::pagination::{CollectionSource, PageLocator, PageResult, PaginationPlanner};
use rand::Rng;
use std::sync::Arc;
use tracing::info;
use url::Url;

/// Outcome of picking a random playlist track
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RandomSong {
    /// A track was picked
    Found(SongInfo),
    /// The sampled page held no entries
    EmptyPage,
    /// The sampled entry has no track (removed from the catalog)
    MissingTrack,
}

/// Upstream operations of the proxy
#[derive(Debug, Clone)]
pub struct SpotifyService {
    config: Arc<ProxyConfig>,
    client: HttpClient,
}

impl SpotifyService {
    /// Create a service with a client built from the config
    pub fn new(config: Arc<ProxyConfig>) -> Result<Self> {
        let client = HttpClient::with_config(config.http.to_client_config())?;
        Ok(Self::with_client(config, client))
    }

    /// Create a service with an existing client
    pub fn with_client(config: Arc<ProxyConfig>, client: HttpClient) -> Self {
        Self { config, client }
    }

    /// Get the config
    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    // ========================================================================
    // Saved albums
    // ========================================================================

    /// Every saved album of the user owning `token`, using the configured policy
    pub async fn saved_albums(&self, token: &str) -> Result<CollectionResponse> {
        self.saved_albums_with(token, self.config.aggregation.to_aggregation_config())
            .await
    }

    /// Every saved album of the user owning `token`
    pub async fn saved_albums_with(
        &self,
        token: &str,
        aggregation: AggregationConfig,
    ) -> Result<CollectionResponse> {
        let url = Url::parse(&self.config.api_url("me/albums"))?;
        let fetcher = HttpPageFetcher::new(self.client.clone());
        let aggregator = Aggregator::with_config(fetcher, aggregation);

        info!("Starting to fetch saved albums");
        let collection = aggregator
            .aggregate(&url, token)
            .await
            .map_err(|e| with_context(e, "Failed to get saved albums"))?;

        let albums = AlbumNormalizer.normalize(&collection.items);
        info!("Finished fetching. Total albums: {}", albums.len());
        Ok(CollectionResponse::new(albums))
    }

    // ========================================================================
    // Random song
    // ========================================================================

    /// App token from the client credentials flow
    pub async fn app_token(&self) -> Result<String> {
        let (client_id, client_secret) = self.config.require_client_credentials()?;
        let auth = Authenticator::with_client(
            AuthConfig {
                token_url: self.config.accounts_url("api/token"),
                client_id: client_id.to_string(),
                client_secret: client_secret.to_string(),
            },
            self.client.inner().clone(),
        );
        auth.access_token().await
    }

    /// Pick a random track from the configured playlist
    ///
    /// A random page is fetched first, then a random entry on it, so every
    /// page is equally likely regardless of how full the last one is.
    pub async fn random_song(&self) -> Result<RandomSong> {
        let playlist_id = self.config.require_playlist_id()?;
        self.config.require_client_credentials()?;

        let token = self.app_token().await?;
        let fetcher = HttpPageFetcher::new(self.client.clone());
        let tracks_url = Url::parse(
            &self
                .config
                .api_url(&format!("playlists/{playlist_id}/tracks")),
        )?;

        let total = match self.config.spotify.playlist_total_tracks {
            Some(total) => u64::from(total),
            None => self.lookup_total(&fetcher, &tracks_url, &token).await?,
        };

        let page_size = self.config.random_song.page_size.max(1);
        let total_pages = PaginationPlanner::new(page_size).total_pages(total);
        if total_pages == 0 {
            return Ok(RandomSong::EmptyPage);
        }

        let page_index = rand::rng().random_range(0..total_pages);
        let offset = u32::try_from(page_index * u64::from(page_size)).map_err(|_| {
            Error::Other(format!("Playlist offset out of range for {total} tracks"))
        })?;

        info!("Fetching a random page of tracks for playlist: {playlist_id}");
        let source = CollectionSource::new(tracks_url, page_size);
        let page_url = source.resolve(&PageLocator::offset(offset))?;
        let page = self.fetch_tracks(&fetcher, &page_url, &token).await?;
        info!("Page fetched: {} ({} tracks)", page_index + 1, page.len());

        if page.is_empty() {
            return Ok(RandomSong::EmptyPage);
        }

        let pick = rand::rng().random_range(0..page.len());
        Ok(match TrackNormalizer.project(&page.items[pick]) {
            Some(song) => {
                info!("Picked random song: {}", song.name);
                RandomSong::Found(song)
            }
            None => RandomSong::MissingTrack,
        })
    }

    /// Playlist size from a one-item page
    async fn lookup_total(
        &self,
        fetcher: &HttpPageFetcher,
        tracks_url: &Url,
        token: &str,
    ) -> Result<u64> {
        let first = CollectionSource::new(tracks_url.clone(), 1).first_page();
        Ok(self.fetch_tracks(fetcher, &first, token).await?.total)
    }

    async fn fetch_tracks(
        &self,
        fetcher: &HttpPageFetcher,
        url: &Url,
        token: &str,
    ) -> Result<PageResult> {
        fetcher
            .fetch(url, token)
            .await?
            .into_page()
            .map_err(|e| with_context(e, "Failed to get playlist tracks"))
    }

    // ========================================================================
    // Authorization code flow
    // ========================================================================

    /// Exchange an authorization code for user tokens
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse> {
        let (client_id, client_secret) = self.config.require_client_credentials()?;
        let token_url = self.config.accounts_url("api/token");
        let redirect_uri = self.config.redirect_uri();

        CodeExchange {
            token_url: &token_url,
            client_id,
            client_secret,
            redirect_uri: &redirect_uri,
        }
        .exchange(&self.client, code)
        .await
    }
}

/// Prefix the message of an upstream rejection
fn with_context(error: Error, context: &str) -> Error {
    match error {
        Error::UpstreamRejection { message } => Error::upstream(format!("{context}: {message}")),
        other => other,
    }
}
