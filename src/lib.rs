// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # Spotify Proxy
//!
//! Read-only HTTP endpoints over the Spotify Web API. The interesting part
//! is the paginated resource aggregator, which turns a collection served 50
//! to 100 items at a time into one complete, order-preserving result.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use spotify_proxy::aggregate::{AggregationConfig, Aggregator};
//! use spotify_proxy::fetch::HttpPageFetcher;
//! use spotify_proxy::http::HttpClient;
//! use spotify_proxy::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let fetcher = HttpPageFetcher::new(HttpClient::new()?);
//!     let aggregator = Aggregator::with_config(fetcher, AggregationConfig::default());
//!
//!     let url = url::Url::parse("https://api.spotify.com/v1/me/albums")?;
//!     let collection = aggregator.aggregate(&url, "user-token").await?;
//!     println!("{} albums", collection.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │              HTTP routes / CLI  (cli, service)                  │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴──────────────┬───────────────────┐
//! │  Aggregator  │  Pagination Planner          │  Normalizer       │
//! │  parallel    │  offsets / cursor predicate  │  albums, tracks   │
//! │  sequential  │                              │                   │
//! └──────┬───────┴──────────────────────────────┴───────────────────┘
//!        │
//! ┌──────┴───────┬──────────────┬──────────────┐
//! │ Page Fetcher │   Decoder    │     Auth     │
//! │ reqwest      │ page/reject  │ bearer, OAuth│
//! └──────────────┴──────────────┴──────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the proxy
pub mod error;

/// Common types and type aliases
pub mod types;

/// Configuration loading
pub mod config;

/// Authentication and the OAuth code flow
pub mod auth;

/// HTTP client
pub mod http;

/// Upstream envelope decoding
pub mod decode;

/// Page locators and the pagination planner
pub mod pagination;

/// Page fetchers
pub mod fetch;

/// Paginated resource aggregation
pub mod aggregate;

/// Projection into caller-facing records
pub mod normalize;

/// Operations behind routes and commands
pub mod service;

/// Command-line interface and HTTP server
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use aggregate::{AggregatedCollection, AggregationConfig, AggregationPolicy, Aggregator};
pub use config::ProxyConfig;
pub use service::{RandomSong, SpotifyService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
