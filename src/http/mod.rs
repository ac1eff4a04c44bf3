//! HTTP client module
//!
//! Provides the outbound HTTP client used for every upstream call.
//!
//! # Features
//!
//! - **Single attempt**: No retries or backoff; failures surface immediately
//! - **Status-agnostic JSON**: Bodies are read even on non-2xx so error
//!   envelopes can be classified by the caller
//! - **Authentication**: Bearer tokens or arbitrary headers per request

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};

#[cfg(test)]
mod tests;
