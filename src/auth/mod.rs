//! Authentication module
//!
//! Supports: OAuth2 client credentials, OAuth2 authorization code
//!
//! The `Authenticator` obtains app tokens; the `oauth` helpers drive the
//! browser-facing authorization code flow.

mod authenticator;
mod oauth;
mod types;

pub use authenticator::{basic_credentials, Authenticator};
pub use oauth::{AuthorizationRequest, CodeExchange};
pub use types::{AuthConfig, TokenResponse};
