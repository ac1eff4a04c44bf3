//! Authorization code flow
//!
//! Builds the authorize redirect and exchanges the returned code for a user
//! token. Refreshing tokens is left to the client.

use super::authenticator::basic_credentials;
use super::types::TokenResponse;
use crate::decode::error_message;
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use url::Url;

/// Parameters of the authorize redirect
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    /// Accounts `/authorize` endpoint
    pub authorize_url: String,
    /// OAuth client id
    pub client_id: String,
    /// Space-separated scopes
    pub scope: String,
    /// Callback URL registered with the provider
    pub redirect_uri: String,
    /// Opaque value echoed back to the callback
    pub state: Option<String>,
}

impl AuthorizationRequest {
    /// Render the full authorize URL
    pub fn to_url(&self) -> Result<Url> {
        let mut params = vec![
            ("response_type", "code"),
            ("client_id", self.client_id.as_str()),
            ("scope", self.scope.as_str()),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        if let Some(state) = self.state.as_deref() {
            params.push(("state", state));
        }
        Ok(Url::parse_with_params(&self.authorize_url, &params)?)
    }
}

/// Credentials and endpoint for the code exchange
#[derive(Debug, Clone)]
pub struct CodeExchange<'a> {
    /// Accounts `/api/token` endpoint
    pub token_url: &'a str,
    /// OAuth client id
    pub client_id: &'a str,
    /// OAuth client secret
    pub client_secret: &'a str,
    /// Same redirect URI used for the authorize step
    pub redirect_uri: &'a str,
}

impl CodeExchange<'_> {
    /// Exchange an authorization code for a user token
    pub async fn exchange(&self, client: &HttpClient, code: &str) -> Result<TokenResponse> {
        let config = RequestConfig::new()
            .header(
                "Authorization",
                basic_credentials(self.client_id, self.client_secret),
            )
            .form_field("grant_type", "authorization_code")
            .form_field("code", code)
            .form_field("redirect_uri", self.redirect_uri);

        let (status, body) = client.post_json_with_config(self.token_url, config).await?;

        if !status.is_success() {
            let message = error_message(&body)
                .unwrap_or_else(|| format!("token endpoint returned {}", status.as_u16()));
            return Err(Error::oauth2(message));
        }

        Ok(serde_json::from_value(body)?)
    }
}
