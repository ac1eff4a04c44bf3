//! HTTP server mode
//!
//! Read-only routes over the Spotify Web API plus the OAuth glue that puts
//! a user token into the `spotifyAccessToken` cookie.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, Method, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use super::response::{
    append_cookie, encode_component, read_cookie, redirect, session_cookie, ApiError,
    ACCESS_TOKEN_COOKIE, GENERIC_FAILURE, REFRESH_TOKEN_COOKIE,
};
use crate::auth::AuthorizationRequest;
use crate::config::ProxyConfig;
use crate::error::{Error, Result};
use crate::service::{RandomSong, SpotifyService};

/// Simulated work done by `/api/demo`
const DEMO_DELAY: Duration = Duration::from_millis(100);

/// App state shared across handlers
#[derive(Debug, Clone)]
pub struct AppState {
    service: SpotifyService,
}

impl AppState {
    /// Create state around a service
    pub fn new(service: SpotifyService) -> Self {
        Self { service }
    }

    /// Build state from a config
    pub fn from_config(config: ProxyConfig) -> Result<Self> {
        Ok(Self::new(SpotifyService::new(Arc::new(config))?))
    }

    fn config(&self) -> &ProxyConfig {
        self.service.config()
    }
}

/// Build the router with every route
pub fn router(state: AppState) -> Router {
    // Build CORS layer - the routes are public and read-only
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/album-list", get(album_list))
        .route("/api/random-song", get(random_song))
        .route("/api/auth/spotify", get(auth_spotify))
        .route("/api/auth/callback", get(auth_callback))
        .route("/api/hello", get(hello))
        .route("/api/demo", get(demo))
        .route("/api/ezbookkeeping-callback", get(relay_callback))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Start the HTTP server
pub async fn serve(config: ProxyConfig, port: u16) -> Result<()> {
    let app = router(AppState::from_config(config)?);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| Error::config(format!("Failed to bind to port {port}: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::config(format!("Server error: {e}")))?;

    Ok(())
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

// ============================================================================
// Collections
// ============================================================================

/// Every saved album of the signed-in user
async fn album_list(
    State(state): State<Arc<AppState>>,
    uri: Uri,
    headers: HeaderMap,
) -> std::result::Result<Response, ApiError> {
    let Some(token) = read_cookie(&headers, ACCESS_TOKEN_COOKIE) else {
        let return_to = uri.path_and_query().map_or(uri.path(), |pq| pq.as_str());
        let location = format!(
            "{}?state={}",
            state.config().public_url("/api/auth/spotify"),
            encode_component(return_to)
        );
        return Ok(redirect(&location));
    };

    let albums = state.service.saved_albums(&token).await?;
    Ok((
        [(header::CACHE_CONTROL, "public, max-age=300")],
        Json(albums),
    )
        .into_response())
}

/// One random track from the configured playlist
async fn random_song(
    State(state): State<Arc<AppState>>,
) -> std::result::Result<Response, ApiError> {
    match state.service.random_song().await? {
        RandomSong::Found(song) => Ok(Json(song).into_response()),
        RandomSong::EmptyPage => Err(ApiError::NotFound("No tracks found".to_string())),
        RandomSong::MissingTrack => Err(ApiError::Internal(
            "Failed to get track information".to_string(),
        )),
    }
}

// ============================================================================
// OAuth
// ============================================================================

#[derive(Debug, Deserialize)]
struct LoginQuery {
    state: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    code: Option<String>,
    state: Option<String>,
}

/// Redirect to the authorize page, carrying `state` through
async fn auth_spotify(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LoginQuery>,
) -> std::result::Result<Response, ApiError> {
    let config = state.config();
    let Some(client_id) = config.spotify.client_id.as_deref() else {
        error!("SPOTIFY_CLIENT_ID is not set");
        return Err(ApiError::Internal("Server configuration error".to_string()));
    };

    let url = AuthorizationRequest {
        authorize_url: config.accounts_url("authorize"),
        client_id: client_id.to_string(),
        scope: config.spotify.scope.clone(),
        redirect_uri: config.redirect_uri(),
        state: query.state.filter(|s| !s.is_empty()),
    }
    .to_url()?;

    Ok(redirect(url.as_str()))
}

/// Exchange the code, store the tokens in cookies and go back to `state`
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CallbackQuery>,
) -> Response {
    let config = state.config();
    let error_redirect = |message: &str| {
        redirect(&format!(
            "{}?message={}",
            config.public_url("/error"),
            encode_component(message)
        ))
    };

    let Some(code) = query.code.filter(|code| !code.is_empty()) else {
        return error_redirect("Missing authorization code");
    };

    if config.require_client_credentials().is_err() {
        error!("SPOTIFY_CLIENT_ID or SPOTIFY_CLIENT_SECRET is not set");
        return error_redirect("Server configuration error");
    }

    match state.service.exchange_code(&code).await {
        Ok(token) => {
            let return_to = query
                .state
                .filter(|path| path.starts_with('/'))
                .unwrap_or_else(|| "/".to_string());
            let location = format!(
                "{}{}",
                config.server.public_base_url.trim_end_matches('/'),
                return_to
            );

            let mut response = redirect(&location);
            append_cookie(
                &mut response,
                &session_cookie(ACCESS_TOKEN_COOKIE, &token.access_token, token.expires_in),
            );
            if let Some(refresh_token) = token.refresh_token.as_deref() {
                append_cookie(
                    &mut response,
                    &session_cookie(REFRESH_TOKEN_COOKIE, refresh_token, None),
                );
            }
            response
        }
        Err(Error::OAuth2 { message }) => {
            warn!("Token exchange rejected: {message}");
            error_redirect(&message)
        }
        Err(e) => {
            error!("Error in callback: {e}");
            error_redirect(GENERIC_FAILURE)
        }
    }
}

/// Forward a third-party OAuth callback to the configured target
async fn relay_callback(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let target = state.config().relay.callback_target.as_str();
    let base = target.split_once('?').map_or(target, |(base, _)| base);

    let location = match uri.query().filter(|query| !query.is_empty()) {
        Some(query) => format!("{base}?{query}"),
        None => base.to_string(),
    };
    redirect(&location)
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Greeting with the server time
async fn hello() -> impl IntoResponse {
    let now = chrono::Local::now().format("%H:%M:%S");
    Json(json!({ "message": format!("Hello! The current time is {now}") }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DemoResponse {
    message: &'static str,
    execution_time: String,
    environment: String,
    logs: Vec<String>,
    request: DemoRequest,
}

#[derive(Debug, Serialize)]
struct DemoRequest {
    method: String,
    url: String,
    headers: BTreeMap<String, String>,
}

/// Simulated function execution with a timestamped log
async fn demo(
    State(state): State<Arc<AppState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Json<DemoResponse> {
    let started = Instant::now();
    tokio::time::sleep(DEMO_DELAY).await;
    let elapsed = started.elapsed().as_millis();

    let request_headers: BTreeMap<String, String> = headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_string(), value.to_string()))
        })
        .collect();
    let user_agent = request_headers
        .get(header::USER_AGENT.as_str())
        .map_or("Unknown", String::as_str);

    let stamp = || Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    let logs = vec![
        format!("[{}] Function execution started", stamp()),
        format!("[{}] Request received from {user_agent}", stamp()),
        format!("[{}] Processing request...", stamp()),
        format!("[{}] Function execution completed", stamp()),
    ];

    let path = uri.path_and_query().map_or(uri.path(), |pq| pq.as_str());
    let config = state.config();

    Json(DemoResponse {
        message: "Function executed successfully",
        execution_time: format!("{elapsed}ms"),
        environment: config.server.environment.clone(),
        logs,
        request: DemoRequest {
            method: method.to_string(),
            url: format!(
                "{}{}",
                config.server.public_base_url.trim_end_matches('/'),
                path
            ),
            headers: request_headers,
        },
    })
}
