//! CLI module
//!
//! Command-line interface for the proxy.
//!
//! # Commands
//!
//! - `serve` - Start HTTP server mode
//! - `albums` - Fetch every saved album for a user token
//! - `random-song` - Pick a random song from the configured playlist

mod commands;
mod response;
mod runner;
mod server;

pub use commands::{Cli, Commands, OutputFormat};
pub use response::{ApiError, ErrorBody, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE};
pub use runner::Runner;
pub use server::{router, serve, AppState};
