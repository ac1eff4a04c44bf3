//! CLI commands and argument parsing

use crate::aggregate::AggregationPolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Spotify proxy CLI
#[derive(Parser, Debug)]
#[command(name = "spotify-proxy")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML); environment variables override it
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server mode
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Fetch every saved album for a user token
    Albums {
        /// User access token
        #[arg(long, env = "SPOTIFY_ACCESS_TOKEN")]
        token: String,

        /// Aggregation policy
        #[arg(long)]
        policy: Option<AggregationPolicy>,

        /// Items per page
        #[arg(long)]
        page_size: Option<u32>,

        /// Concurrent requests per window
        #[arg(long)]
        window_size: Option<usize>,
    },

    /// Pick a random song from the configured playlist
    RandomSong,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON
    Json,
    /// Indented JSON
    Pretty,
}
