//! CLI runner - executes commands

use crate::aggregate::AggregationPolicy;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::cli::server;
use crate::config::ProxyConfig;
use crate::error::{Error, Result};
use crate::service::{RandomSong, SpotifyService};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Serve { port } => {
                let port = port.unwrap_or(config.server.port);
                server::serve(config, port).await
            }
            Commands::Albums {
                token,
                policy,
                page_size,
                window_size,
            } => {
                self.albums(config, token, *policy, *page_size, *window_size)
                    .await
            }
            Commands::RandomSong => self.random_song(config).await,
        }
    }

    /// Load config from `--config` and the environment
    fn load_config(&self) -> Result<ProxyConfig> {
        let config = ProxyConfig::load(self.cli.config.as_deref())?;
        if let Some(path) = &self.cli.config {
            info!("Loaded config from {}", path.display());
        }
        Ok(config)
    }

    /// Run one aggregation and print the album list
    async fn albums(
        &self,
        mut config: ProxyConfig,
        token: &str,
        policy: Option<AggregationPolicy>,
        page_size: Option<u32>,
        window_size: Option<usize>,
    ) -> Result<()> {
        if let Some(policy) = policy {
            config.aggregation.policy = policy;
        }
        if let Some(page_size) = page_size {
            config.aggregation.page_size = page_size;
        }
        if let Some(window_size) = window_size {
            config.aggregation.window_size = window_size;
        }

        let service = SpotifyService::new(Arc::new(config))?;
        let albums = service.saved_albums(token).await?;
        self.output(&albums)
    }

    /// Print one random song
    async fn random_song(&self, config: ProxyConfig) -> Result<()> {
        let service = SpotifyService::new(Arc::new(config))?;
        match service.random_song().await? {
            RandomSong::Found(song) => self.output(&song),
            RandomSong::EmptyPage => Err(Error::Other("No tracks found".to_string())),
            RandomSong::MissingTrack => Err(Error::Other(
                "Failed to get track information".to_string(),
            )),
        }
    }

    /// Write a value to stdout in the selected format
    fn output<T: Serialize>(&self, value: &T) -> Result<()> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{rendered}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_albums_command() {
        let cli = Cli::parse_from([
            "spotify-proxy",
            "--format",
            "pretty",
            "albums",
            "--token",
            "abc",
            "--policy",
            "sequential",
            "--window-size",
            "3",
        ]);

        assert_eq!(cli.format, OutputFormat::Pretty);
        match cli.command {
            Commands::Albums {
                token,
                policy,
                page_size,
                window_size,
            } => {
                assert_eq!(token, "abc");
                assert_eq!(policy, Some(AggregationPolicy::Sequential));
                assert_eq!(page_size, None);
                assert_eq!(window_size, Some(3));
            }
            other => panic!("Expected albums command, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_serve_with_global_flags() {
        let cli = Cli::parse_from(["spotify-proxy", "serve", "--port", "4000", "-v"]);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Serve { port: Some(4000) }));
    }

    #[test]
    fn test_parse_random_song() {
        let cli = Cli::parse_from(["spotify-proxy", "-c", "proxy.yaml", "random-song"]);
        assert_eq!(
            cli.config.as_deref(),
            Some(std::path::Path::new("proxy.yaml"))
        );
        assert!(matches!(cli.command, Commands::RandomSong));
    }

    #[test]
    fn test_missing_config_file_fails() {
        let cli = Cli::parse_from([
            "spotify-proxy",
            "--config",
            "/nonexistent/proxy.yaml",
            "random-song",
        ]);
        let runner = Runner::new(cli);
        assert!(matches!(runner.load_config(), Err(Error::Config { .. })));
    }
}
