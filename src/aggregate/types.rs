//! Aggregation types
//!
//! Policy, configuration, state and statistics for one aggregation call.

use crate::error::{Error, Result};
use crate::types::RawItem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// How the pages after the first one are fetched
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum AggregationPolicy {
    /// Planned offsets fetched in concurrent windows
    #[default]
    Parallel,
    /// Follow upstream `next` cursors one page at a time
    Sequential,
}

impl fmt::Display for AggregationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parallel => write!(f, "parallel"),
            Self::Sequential => write!(f, "sequential"),
        }
    }
}

/// Configuration for an aggregation call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationConfig {
    /// Items requested per page
    pub page_size: u32,
    /// Concurrent requests per window
    pub window_size: usize,
    /// Pause between windows
    pub window_delay: Duration,
    /// Fetch policy
    pub policy: AggregationPolicy,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            page_size: 50,
            window_size: 10,
            window_delay: Duration::from_millis(10),
            policy: AggregationPolicy::Parallel,
        }
    }
}

impl AggregationConfig {
    /// Create a builder
    pub fn builder() -> AggregationConfigBuilder {
        AggregationConfigBuilder::default()
    }

    /// Reject sizes that cannot make progress
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::config("page_size must be at least 1"));
        }
        if self.window_size == 0 {
            return Err(Error::config("window_size must be at least 1"));
        }
        Ok(())
    }
}

/// Builder for [`AggregationConfig`]
#[derive(Debug, Default)]
pub struct AggregationConfigBuilder {
    config: AggregationConfig,
}

impl AggregationConfigBuilder {
    /// Set page size
    #[must_use]
    pub fn page_size(mut self, size: u32) -> Self {
        self.config.page_size = size;
        self
    }

    /// Set window size
    #[must_use]
    pub fn window_size(mut self, size: usize) -> Self {
        self.config.window_size = size;
        self
    }

    /// Set the pause between windows
    #[must_use]
    pub fn window_delay(mut self, delay: Duration) -> Self {
        self.config.window_delay = delay;
        self
    }

    /// Set the fetch policy
    #[must_use]
    pub fn policy(mut self, policy: AggregationPolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Build the config
    pub fn build(self) -> AggregationConfig {
        self.config
    }
}

/// Phases of an aggregation call, reported in logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationState {
    /// Nothing fetched yet
    Start,
    /// Fetching page 0
    FetchingFirst,
    /// Sequential cursor walk
    Draining,
    /// Windowed offset fetches
    BatchFetching,
    /// Every planned page fetched
    Done,
    /// Aborted by an error
    Failed,
}

impl fmt::Display for AggregationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::FetchingFirst => "fetching_first",
            Self::Draining => "draining",
            Self::BatchFetching => "batch_fetching",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Statistics from an aggregation call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationStats {
    /// Pages fetched, the first page included
    pub pages_fetched: usize,
    /// Concurrent windows dispatched
    pub windows: usize,
    /// Items accumulated
    pub items: usize,
    /// Duration in milliseconds
    pub duration_ms: u64,
}

impl AggregationStats {
    /// Create new stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a page and its items
    pub fn add_page(&mut self, items: usize) {
        self.pages_fetched += 1;
        self.items += items;
    }

    /// Add a window
    pub fn add_window(&mut self) {
        self.windows += 1;
    }

    /// Set duration
    pub fn set_duration(&mut self, ms: u64) {
        self.duration_ms = ms;
    }
}

/// Every item of a collection, in upstream order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AggregatedCollection {
    /// Items, page 0 first
    pub items: Vec<RawItem>,
    /// Total reported by the first page
    pub total: u64,
    /// How the items were obtained
    pub stats: AggregationStats,
}

impl AggregatedCollection {
    /// Number of items collected
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if nothing was collected
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check whether the item count matches the reported total
    pub fn is_complete(&self) -> bool {
        self.items.len() as u64 == self.total
    }

    /// Take the items
    pub fn into_items(self) -> Vec<RawItem> {
        self.items
    }
}
