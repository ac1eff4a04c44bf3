//! Paginated resource aggregator
//!
//! Turns a server-side paginated collection into one ordered result set.
//!
//! # Overview
//!
//! Page 0 is always fetched first; its `total` drives the planner. After
//! that one of two policies takes over:
//! - `Parallel` - the planned offsets are split into windows of
//!   `window_size` requests. A window is dispatched as a whole, joined, and
//!   appended in offset order before the next one starts after
//!   `window_delay`.
//! - `Sequential` - `next` cursors are followed one page at a time until
//!   upstream stops handing them out.
//!
//! The first rejection or transport error aborts the call and no items are
//! returned.

mod types;

pub use types::{
    AggregatedCollection, AggregationConfig, AggregationConfigBuilder, AggregationPolicy,
    AggregationState, AggregationStats,
};

use crate::error::Result;
use crate::fetch::PageFetcher;
use crate::pagination::{
    CollectionSource, NextPage, PageLocator, PageResult, PaginationPlanner, PaginationState,
};
use crate::types::RawItem;
use futures::future::join_all;
use std::time::Instant;
use tracing::{debug, info, warn};
use url::Url;

/// Aggregates collections through a [`PageFetcher`]
#[derive(Debug, Clone)]
pub struct Aggregator<F> {
    fetcher: F,
    config: AggregationConfig,
}

impl<F: PageFetcher> Aggregator<F> {
    /// Create an aggregator with the default config
    pub fn new(fetcher: F) -> Self {
        Self::with_config(fetcher, AggregationConfig::default())
    }

    /// Create an aggregator with the given config
    pub fn with_config(fetcher: F, config: AggregationConfig) -> Self {
        Self { fetcher, config }
    }

    /// Fetch every item of the collection at `collection_url`
    ///
    /// `limit` and `offset` on the URL are managed by the aggregator; any
    /// other query parameters are kept on every page request.
    pub async fn aggregate(
        &self,
        collection_url: &Url,
        credential: &str,
    ) -> Result<AggregatedCollection> {
        self.config.validate()?;

        let start = Instant::now();
        let source = CollectionSource::new(collection_url.clone(), self.config.page_size);
        let mut stats = AggregationStats::new();

        debug!(
            state = %AggregationState::Start,
            policy = %self.config.policy,
            url = %source.url(),
            "Starting aggregation"
        );

        let result = self.run(&source, credential, &mut stats).await;
        stats.set_duration(start.elapsed().as_millis() as u64);

        match result {
            Ok((items, total)) => {
                if items.len() as u64 != total {
                    debug!(
                        collected = items.len(),
                        total, "Collected count differs from reported total"
                    );
                }
                info!(
                    state = %AggregationState::Done,
                    "Aggregated {} of {} items in {} pages ({}ms)",
                    items.len(),
                    total,
                    stats.pages_fetched,
                    stats.duration_ms
                );
                Ok(AggregatedCollection {
                    items,
                    total,
                    stats,
                })
            }
            Err(e) => {
                warn!(
                    state = %AggregationState::Failed,
                    pages = stats.pages_fetched,
                    "Aggregation failed: {e}"
                );
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        source: &CollectionSource,
        credential: &str,
        stats: &mut AggregationStats,
    ) -> Result<(Vec<RawItem>, u64)> {
        let planner = PaginationPlanner::new(self.config.page_size);

        debug!(state = %AggregationState::FetchingFirst, "Fetching first page");
        let first = self.fetch_page(&source.first_page(), credential).await?;
        stats.add_page(first.len());

        let total = first.total;
        info!(
            "Total items: {total}, total pages: {}",
            planner.total_pages(total)
        );

        let items = match self.config.policy {
            AggregationPolicy::Parallel => {
                let plan = planner.plan_offsets(&first);
                let mut items = first.items;
                self.fetch_windows(source, plan.locators(), credential, total, &mut items, stats)
                    .await?;
                items
            }
            AggregationPolicy::Sequential => {
                self.walk_cursor(source, &planner, first, credential, stats)
                    .await?
            }
        };

        Ok((items, total))
    }

    /// Parallel policy: dispatch each window whole, then append in offset order
    async fn fetch_windows(
        &self,
        source: &CollectionSource,
        locators: &[PageLocator],
        credential: &str,
        total: u64,
        items: &mut Vec<RawItem>,
        stats: &mut AggregationStats,
    ) -> Result<()> {
        for (index, window) in locators.chunks(self.config.window_size).enumerate() {
            if index > 0 && !self.config.window_delay.is_zero() {
                tokio::time::sleep(self.config.window_delay).await;
            }

            let urls = window
                .iter()
                .map(|locator| source.resolve(locator))
                .collect::<Result<Vec<_>>>()?;

            debug!(
                state = %AggregationState::BatchFetching,
                window = index + 1,
                requests = urls.len(),
                "Dispatching window"
            );

            // Siblings of a failed request are still awaited before the error surfaces
            let pages = join_all(urls.iter().map(|url| self.fetch_page(url, credential))).await;
            stats.add_window();

            for page in pages {
                let page = page?;
                stats.add_page(page.len());
                items.extend(page.items);
            }

            info!(
                "Fetched {} of {} items (window {})",
                items.len(),
                total,
                index + 1
            );
        }
        Ok(())
    }

    /// Sequential policy: follow `next` until it runs out
    async fn walk_cursor(
        &self,
        source: &CollectionSource,
        planner: &PaginationPlanner,
        first: PageResult,
        credential: &str,
        stats: &mut AggregationStats,
    ) -> Result<Vec<RawItem>> {
        let mut state = PaginationState::new();
        state.visit(source.first_page().as_str());
        state.record_page(first.len());

        let mut next = planner.next_page(&first, &mut state);
        let mut items = first.items;

        while let NextPage::Continue(locator) = next {
            let url = source.resolve(&locator)?;
            let page = self.fetch_page(&url, credential).await?;
            state.record_page(page.len());
            stats.add_page(page.len());

            debug!(
                state = %AggregationState::Draining,
                page = state.pages,
                fetched = state.total_fetched,
                "Fetched page"
            );

            next = planner.next_page(&page, &mut state);
            items.extend(page.items);
        }

        Ok(items)
    }

    async fn fetch_page(&self, url: &Url, credential: &str) -> Result<PageResult> {
        self.fetcher.fetch(url, credential).await?.into_page()
    }
}
