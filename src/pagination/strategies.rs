//! Planning and locator resolution
//!
//! The planner turns the first page into the remaining work; the collection
//! source turns locators back into request URLs.

use super::types::{AggregationPlan, NextPage, PageLocator, PageResult, PaginationState};
use crate::error::Result;
use tracing::warn;
use url::Url;

/// Query parameter carrying the page size
pub const LIMIT_PARAM: &str = "limit";

/// Query parameter carrying the offset
pub const OFFSET_PARAM: &str = "offset";

// ============================================================================
// Pagination Planner
// ============================================================================

/// Derives the remaining fetches from the first page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPlanner {
    /// Items requested per page
    pub page_size: u32,
}

impl PaginationPlanner {
    /// Create a planner for the given page size
    pub fn new(page_size: u32) -> Self {
        Self { page_size }
    }

    /// `ceil(total / page_size)`
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.page_size.max(1)))
    }

    /// Offsets for pages `1 .. total_pages`
    ///
    /// Empty when the first page already holds the whole collection. Offsets
    /// that do not fit the `offset` parameter are left out of the plan.
    pub fn plan_offsets(&self, first: &PageResult) -> AggregationPlan {
        let page_size = u64::from(self.page_size.max(1));
        let total_pages = self.total_pages(first.total);
        let locators: Vec<PageLocator> = (1..total_pages)
            .map_while(|page| u32::try_from(page * page_size).ok())
            .map(PageLocator::offset)
            .collect();

        let planned_pages = locators.len() as u64 + 1;
        if planned_pages < total_pages {
            warn!(
                total = first.total,
                total_pages,
                planned_pages,
                "Reported total exceeds the largest requestable offset, plan truncated"
            );
        }

        AggregationPlan::new(locators)
    }

    /// Decide what follows `page` in a cursor walk
    ///
    /// Stops when `next` is absent or points at a cursor already followed.
    pub fn next_page(&self, page: &PageResult, state: &mut PaginationState) -> NextPage {
        let Some(next) = page.next.as_deref() else {
            state.mark_done();
            return NextPage::Done;
        };

        if !state.visit(next) {
            warn!(cursor = next, "Upstream repeated a cursor, stopping walk");
            state.mark_done();
            return NextPage::Done;
        }

        NextPage::Continue(PageLocator::cursor(next))
    }
}

// ============================================================================
// Collection Source
// ============================================================================

/// A paginated upstream collection addressed by URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionSource {
    url: Url,
    page_size: u32,
}

impl CollectionSource {
    /// Create a source for the collection at `url`
    pub fn new(url: Url, page_size: u32) -> Self {
        Self { url, page_size }
    }

    /// Parse the collection URL
    pub fn parse(url: &str, page_size: u32) -> Result<Self> {
        Ok(Self::new(Url::parse(url)?, page_size))
    }

    /// Collection URL without paging parameters applied
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// URL of the first page
    pub fn first_page(&self) -> Url {
        self.offset_url(0)
    }

    /// Turn a locator into a request URL
    pub fn resolve(&self, locator: &PageLocator) -> Result<Url> {
        match locator {
            PageLocator::Offset { offset } => Ok(self.offset_url(*offset)),
            PageLocator::Cursor(next) => Ok(Url::parse(next)?),
        }
    }

    fn offset_url(&self, offset: u32) -> Url {
        let mut url = self.url.clone();
        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != LIMIT_PARAM && key != OFFSET_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        url.query_pairs_mut()
            .clear()
            .extend_pairs(retained)
            .append_pair(LIMIT_PARAM, &self.page_size.to_string())
            .append_pair(OFFSET_PARAM, &offset.to_string());
        url
    }
}
