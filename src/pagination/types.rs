//! Pagination types
//!
//! Locators, decoded pages and the plan derived from the first page.

use crate::types::RawItem;
use std::collections::HashSet;
use url::Url;

/// Identifies one page of an upstream collection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PageLocator {
    /// Explicit offset, always a multiple of the page size
    Offset {
        /// Index of the first item on the page
        offset: u32,
    },
    /// Opaque continuation URL handed out by upstream
    Cursor(String),
}

impl PageLocator {
    /// Create an offset locator
    pub fn offset(offset: u32) -> Self {
        Self::Offset { offset }
    }

    /// Create a cursor locator
    pub fn cursor(next: impl Into<String>) -> Self {
        Self::Cursor(next.into())
    }

    /// Offset of this locator, if it is one
    pub fn as_offset(&self) -> Option<u32> {
        match self {
            Self::Offset { offset } => Some(*offset),
            Self::Cursor(_) => None,
        }
    }
}

/// One decoded page of a collection
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageResult {
    /// Items in upstream order
    pub items: Vec<RawItem>,
    /// Reported size of the whole collection
    pub total: u64,
    /// Continuation URL, `None` once the chain is exhausted
    pub next: Option<String>,
}

impl PageResult {
    /// Create a page result
    pub fn new(items: Vec<RawItem>, total: u64, next: Option<String>) -> Self {
        Self { items, total, next }
    }

    /// Number of items on this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page carries no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Result of the next page computation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextPage {
    /// Fetch this locator next
    Continue(PageLocator),
    /// No more pages
    Done,
}

impl NextPage {
    /// Check if this is a done result
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Check if this is a continue result
    pub fn is_continue(&self) -> bool {
        matches!(self, Self::Continue(_))
    }
}

/// Remaining offset fetches after the first page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregationPlan {
    /// Offsets for pages `1..total_pages`, ascending
    pub locators: Vec<PageLocator>,
}

impl AggregationPlan {
    /// Create a plan over the given locators
    pub fn new(locators: Vec<PageLocator>) -> Self {
        Self { locators }
    }

    /// Planned locators
    pub fn locators(&self) -> &[PageLocator] {
        &self.locators
    }

    /// Number of planned fetches
    pub fn planned_len(&self) -> usize {
        self.locators.len()
    }

    /// Check if there is nothing left to fetch
    pub fn is_complete(&self) -> bool {
        self.locators.is_empty()
    }
}

/// State tracked while walking a collection
#[derive(Debug, Clone, Default)]
pub struct PaginationState {
    /// Pages fetched so far, the first page included
    pub pages: usize,
    /// Items accumulated so far
    pub total_fetched: u64,
    /// Cursors already followed
    visited: HashSet<String>,
    /// Whether pagination is complete
    pub done: bool,
}

impl PaginationState {
    /// Create a new pagination state
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a fetched page
    pub fn record_page(&mut self, items: usize) {
        self.pages += 1;
        self.total_fetched += items as u64;
    }

    /// Remember a cursor; returns `false` when it was seen before
    pub fn visit(&mut self, cursor: &str) -> bool {
        self.visited.insert(cursor_key(cursor))
    }

    /// Check if a cursor was already followed
    pub fn has_visited(&self, cursor: &str) -> bool {
        self.visited.contains(&cursor_key(cursor))
    }

    /// Mark pagination as done
    pub fn mark_done(&mut self) {
        self.done = true;
    }
}

/// Cursors naming the same page with reordered query parameters share a key
fn cursor_key(cursor: &str) -> String {
    let Ok(mut url) = Url::parse(cursor) else {
        return cursor.to_string();
    };

    let mut pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    if !pairs.is_empty() {
        pairs.sort();
        url.query_pairs_mut().clear().extend_pairs(pairs);
    }
    url.into()
}
