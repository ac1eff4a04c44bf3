//! Decoder types
//!
//! A decoded upstream response is either a page or a structured rejection.
//! Rejections are routine (expired tokens, unknown playlists) so they travel
//! as values rather than errors until the aggregator decides to abort.

use crate::error::{Error, Result};
use crate::pagination::PageResult;

/// Structured error envelope returned by upstream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamRejection {
    /// HTTP status the envelope arrived with (may be 200)
    pub status: u16,
    /// Upstream message, passed through verbatim
    pub message: String,
}

/// Outcome of one page fetch
#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    /// A page of items
    Page(PageResult),
    /// Upstream answered with an error envelope
    Rejected(UpstreamRejection),
}

impl PageOutcome {
    /// Create a rejection outcome
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected(UpstreamRejection {
            status,
            message: message.into(),
        })
    }

    /// Convert into a page, turning a rejection into [`Error::UpstreamRejection`]
    pub fn into_page(self) -> Result<PageResult> {
        match self {
            Self::Page(page) => Ok(page),
            Self::Rejected(rejection) => Err(Error::upstream(rejection.message)),
        }
    }
}
