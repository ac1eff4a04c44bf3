//! Response decoder module
//!
//! # Overview
//!
//! Upstream collection endpoints answer with `{ items, total, next }` on
//! success and an `error` envelope on failure, sometimes with a 200 status.
//! The decoder sorts every response into a [`PageOutcome`] or a transport
//! error.

mod envelope;
mod types;

pub use envelope::{decode_page, error_message};
pub use types::{PageOutcome, UpstreamRejection};
