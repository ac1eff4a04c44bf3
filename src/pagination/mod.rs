//! Pagination module
//!
//! Supports: explicit offsets (`limit`/`offset`) and opaque `next` cursors
//!
//! # Overview
//!
//! The first page of a collection decides the rest of the walk. In offset
//! mode the planner emits every remaining offset up front; in cursor mode it
//! degenerates to a predicate evaluated after each page.

mod strategies;
mod types;

pub use strategies::{CollectionSource, PaginationPlanner, LIMIT_PARAM, OFFSET_PARAM};
pub use types::{AggregationPlan, NextPage, PageLocator, PageResult, PaginationState};
