//! Pagination module
//!
//! Follows a server-supplied `Next_Page` link chain.
//!
//! # Overview
//!
//! Every response carries a `meta` block with `Page`, `Total_Pages` and an
//! optional `Next_Page`. The first request goes to the base endpoint with the
//! fixed query parameters; every later request uses `Next_Page` untouched.
//! The loop ends when `Page == Total_Pages` or when no link is left.

mod paginator;
mod types;

pub use paginator::{probe, Paginator};
pub use types::{
    PageFetcher, PageMeta, PaginationState, RunStats, StopReason, META_FIELD, NEXT_PAGE_FIELD,
    PAGE_FIELD, TOTAL_PAGES_FIELD,
};
