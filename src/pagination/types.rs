//! Pagination types and traits
//!
//! The loop state is an explicit value: each fetched page folds into the
//! previous [`PaginationState`] to produce the next one, so the termination
//! rule can be exercised without any I/O.

use crate::error::{Error, Result};
use crate::http::JsonResponse;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Key of the metadata block in every response
pub const META_FIELD: &str = "meta";
/// 1-based index of the page in the response
pub const PAGE_FIELD: &str = "Page";
/// Number of pages in the result set
pub const TOTAL_PAGES_FIELD: &str = "Total_Pages";
/// Absolute URL of the following page, absent on the last one
pub const NEXT_PAGE_FIELD: &str = "Next_Page";

// ============================================================================
// Page Metadata
// ============================================================================

/// Pagination metadata extracted from one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    /// Current page (1-based)
    pub page: u32,
    /// Total pages for this query
    pub total_pages: u32,
    /// Link to the next page, if any
    pub next_page: Option<String>,
}

impl PageMeta {
    /// Extract the metadata block from a response body
    ///
    /// `Page` and `Total_Pages` may be JSON numbers or numeric strings.
    /// A null, missing or blank `Next_Page` means there is no next page.
    pub fn from_body(url: &str, body: &Value) -> Result<Self> {
        let meta = body
            .get(META_FIELD)
            .and_then(Value::as_object)
            .ok_or_else(|| Error::malformed(url, format!("missing '{META_FIELD}' object")))?;

        let page = parse_count(url, meta.get(PAGE_FIELD), PAGE_FIELD)?;
        let total_pages = parse_count(url, meta.get(TOTAL_PAGES_FIELD), TOTAL_PAGES_FIELD)?;

        if page == 0 {
            return Err(Error::malformed(url, "Page must be 1-based, got 0"));
        }
        if page > total_pages {
            return Err(Error::malformed(
                url,
                format!("Page {page} is beyond Total_Pages {total_pages}"),
            ));
        }

        let next_page = match meta.get(NEXT_PAGE_FIELD) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(Value::String(s)) => Some(s.trim().to_string()),
            Some(other) => {
                return Err(Error::malformed(
                    url,
                    format!("'{NEXT_PAGE_FIELD}' must be a string, got {other}"),
                ))
            }
        };

        Ok(Self {
            page,
            total_pages,
            next_page,
        })
    }

    /// Whether this page is the final one by count
    pub fn is_last(&self) -> bool {
        self.page == self.total_pages
    }
}

fn parse_count(url: &str, value: Option<&Value>, field: &str) -> Result<u32> {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse::<u32>().ok(),
        None | Some(Value::Null) => {
            return Err(Error::malformed(url, format!("missing '{field}'")));
        }
        Some(_) => None,
    };

    parsed.ok_or_else(|| {
        Error::malformed(
            url,
            format!("'{field}' is not a page count: {}", value.unwrap_or(&Value::Null)),
        )
    })
}

// ============================================================================
// Pagination State
// ============================================================================

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// `Page` reached `Total_Pages`
    LastPage,
    /// The response carried no `Next_Page`
    NoNextPage,
}

/// Loop state threaded through a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationState {
    /// Page reported by the last response (1 before the first fetch)
    pub current_page: u32,
    /// Total pages reported by the last response (0 before the first fetch)
    pub total_pages: u32,
    /// URL of the next request, `None` once the chain ends
    pub next_url: Option<String>,
    /// Pages fetched and stored so far
    pub pages_fetched: u32,
}

impl PaginationState {
    /// State before the first request
    pub fn initial(url: impl Into<String>) -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            next_url: Some(url.into()),
            pages_fetched: 0,
        }
    }

    /// Fixed query parameters go on the first request only
    pub fn is_first_request(&self) -> bool {
        self.pages_fetched == 0
    }

    /// Continue while the last page has not been reached and a link remains
    pub fn should_continue(&self) -> bool {
        self.current_page != self.total_pages && self.next_url.is_some()
    }

    /// Why the loop stopped, or `None` if it has not
    pub fn stop_reason(&self) -> Option<StopReason> {
        if self.current_page == self.total_pages {
            Some(StopReason::LastPage)
        } else if self.next_url.is_none() {
            Some(StopReason::NoNextPage)
        } else {
            None
        }
    }

    /// Fold one stored page into the state
    #[must_use]
    pub fn advance(self, meta: PageMeta) -> Self {
        Self {
            current_page: meta.page,
            total_pages: meta.total_pages,
            next_url: meta.next_page,
            pages_fetched: self.pages_fetched + 1,
        }
    }
}

// ============================================================================
// Run Statistics
// ============================================================================

/// Aggregate figures for a finished run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunStats {
    /// Number of pages fetched (and stored)
    pub pages_fetched: u32,
    /// Page number of the last response
    pub last_page: u32,
    /// Total pages reported by the last response
    pub total_pages: u32,
    /// Wall-clock time of the whole run
    pub elapsed: Duration,
    /// What ended the loop
    pub stop_reason: StopReason,
}

// ============================================================================
// Fetch Seam
// ============================================================================

/// Source of pages
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// GET one page; `query` is empty for every request after the first
    async fn fetch(&self, url: &str, query: &[(String, String)]) -> Result<JsonResponse>;
}
