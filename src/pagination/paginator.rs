//! Next-link paginator
//!
//! Fetches a page, stores it, then follows `meta.Next_Page` until either the
//! link disappears or `Page == Total_Pages`. One request is in flight at a
//! time and each store finishes before the next fetch starts.

use super::types::{PageFetcher, PageMeta, PaginationState, RunStats, StopReason};
use crate::error::{Error, ErrorKind, Result};
use crate::http::redact_url;
use crate::output::PageSink;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Drives one run over a fetcher and a sink
#[derive(Debug)]
pub struct Paginator<F, S> {
    fetcher: F,
    sink: S,
}

impl<F: PageFetcher, S: PageSink> Paginator<F, S> {
    /// Create a new paginator
    pub fn new(fetcher: F, sink: S) -> Self {
        Self { fetcher, sink }
    }

    /// The page source
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// The sink pages are written to
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Follow the page chain from `initial_url` to the end
    ///
    /// `fixed_params` are sent on the first request only; every later URL
    /// comes from the server and is used verbatim.
    pub async fn run(&self, initial_url: &str, fixed_params: &[(String, String)]) -> Result<RunStats> {
        info!("Calling API with url: {}", initial_url);
        let started = Instant::now();

        let mut state = PaginationState::initial(initial_url);
        while state.should_continue() {
            state = self.step(state, fixed_params).await?;
        }

        let stop_reason = state.stop_reason().unwrap_or(StopReason::NoNextPage);
        let stats = RunStats {
            pages_fetched: state.pages_fetched,
            last_page: state.current_page,
            total_pages: state.total_pages,
            elapsed: started.elapsed(),
            stop_reason,
        };

        info!(
            pages = stats.pages_fetched,
            elapsed_secs = stats.elapsed.as_secs_f64(),
            ?stop_reason,
            "Total time taken: {:.3} seconds",
            stats.elapsed.as_secs_f64()
        );
        Ok(stats)
    }

    /// Fetch, store and fold a single page
    async fn step(&self, state: PaginationState, fixed_params: &[(String, String)]) -> Result<PaginationState> {
        let Some(url) = state.next_url.clone() else {
            return Ok(state);
        };
        let query: &[(String, String)] = if state.is_first_request() {
            fixed_params
        } else {
            &[]
        };
        let expected_page = if state.is_first_request() {
            1
        } else {
            state.current_page + 1
        };

        // next links carry the key in their query
        let shown = redact_url(&url);
        if !state.is_first_request() {
            debug!(page = expected_page, "Calling API with url: {}", shown);
        }

        let response = self.fetcher.fetch(&url, query).await.inspect_err(|e| {
            error!(url = %shown, page = expected_page, "Fetch failed: {e}");
        })?;

        let meta = PageMeta::from_body(&shown, &response.body).inspect_err(|e| {
            error!(url = %shown, page = expected_page, "Unusable response: {e}");
        })?;

        if !state.is_first_request() && meta.page < state.current_page {
            let err = Error::malformed(
                &shown,
                format!(
                    "page went backwards from {} to {}",
                    state.current_page, meta.page
                ),
            );
            error!(url = %shown, page = meta.page, "{err}");
            return Err(err);
        }
        if !state.is_first_request() && meta.total_pages != state.total_pages {
            warn!(
                "Total_Pages changed from {} to {} mid-run",
                state.total_pages, meta.total_pages
            );
        }

        info!(
            status = response.status,
            page = meta.page,
            total_pages = meta.total_pages,
            elapsed_ms = response.elapsed.as_millis() as u64,
            "{} response for page {}/{} took: {:.3} seconds",
            response.status,
            meta.page,
            meta.total_pages,
            response.elapsed.as_secs_f64()
        );

        self.sink
            .store(meta.page, meta.total_pages, &response.body)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::StorageWrite => e,
                _ => Error::storage_write(format!("page {}", meta.page), e.to_string()),
            })
            .inspect_err(|e| {
                error!(url = %shown, page = meta.page, "Store failed: {e}");
            })?;

        Ok(state.advance(meta))
    }
}

/// Fetch the first page only and report its metadata, storing nothing
pub async fn probe<F: PageFetcher>(
    fetcher: &F,
    initial_url: &str,
    fixed_params: &[(String, String)],
) -> Result<(PageMeta, u16)> {
    let response = fetcher.fetch(initial_url, fixed_params).await?;
    let meta = PageMeta::from_body(initial_url, &response.body)?;
    info!(
        "{} response for page {}/{} took: {:.3} seconds",
        response.status,
        meta.page,
        meta.total_pages,
        response.elapsed.as_secs_f64()
    );
    Ok((meta, response.status))
}
