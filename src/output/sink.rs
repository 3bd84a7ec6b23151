//! Page sink: one stored object per fetched page

use super::cloud::CloudDestination;
use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{NaiveDate, Utc};
use serde_json::Value;
use tracing::debug;

/// Build the object key for a page
///
/// Format: `{prefix}/{YYYY-MM-DD}-{page:05}-of-{total:05}.json`
///
/// Example: `playerperfs/2024-01-01-00002-of-00003.json`
pub fn page_object_key(prefix: &str, date: NaiveDate, current_page: u32, total_pages: u32) -> String {
    format!(
        "{}/{}-{current_page:05}-of-{total_pages:05}.json",
        prefix.trim_end_matches('/'),
        date.format("%Y-%m-%d")
    )
}

/// Destination for fetched pages
#[async_trait]
pub trait PageSink: Send + Sync {
    /// Persist one page, returning the key it was stored under
    async fn store(&self, current_page: u32, total_pages: u32, payload: &Value) -> Result<String>;
}

/// Writes each page as a JSON object into a [`CloudDestination`]
#[derive(Debug, Clone)]
pub struct BlobPageSink {
    destination: CloudDestination,
    key_prefix: String,
    run_date: NaiveDate,
}

impl BlobPageSink {
    /// Create a sink with an explicit run date
    pub fn new(destination: CloudDestination, key_prefix: impl Into<String>, run_date: NaiveDate) -> Self {
        Self {
            destination,
            key_prefix: key_prefix.into(),
            run_date,
        }
    }

    /// Create a sink dated with today's UTC date
    pub fn starting_today(destination: CloudDestination, key_prefix: impl Into<String>) -> Self {
        Self::new(destination, key_prefix, Utc::now().date_naive())
    }

    /// The date every key of this run carries
    pub fn run_date(&self) -> NaiveDate {
        self.run_date
    }

    /// The underlying destination
    pub fn destination(&self) -> &CloudDestination {
        &self.destination
    }

    /// Key a page would be stored under
    pub fn key_for(&self, current_page: u32, total_pages: u32) -> String {
        page_object_key(&self.key_prefix, self.run_date, current_page, total_pages)
    }
}

#[async_trait]
impl PageSink for BlobPageSink {
    async fn store(&self, current_page: u32, total_pages: u32, payload: &Value) -> Result<String> {
        let key = self.key_for(current_page, total_pages);
        let data = serde_json::to_vec(payload).map_err(|e| Error::storage_write(&key, e.to_string()))?;

        let location = self.destination.write(&key, Bytes::from(data)).await?;
        debug!("Stored page {}/{} at {}", current_page, total_pages, location);
        Ok(key)
    }
}
