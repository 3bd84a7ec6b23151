//! Execution engine module
//!
//! Wires a validated [`IngestConfig`] to the HTTP client, the page sink and
//! the paginator.
//!
//! # Overview
//!
//! - `IngestEngine::new` validates the config before anything touches the
//!   network, then resolves the destination
//! - `IngestEngine::run` performs one full run
//! - `IngestEngine::check` requests the first page only

use crate::config::IngestConfig;
use crate::error::Result;
use crate::http::{HttpClient, HttpClientConfig};
use crate::output::{BlobPageSink, CloudDestination};
use crate::pagination::{probe, PageMeta, Paginator, RunStats};
use chrono::{NaiveDate, Utc};
use tracing::info;

/// One configured ingestion job
#[derive(Debug, Clone)]
pub struct IngestEngine {
    config: IngestConfig,
    destination: CloudDestination,
    run_date: NaiveDate,
}

impl IngestEngine {
    /// Validate the config and open its destination
    pub fn new(config: IngestConfig) -> Result<Self> {
        config.validate()?;
        let destination = CloudDestination::parse(&config.destination)?;
        Ok(Self::assemble(config, destination))
    }

    /// Validate the config and use an already-open destination
    pub fn with_destination(config: IngestConfig, destination: CloudDestination) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(config, destination))
    }

    fn assemble(config: IngestConfig, destination: CloudDestination) -> Self {
        Self {
            config,
            destination,
            run_date: Utc::now().date_naive(),
        }
    }

    /// Pin the date used in object keys
    #[must_use]
    pub fn with_run_date(mut self, run_date: NaiveDate) -> Self {
        self.run_date = run_date;
        self
    }

    /// Get the configuration
    pub fn config(&self) -> &IngestConfig {
        &self.config
    }

    /// Get the destination
    pub fn destination(&self) -> &CloudDestination {
        &self.destination
    }

    /// Get the run date
    pub fn run_date(&self) -> NaiveDate {
        self.run_date
    }

    fn client(&self) -> Result<HttpClient> {
        HttpClient::with_config(
            HttpClientConfig::builder()
                .timeout(self.config.timeout())
                .build(),
        )
    }

    /// Fetch every page and store each one
    pub async fn run(&self) -> Result<RunStats> {
        info!(
            "Writing pages to {}:// as {}/{}-*.json",
            self.destination.scheme(),
            self.config.key_prefix,
            self.run_date
        );

        let sink = BlobPageSink::new(
            self.destination.clone(),
            self.config.key_prefix.clone(),
            self.run_date,
        );
        let paginator = Paginator::new(self.client()?, sink);

        paginator
            .run(&self.config.base_url, &self.config.fixed_params())
            .await
    }

    /// Request the first page only; nothing is stored
    pub async fn check(&self) -> Result<(PageMeta, u16)> {
        let client = self.client()?;
        probe(&client, &self.config.base_url, &self.config.fixed_params()).await
    }
}

#[cfg(test)]
mod tests;
