//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, RunOverrides};
use crate::config::IngestConfig;
use crate::engine::IngestEngine;
use crate::error::{Error, Result};
use crate::logging;
use crate::output::page_object_key;
use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Fetch { overrides } => self.fetch(overrides).await,
            Commands::Check { overrides } => self.check(overrides).await,
            Commands::Key {
                page,
                total,
                date,
                prefix,
            } => {
                let date = date.unwrap_or_else(|| Utc::now().date_naive());
                println!("{}", object_key(prefix, date, *page, *total)?);
                Ok(())
            }
        }
    }

    /// Layer file, environment and flags into one config
    ///
    /// Not validated here; [`IngestEngine::new`] does that.
    pub fn load_config(&self, overrides: &RunOverrides) -> Result<IngestConfig> {
        let mut config = IngestConfig::load(self.cli.config.as_deref())?;
        overrides.apply(&mut config);
        if let Some(path) = &self.cli.log_file {
            config.log_file.clone_from(path);
        }
        Ok(config)
    }

    /// Load config and start logging to its log file
    fn prepare(&self, overrides: &RunOverrides) -> Result<IngestConfig> {
        let config = self.load_config(overrides)?;
        logging::init(&config.log_file, self.cli.verbose)?;
        Ok(config)
    }

    /// Full run
    async fn fetch(&self, overrides: &RunOverrides) -> Result<()> {
        let config = self.prepare(overrides)?;
        let engine = IngestEngine::new(config)?;

        let stats = engine.run().await?;
        info!(
            "Stored {} page(s), last page {}/{}, stopped on {:?}",
            stats.pages_fetched, stats.last_page, stats.total_pages, stats.stop_reason
        );
        Ok(())
    }

    /// First page only
    async fn check(&self, overrides: &RunOverrides) -> Result<()> {
        let config = self.prepare(overrides)?;
        let engine = IngestEngine::new(config)?;

        let (meta, status) = engine.check().await?;
        println!(
            "{}",
            json!({
                "status": status,
                "page": meta.page,
                "total_pages": meta.total_pages,
                "next_page": meta.next_page,
            })
        );
        Ok(())
    }
}

/// Key for one page, rejecting page numbers no run could store
fn object_key(prefix: &str, date: NaiveDate, page: u32, total: u32) -> Result<String> {
    if page == 0 || page > total {
        return Err(Error::config(format!(
            "page must be between 1 and total ({total}), got {page}"
        )));
    }
    Ok(page_object_key(prefix, date, page, total))
}
