//! CLI commands and argument parsing

use crate::config::IngestConfig;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// NatStat player-performance ingester
#[derive(Parser, Debug)]
#[command(name = "natstat-ingest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Log file (appended to)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch every page and store each one
    Fetch {
        #[command(flatten)]
        overrides: RunOverrides,
    },

    /// Request the first page and print its pagination metadata
    Check {
        #[command(flatten)]
        overrides: RunOverrides,
    },

    /// Print the object key a page is stored under
    Key {
        /// Current page (1-based)
        page: u32,

        /// Total pages
        total: u32,

        /// Run date (defaults to today, UTC)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Key prefix
        #[arg(long, default_value = crate::config::DEFAULT_KEY_PREFIX)]
        prefix: String,
    },
}

/// Flags that override config file and environment values
#[derive(Args, Debug, Clone, Default)]
pub struct RunOverrides {
    /// First request URL
    #[arg(long)]
    pub base_url: Option<String>,

    /// Earliest date to fetch (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// Page size hint
    #[arg(long)]
    pub max: Option<u32>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Output destination (local path or cloud URL)
    /// Supports: /path, gs://bucket/path, s3://bucket/path, r2://bucket/path, az://container/path, memory://
    #[arg(short, long)]
    pub output: Option<String>,

    /// Object key prefix
    #[arg(long)]
    pub key_prefix: Option<String>,
}

impl RunOverrides {
    /// Apply the flags that were given
    pub fn apply(&self, config: &mut IngestConfig) {
        if let Some(url) = &self.base_url {
            config.base_url.clone_from(url);
        }
        if let Some(start) = &self.start {
            config.start.clone_from(start);
        }
        if let Some(max) = self.max {
            config.max = max;
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout_secs = secs;
        }
        if let Some(output) = &self.output {
            config.destination.clone_from(output);
        }
        if let Some(prefix) = &self.key_prefix {
            config.key_prefix.clone_from(prefix);
        }
    }
}
