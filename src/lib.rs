// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # natstat-ingest
//!
//! Pages through the NatStat player-performance API and lands every page,
//! untouched, as a JSON object in cloud storage.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use natstat_ingest::{IngestConfig, IngestEngine, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = IngestConfig::load(None)?;
//!     let engine = IngestEngine::new(config)?;
//!     let stats = engine.run().await?;
//!     println!("stored {} pages", stats.pages_fetched);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        IngestEngine                          │
//! │        config → HttpClient + BlobPageSink → Paginator        │
//! └──────────────────────────────────────────────────────────────┘
//!                               │
//! ┌────────────────┬────────────┴─────────┬───────────────────────┐
//! │      HTTP      │      Paginate        │        Output         │
//! ├────────────────┼──────────────────────┼───────────────────────┤
//! │ GET + timeout  │ meta.Page            │ playerperfs/{date}-   │
//! │ JSON decode    │ meta.Total_Pages     │   {page}-of-{total}   │
//! │ status/elapsed │ meta.Next_Page       │ GCS / S3 / R2 / Azure │
//! └────────────────┴──────────────────────┴───────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Run configuration
pub mod config;

/// HTTP client
pub mod http;

/// Next-link pagination
pub mod pagination;

/// Object storage output
pub mod output;

/// Run orchestration
pub mod engine;

/// Console and file logging
pub mod logging;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::IngestConfig;
pub use engine::IngestEngine;
pub use error::{Error, ErrorKind, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
