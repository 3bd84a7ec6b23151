//! Log setup
//!
//! Every event goes to stdout and is appended to a log file. Both outputs
//! carry timestamp, level, thread name and message. `RUST_LOG` still
//! applies on top of the default level.

use crate::error::{Error, Result, ResultExt};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Open (or create) the log file in append mode
pub fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))
}

/// Build a subscriber writing to stdout and to `file`
pub fn subscriber(file: File, level: Level) -> impl tracing::Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let console = fmt::layer().with_thread_names(true).with_target(false);

    let persistent = fmt::layer()
        .with_ansi(false)
        .with_thread_names(true)
        .with_target(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(persistent)
}

/// Install the global subscriber
pub fn init(log_file: &Path, verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let file = open_log_file(log_file)?;

    tracing::subscriber::set_global_default(subscriber(file, level))
        .map_err(|e| Error::config(format!("Failed to install logger: {e}")))?;

    tracing::info!("Logging initialized. Log file: {}", log_file.display());
    Ok(())
}
