//! Run configuration
//!
//! A run needs an API key, the endpoint to start from, the fixed query
//! parameters for the first request, a timeout, and a destination for the
//! stored pages. Values are layered: built-in defaults, then an optional
//! YAML file, then `NATSTAT_*` environment variables (a `.env` file is
//! honoured), then CLI flags.

use crate::error::{Error, Result, ResultExt};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Environment variable holding the API credential
pub const API_KEY_ENV: &str = "NATSTAT_API_KEY";

/// Query parameter carrying the API key
pub const API_KEY_PARAM: &str = "key";

/// Default player-performance endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.natstat.com/v1/playerperfs/NBA/";

/// Default object key prefix
pub const DEFAULT_KEY_PREFIX: &str = "playerperfs";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

// ============================================================================
// Ingest Config
// ============================================================================

/// Complete configuration for one ingestion run
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IngestConfig {
    /// API credential, sent as the `key` query parameter
    pub api_key: String,

    /// Endpoint of the first request
    pub base_url: String,

    /// Response format requested from the API
    pub format: String,

    /// Earliest date to fetch (ISO 8601)
    pub start: String,

    /// Page size hint
    pub max: u32,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Where pages are written (gs://, s3://, r2://, az://, memory://, or a local path)
    pub destination: String,

    /// First path segment of every object key
    pub key_prefix: String,

    /// Persistent log file
    pub log_file: PathBuf,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            format: "json".to_string(),
            start: "2010-10-26".to_string(),
            max: 1000,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            destination: "gs://natstat-nba-data".to_string(),
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            log_file: PathBuf::from("natstat-api-calls.log"),
        }
    }
}

impl std::fmt::Debug for IngestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key = if self.api_key.is_empty() {
            "<unset>"
        } else {
            "<redacted>"
        };
        f.debug_struct("IngestConfig")
            .field("api_key", &key)
            .field("base_url", &self.base_url)
            .field("format", &self.format)
            .field("start", &self.start)
            .field("max", &self.max)
            .field("timeout_secs", &self.timeout_secs)
            .field("destination", &self.destination)
            .field("key_prefix", &self.key_prefix)
            .field("log_file", &self.log_file)
            .finish()
    }
}

impl IngestConfig {
    /// Load a config from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content)
    }

    /// Parse a config from YAML text; absent fields take their defaults
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Build a config from defaults (or a YAML file) plus the process environment
    ///
    /// Reads `.env` first if present. Does not validate.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Overlay `NATSTAT_*` variables using the given lookup
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup(API_KEY_ENV) {
            self.api_key = key;
        }
        if let Some(url) = lookup("NATSTAT_BASE_URL") {
            self.base_url = url;
        }
        if let Some(start) = lookup("NATSTAT_START") {
            self.start = start;
        }
        if let Some(max) = lookup("NATSTAT_MAX") {
            self.max = parse_number("NATSTAT_MAX", &max)?;
        }
        if let Some(secs) = lookup("NATSTAT_TIMEOUT_SECS") {
            self.timeout_secs = parse_number("NATSTAT_TIMEOUT_SECS", &secs)?;
        }
        if let Some(dest) = lookup("NATSTAT_DESTINATION") {
            self.destination = dest;
        }
        if let Some(prefix) = lookup("NATSTAT_KEY_PREFIX") {
            self.key_prefix = prefix;
        }
        if let Some(file) = lookup("NATSTAT_LOG_FILE") {
            self.log_file = PathBuf::from(file);
        }
        Ok(())
    }

    /// Check the config before any network activity
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::missing_field(API_KEY_ENV));
        }

        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base_url must be http(s), got '{}'",
                url.scheme()
            )));
        }

        NaiveDate::parse_from_str(&self.start, "%Y-%m-%d").map_err(|e| {
            Error::config(format!("start must be YYYY-MM-DD, got '{}': {e}", self.start))
        })?;

        if self.max == 0 {
            return Err(Error::config("max must be greater than zero"));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than zero"));
        }
        if self.destination.trim().is_empty() {
            return Err(Error::missing_field("destination"));
        }
        if self.key_prefix.trim_matches('/').is_empty() {
            return Err(Error::missing_field("key_prefix"));
        }
        Ok(())
    }

    /// Query parameters attached to the first request only
    pub fn fixed_params(&self) -> Vec<(String, String)> {
        vec![
            (API_KEY_PARAM.to_string(), self.api_key.clone()),
            ("format".to_string(), self.format.clone()),
            ("start".to_string(), self.start.clone()),
            ("max".to_string(), self.max.to_string()),
        ]
    }

    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_number<T: std::str::FromStr>(field: &str, raw: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    raw.trim().parse().map_err(|e| Error::InvalidConfigValue {
        field: field.to_string(),
        message: format!("'{raw}': {e}"),
    })
}
