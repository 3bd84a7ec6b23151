//! Error types for natstat-ingest
//!
//! Every fallible operation in the crate returns `Result<T, Error>`.
//! Nothing is recovered locally: errors travel up to `main`, get logged
//! with whatever context they carry, and end the process with a non-zero
//! exit code.

use thiserror::Error;

/// The main error type for natstat-ingest
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },

    #[error("HTTP {status} from {url}: {body}")]
    HttpStatus {
        url: String,
        status: u16,
        body: String,
    },

    // ============================================================================
    // Response Errors
    // ============================================================================
    #[error("Malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Storage Errors
    // ============================================================================
    #[error("Failed to write object '{key}': {message}")]
    StorageWrite { key: String, message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure, timeout or non-success status while fetching
    Transport,
    /// Body was not JSON or lacked pagination metadata
    MalformedResponse,
    /// The object store rejected a write
    StorageWrite,
    /// Missing or invalid configuration, raised before any network call
    Configuration,
    /// Anything else
    Other,
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Create a malformed response error
    pub fn malformed(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a storage write error
    pub fn storage_write(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StorageWrite {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Transport { .. } | Error::Timeout { .. } | Error::HttpStatus { .. } => {
                ErrorKind::Transport
            }
            Error::MalformedResponse { .. } | Error::JsonParse(_) => ErrorKind::MalformedResponse,
            Error::StorageWrite { .. } => ErrorKind::StorageWrite,
            Error::Config { .. }
            | Error::MissingConfigField { .. }
            | Error::InvalidConfigValue { .. }
            | Error::YamlParse(_)
            | Error::InvalidUrl(_) => ErrorKind::Configuration,
            Error::Io(_) | Error::Other(_) => ErrorKind::Other,
        }
    }

    /// Check if this error happened before any network activity
    pub fn is_configuration(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}

/// Result type alias for natstat-ingest
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("NATSTAT_API_KEY");
        assert_eq!(
            err.to_string(),
            "Missing required config field: NATSTAT_API_KEY"
        );

        let err = Error::http_status("https://api.example.com/v1/x/", 404, "Not found");
        assert_eq!(
            err.to_string(),
            "HTTP 404 from https://api.example.com/v1/x/: Not found"
        );

        let err = Error::storage_write("playerperfs/2024-01-01-00001-of-00003.json", "denied");
        assert_eq!(
            err.to_string(),
            "Failed to write object 'playerperfs/2024-01-01-00001-of-00003.json': denied"
        );
    }

    #[test]
    fn test_error_kind() {
        assert_eq!(
            Error::Timeout {
                url: "u".into(),
                timeout_ms: 60_000
            }
            .kind(),
            ErrorKind::Transport
        );
        assert_eq!(Error::http_status("u", 500, "").kind(), ErrorKind::Transport);
        assert_eq!(
            Error::malformed("u", "missing meta").kind(),
            ErrorKind::MalformedResponse
        );
        assert_eq!(
            Error::storage_write("k", "quota").kind(),
            ErrorKind::StorageWrite
        );
        assert!(Error::missing_field("key").is_configuration());
        assert!(Error::config("bad").is_configuration());
        assert!(!Error::Other("x".into()).is_configuration());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
