//! HTTP client for the statistics API
//!
//! Wraps a single `reqwest::Client` so every page of a run shares one
//! connection pool. Requests are sent once: there is no retry layer, and
//! every failure is mapped onto the crate error taxonomy with the URL
//! attached.

use crate::config::API_KEY_PARAM;
use crate::error::{Error, Result};
use crate::pagination::PageFetcher;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
            user_agent: format!("natstat-ingest/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// Configuration for a single request
#[derive(Debug, Clone, Default)]
pub struct RequestConfig {
    /// Query parameters, appended in order
    pub query: Vec<(String, String)>,
}

impl RequestConfig {
    /// Create a new request config
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Add several query parameters
    #[must_use]
    pub fn query_pairs(mut self, pairs: &[(String, String)]) -> Self {
        self.query.extend(pairs.iter().cloned());
        self
    }
}

/// Mask the API key in a URL before it reaches a log line or error
///
/// Server-supplied next links carry the key in their query string.
/// Anything that does not parse as a URL is returned unchanged.
pub fn redact_url(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };
    if !parsed.query_pairs().any(|(k, _)| k == API_KEY_PARAM) {
        return url.to_string();
    }

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == API_KEY_PARAM { "REDACTED".into() } else { v };
            (k.into_owned(), v.into_owned())
        })
        .collect();
    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.to_string()
}

/// A decoded JSON response together with its transport details
#[derive(Debug, Clone)]
pub struct JsonResponse {
    /// URL the request was sent to (before query parameters)
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// Time from send to fully decoded body
    pub elapsed: Duration,
    /// Decoded body
    pub body: Value,
}

/// HTTP client shared by every request of a run
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Make a GET request
    ///
    /// Non-success statuses are returned as [`Error::HttpStatus`].
    pub async fn get(&self, url: &str, config: RequestConfig) -> Result<Response> {
        let mut req = self.client.get(url);
        if !config.query.is_empty() {
            req = req.query(&config.query);
        }

        let response = req
            .send()
            .await
            .map_err(|e| transport_error(url, self.config.timeout, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(redact_url(url), status.as_u16(), body));
        }

        debug!("Request succeeded: GET {} ({})", redact_url(url), status.as_u16());
        Ok(response)
    }

    /// Make a GET request and decode the body as JSON
    ///
    /// A body that is not valid JSON is an [`Error::MalformedResponse`].
    pub async fn get_json(&self, url: &str, config: RequestConfig) -> Result<JsonResponse> {
        let started = Instant::now();

        let response = self.get(url, config).await?;
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| transport_error(url, self.config.timeout, e))?;

        let body: Value = serde_json::from_str(&text).map_err(|e| {
            Error::malformed(redact_url(url), format!("body is not valid JSON: {e}"))
        })?;

        Ok(JsonResponse {
            url: url.to_string(),
            status,
            elapsed: started.elapsed(),
            body,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch(&self, url: &str, query: &[(String, String)]) -> Result<JsonResponse> {
        self.get_json(url, RequestConfig::new().query_pairs(query))
            .await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Classify a reqwest failure
///
/// reqwest's own message embeds the full request URL, query included, so it
/// is dropped in favour of the redacted one.
fn transport_error(url: &str, timeout: Duration, e: reqwest::Error) -> Error {
    let url = redact_url(url);
    if e.is_timeout() {
        Error::Timeout {
            url,
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        Error::Transport {
            url,
            source: e.without_url(),
        }
    }
}
