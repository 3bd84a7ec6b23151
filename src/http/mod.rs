//! HTTP client module
//!
//! A thin wrapper over `reqwest` that sends each request exactly once,
//! decodes JSON bodies, and reports status and elapsed time.

mod client;

pub use client::{
    redact_url, HttpClient, HttpClientConfig, HttpClientConfigBuilder, JsonResponse, RequestConfig,
};
