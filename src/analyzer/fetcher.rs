//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made during an analysis:
//! - Building an HTTP client with a browser-like user agent
//! - GET of the page under analysis, bounded by the overall timeout
//! - GET of each image to measure its size, bounded by the probe timeout
//! - Classification of transport failures

use crate::config::{AnalyzerConfig, Config};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Connection setup never waits longer than this, whatever the overall bound
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Why a single fetch failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request exceeded its time bound
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status
    #[error("HTTP {status} {reason}")]
    Status { status: u16, reason: String },

    /// The request went out but no response came back
    #[error("no response: {0}")]
    Unreachable(String),

    /// Anything else (request construction, decoding, redirects)
    #[error("{0}")]
    Other(String),
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: String,
    /// HTTP status code
    pub status_code: u16,
    /// Content-Type header value, empty when absent
    pub content_type: String,
    /// Page body
    pub body: String,
}

/// The network operations an analysis needs
///
/// [`HttpFetcher`] is the real implementation; tests substitute their own.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the page under analysis
    async fn fetch_page(&self, url: &Url) -> Result<FetchedPage, FetchError>;

    /// Downloads an image and returns its size in bytes
    async fn probe_size(&self, url: &Url) -> Result<u64, FetchError>;
}

/// reqwest-backed [`Fetcher`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    page_timeout: Duration,
    probe_timeout: Duration,
}

impl HttpFetcher {
    /// Creates a fetcher with a client built from the configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(client, &config.analyzer))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, config: &AnalyzerConfig) -> Self {
        Self {
            client,
            page_timeout: Duration::from_millis(config.overall_timeout_ms),
            probe_timeout: Duration::from_millis(config.probe_timeout_ms),
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_page(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(self.page_timeout)
            .send()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response
            .text()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            content_type,
            body,
        })
    }

    async fn probe_size(&self, url: &Url) -> Result<u64, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(self.probe_timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| classify_reqwest_error(&e))?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify_reqwest_error(&e))?;

        Ok(bytes.len() as u64)
    }
}

/// Builds an HTTP client with proper configuration
///
/// The client follows redirects with reqwest's default policy and
/// transparently decompresses gzip and brotli bodies. Per-request timeouts
/// are applied by [`HttpFetcher`].
///
/// # Example
///
/// ```no_run
/// use sumi_lens::analyzer::build_http_client;
/// use sumi_lens::config::Config;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let overall = Duration::from_millis(config.analyzer.overall_timeout_ms);

    Client::builder()
        .user_agent(config.user_agent.value.as_str())
        .timeout(overall)
        .connect_timeout(overall.min(MAX_CONNECT_TIMEOUT))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Maps a reqwest error onto [`FetchError`]
///
/// | Condition | Result |
/// |-----------|--------|
/// | Timeout (connect or total) | `Timeout` |
/// | Non-success status | `Status` |
/// | DNS failure, refused or reset connection, broken body | `Unreachable` |
/// | Builder, redirect or decode errors | `Other` |
pub fn classify_reqwest_error(e: &reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if let Some(status) = e.status() {
        FetchError::Status {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
        }
    } else if e.is_connect() || e.is_request() || e.is_body() {
        FetchError::Unreachable(e.to_string())
    } else {
        FetchError::Other(e.to_string())
    }
}
