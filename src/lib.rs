//! Sumi-Lens: a single-page asset and link survey
//!
//! This crate fetches one web page, scans its markup and reports the images
//! it references (grouped by file extension, with byte sizes measured by
//! concurrent probes) and the links it contains, split into internal and
//! external sets relative to the page's host.

pub mod analyzer;
pub mod config;
pub mod output;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Lens operations
#[derive(Debug, Error)]
pub enum LensError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Analysis failed: {0}")]
    Analysis(#[from] AnalysisError),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to render TOML: {0}")]
    Render(#[from] toml::ser::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
///
/// These are produced per reference and never abort an analysis.
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Empty URL reference")]
    Empty,
}

/// Failures that abort a whole analysis
///
/// Only page-level problems end up here. Bad `src`/`href` values and failed
/// image probes are absorbed where they happen.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("URL is required")]
    MissingInput,

    #[error("Request to {url} timed out")]
    UpstreamTimeout { url: String },

    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamHttp {
        url: String,
        status: u16,
        reason: String,
    },

    #[error("No response received from {url}: {details}")]
    UpstreamUnreachable { url: String, details: String },

    #[error("Error processing URL: {details}")]
    LocalProcessing { details: String },
}

impl AnalysisError {
    /// Status classification of the failure, in HTTP terms
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingInput => 400,
            Self::UpstreamTimeout { .. } => 408,
            Self::UpstreamHttp { status, .. } => *status,
            Self::UpstreamUnreachable { .. } => 503,
            Self::LocalProcessing { .. } => 500,
        }
    }

    /// User-facing message, one per failure kind
    pub fn message(&self) -> String {
        match self {
            Self::MissingInput => "URL is required".to_string(),
            Self::UpstreamTimeout { .. } => {
                "Request timed out. The website might be too large or slow to respond.".to_string()
            }
            Self::UpstreamHttp { status, .. } => {
                format!("Failed to fetch URL (Status: {})", status)
            }
            Self::UpstreamUnreachable { .. } => {
                "No response received from the target server".to_string()
            }
            Self::LocalProcessing { .. } => "Error processing URL".to_string(),
        }
    }

    /// Extra detail distinguishing the cause, when there is any
    pub fn details(&self) -> Option<String> {
        match self {
            Self::MissingInput => None,
            Self::UpstreamTimeout { url } => Some(format!("Timed out fetching {}", url)),
            Self::UpstreamHttp { url, status, reason } => {
                Some(format!("{} {} from {}", status, reason, url))
            }
            Self::UpstreamUnreachable { details, .. } => Some(details.clone()),
            Self::LocalProcessing { details } => Some(details.clone()),
        }
    }
}

/// Result type alias for Sumi-Lens operations
pub type Result<T> = std::result::Result<T, LensError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

/// Result type alias for a single analysis
pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;

// Re-export commonly used types
pub use crate::analyzer::{analyze, AnalysisReport, Analyzer, ImageBucket};
pub use crate::config::{AnalyzerConfig, Config, HostMatching};
pub use crate::url::{classify, resolve, LinkScope};
