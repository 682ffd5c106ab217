//! Output types
//!
//! Response envelopes wrapping a report or a failure, as handed to whatever
//! presents them.

use crate::analyzer::AnalysisReport;
use crate::AnalysisError;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Message sent with every successful report
pub const SUCCESS_MESSAGE: &str = "URL processed successfully";

/// Successful analysis response
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub message: String,
    pub data: AnalysisReport,
}

impl AnalysisResponse {
    pub fn new(report: AnalysisReport) -> Self {
        Self {
            message: SUCCESS_MESSAGE.to_string(),
            data: report,
        }
    }
}

/// Failed analysis response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureResponse {
    /// Status classification, in HTTP terms
    pub status: u16,

    /// One message per failure kind
    pub message: String,

    /// What exactly went wrong, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl From<&AnalysisError> for FailureResponse {
    fn from(error: &AnalysisError) -> Self {
        Self {
            status: error.status_code(),
            message: error.message(),
            details: error.details(),
        }
    }
}

/// Output formats a report can be rendered in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty-printed JSON envelope
    #[default]
    Json,
    /// Human-readable markdown
    Markdown,
}
