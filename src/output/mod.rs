//! Output module for rendering analysis results
//!
//! This module handles:
//! - Wrapping reports and failures in response envelopes
//! - Rendering them as JSON or markdown
//! - Writing the rendered output to a file

mod json;
mod markdown;
mod types;

pub use json::{format_json_failure, format_json_report};
pub use markdown::{format_bytes, format_markdown_failure, format_markdown_report};
pub use types::{
    AnalysisResponse, FailureResponse, OutputError, OutputFormat, OutputResult, SUCCESS_MESSAGE,
};

use crate::analyzer::AnalysisReport;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Renders a report in the requested format
pub fn render_report(report: &AnalysisReport, format: OutputFormat) -> OutputResult<String> {
    match format {
        OutputFormat::Json => format_json_report(report),
        OutputFormat::Markdown => Ok(format_markdown_report(report)),
    }
}

/// Renders a failure in the requested format
pub fn render_failure(failure: &FailureResponse, format: OutputFormat) -> OutputResult<String> {
    match format {
        OutputFormat::Json => format_json_failure(failure),
        OutputFormat::Markdown => Ok(format_markdown_failure(failure)),
    }
}

/// Writes rendered output to a file
pub fn write_output(content: &str, output_path: &Path) -> OutputResult<()> {
    let mut file = File::create(output_path)?;
    file.write_all(content.as_bytes())?;
    if !content.ends_with('\n') {
        file.write_all(b"\n")?;
    }
    Ok(())
}
