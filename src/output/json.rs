//! JSON rendering of response envelopes

use crate::analyzer::AnalysisReport;
use crate::output::types::{AnalysisResponse, FailureResponse, OutputResult};

/// Serializes a report inside its success envelope
pub fn format_json_report(report: &AnalysisReport) -> OutputResult<String> {
    let response = AnalysisResponse::new(report.clone());
    Ok(serde_json::to_string_pretty(&response)?)
}

/// Serializes a failure envelope
pub fn format_json_failure(failure: &FailureResponse) -> OutputResult<String> {
    Ok(serde_json::to_string_pretty(failure)?)
}
