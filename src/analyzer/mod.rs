//! Analyzer module for single-page analysis
//!
//! This module contains the core analysis pipeline:
//! - HTTP fetching of the page and of each image
//! - HTML scanning for image and anchor references
//! - Image bucketing and concurrent size probing
//! - Internal/external link classification
//! - Coordination of one analysis from input to report

mod coordinator;
mod fetcher;
mod images;
mod links;
mod parser;

pub use coordinator::{normalize_input, AnalysisReport, Analyzer};
pub use fetcher::{
    build_http_client, classify_reqwest_error, FetchError, FetchedPage, Fetcher, HttpFetcher,
};
pub use images::{
    classify_and_probe, collect_images, image_extension, probe_images, ImageBucket,
    ImageInventory, ProbeLimits, ProbeOutcome, UNKNOWN_EXTENSION,
};
pub use links::{classify_links, ClassifiedLinks, LinkSet};
pub use parser::{scan_html, ScannedPage};

use crate::config::{validate, Config};
use crate::LensError;

/// Runs a complete analysis of one page
///
/// This is the main entry point. It will:
/// 1. Validate and normalize the requested URL
/// 2. Validate the configuration
/// 3. Build an HTTP client scoped to this call
/// 4. Fetch and scan the page
/// 5. Probe images and classify links
/// 6. Return the assembled report
///
/// # Arguments
///
/// * `config` - Analysis configuration
/// * `url` - The requested URL; `https://` is assumed when no scheme is given
///
/// # Returns
///
/// * `Ok(AnalysisReport)` - Images, links and the configuration fingerprint
/// * `Err(LensError::Config)` - The configuration is invalid
/// * `Err(LensError::Analysis)` - The input was unusable or the page could not be fetched
///
/// # Example
///
/// ```no_run
/// use sumi_lens::analyze;
/// use sumi_lens::config::Config;
///
/// # async fn example() -> sumi_lens::Result<()> {
/// let report = analyze(&Config::default(), "https://example.com/").await?;
/// println!("{} internal links", report.internal_links.len());
/// # Ok(())
/// # }
/// ```
pub async fn analyze(config: &Config, url: &str) -> Result<AnalysisReport, LensError> {
    // Reject empty input before building anything
    normalize_input(url)?;
    validate(config)?;

    let analyzer = Analyzer::new(config)?;
    Ok(analyzer.analyze(url).await?)
}
