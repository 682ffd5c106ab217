//! Analysis coordinator - one page, start to finish
//!
//! This module drives a single analysis:
//! - Normalizing and validating the requested URL
//! - Fetching the page under the overall time bound
//! - Scanning the markup
//! - Probing images and classifying links side by side, with probes limited
//!   to whatever remains of the overall bound
//! - Assembling the report
//!
//! Every analysis owns its working data. Nothing is shared between calls
//! except the immutable configuration and the fetcher.

use crate::analyzer::fetcher::{FetchError, Fetcher, HttpFetcher};
use crate::analyzer::images::{classify_and_probe, ImageBucket, ImageInventory, ProbeLimits};
use crate::analyzer::links::{classify_links, ClassifiedLinks};
use crate::analyzer::parser::scan_html;
use crate::config::{config_fingerprint, AnalyzerConfig, Config};
use crate::{AnalysisError, AnalysisResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use url::Url;

/// Everything learned about one page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// The URL that was analyzed, after input normalization
    pub source_url: String,

    /// When the analysis finished
    pub analyzed_at: DateTime<Utc>,

    /// Image buckets keyed by lowercase extension
    pub image_types: BTreeMap<String, ImageBucket>,

    /// Every image URL in document order
    pub image_urls: Vec<String>,

    /// Internal links in first-seen order
    pub internal_links: Vec<String>,

    /// External links in first-seen order
    pub external_links: Vec<String>,

    /// Fingerprint of the configuration the analysis ran with
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_hash: Option<String>,
}

impl AnalysisReport {
    /// Total number of images across all buckets
    pub fn total_images(&self) -> usize {
        self.image_types.values().map(|b| b.count).sum()
    }

    /// Total probed bytes across all buckets
    pub fn total_image_bytes(&self) -> u64 {
        self.image_types.values().map(|b| b.size).sum()
    }
}

/// Runs analyses with one configuration and one fetcher
pub struct Analyzer<F = HttpFetcher> {
    config: AnalyzerConfig,
    config_hash: Option<String>,
    fetcher: F,
}

impl Analyzer<HttpFetcher> {
    /// Creates an analyzer backed by a fresh HTTP client
    ///
    /// A client that cannot be built (for instance because of an unusable
    /// user agent) is reported as [`AnalysisError::LocalProcessing`].
    pub fn new(config: &Config) -> AnalysisResult<Self> {
        let fetcher = HttpFetcher::new(config).map_err(|e| AnalysisError::LocalProcessing {
            details: format!("Failed to build HTTP client: {}", e),
        })?;
        Ok(Self::with_fetcher(config, fetcher))
    }
}

impl<F: Fetcher> Analyzer<F> {
    /// Creates an analyzer around any fetcher
    pub fn with_fetcher(config: &Config, fetcher: F) -> Self {
        let config_hash = match config_fingerprint(config) {
            Ok(hash) => {
                tracing::debug!("Configuration fingerprint: {}", hash);
                Some(hash)
            }
            Err(e) => {
                tracing::warn!("Could not fingerprint configuration: {}", e);
                None
            }
        };

        Self {
            config: config.analyzer.clone(),
            config_hash,
            fetcher,
        }
    }

    /// Analyzes one page
    ///
    /// Empty input fails with [`AnalysisError::MissingInput`] before any
    /// request is made. Only the page fetch can time out the analysis. Image
    /// probes share what is left of the overall bound (at least one probe
    /// timeout); probes still running when it is spent are abandoned and the
    /// report is returned without their sizes.
    ///
    /// # Arguments
    ///
    /// * `input` - The requested URL as the user typed it
    ///
    /// # Returns
    ///
    /// * `Ok(AnalysisReport)` - The page was fetched and every probe settled
    ///   or was abandoned
    /// * `Err(AnalysisError)` - The input was unusable or the page fetch failed
    pub async fn analyze(&self, input: &str) -> AnalysisResult<AnalysisReport> {
        let base_url = normalize_input(input)?;

        tracing::info!("Analyzing {}", base_url);

        match self.run(&base_url).await {
            Ok(report) => {
                tracing::info!(
                    "Analysis of {} complete: {} images, {} internal links, {} external links",
                    base_url,
                    report.total_images(),
                    report.internal_links.len(),
                    report.external_links.len()
                );
                Ok(report)
            }
            Err(e) => {
                tracing::warn!("Analysis of {} failed: {}", base_url, e);
                Err(e)
            }
        }
    }

    async fn run(&self, base_url: &Url) -> AnalysisResult<AnalysisReport> {
        let overall = Duration::from_millis(self.config.overall_timeout_ms);
        let started = Instant::now();

        let page = match tokio::time::timeout(overall, self.fetcher.fetch_page(base_url)).await {
            Ok(fetched) => fetched.map_err(|e| page_failure(base_url, e))?,
            Err(_) => {
                tracing::warn!(
                    "Fetching {} exceeded {}ms, abandoning",
                    base_url,
                    self.config.overall_timeout_ms
                );
                return Err(AnalysisError::UpstreamTimeout {
                    url: base_url.to_string(),
                });
            }
        };

        tracing::debug!(
            "Fetched {} (status {}, {} bytes, final URL {})",
            base_url,
            page.status_code,
            page.body.len(),
            page.final_url
        );
        if !page.content_type.is_empty() && !page.content_type.contains("html") {
            tracing::debug!("Content-Type is {}, scanning as HTML anyway", page.content_type);
        }

        let scanned = scan_html(&page.body);
        tracing::debug!(
            "Scanned {} image and {} anchor references",
            scanned.images.len(),
            scanned.anchors.len()
        );

        let limits = ProbeLimits {
            max_concurrent: self.config.max_concurrent_probes,
            budget: probe_budget(overall, started.elapsed(), &self.config),
        };

        let (images, links) = tokio::join!(
            classify_and_probe(&self.fetcher, &scanned.images, base_url, limits),
            async { classify_links(&scanned.anchors, base_url, self.config.host_matching) },
        );

        Ok(self.assemble(base_url, images, links))
    }

    fn assemble(
        &self,
        base_url: &Url,
        mut images: ImageInventory,
        links: ClassifiedLinks,
    ) -> AnalysisReport {
        if !self.config.include_image_urls_per_bucket {
            for bucket in images.buckets.values_mut() {
                bucket.urls.clear();
            }
        }

        let cap = self.config.max_links_per_category;

        AnalysisReport {
            source_url: base_url.to_string(),
            analyzed_at: Utc::now(),
            image_types: images.buckets,
            image_urls: images.urls,
            internal_links: links.internal.into_capped_vec(cap),
            external_links: links.external.into_capped_vec(cap),
            config_hash: self.config_hash.clone(),
        }
    }
}

/// Time left for image probes once the page has been fetched
///
/// Probes get the unspent part of the overall bound, and never less than a
/// single probe timeout.
fn probe_budget(overall: Duration, spent: Duration, config: &AnalyzerConfig) -> Duration {
    overall
        .saturating_sub(spent)
        .max(Duration::from_millis(config.probe_timeout_ms))
}

/// Turns raw user input into the base URL of an analysis
///
/// Surrounding whitespace is ignored and `https://` is assumed when no
/// scheme is given.
///
/// # Examples
///
/// ```
/// use sumi_lens::analyzer::normalize_input;
///
/// assert_eq!(normalize_input(" example.com ").unwrap().as_str(), "https://example.com/");
/// assert_eq!(normalize_input("HTTP://example.com/a").unwrap().as_str(), "http://example.com/a");
/// assert!(normalize_input("").is_err());
/// ```
pub fn normalize_input(input: &str) -> AnalysisResult<Url> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(AnalysisError::MissingInput);
    }

    let has_http_scheme = ["http://", "https://"].iter().any(|scheme| {
        trimmed
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    });

    let other_scheme = trimmed.split_once("://").is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    });

    let candidate = if has_http_scheme {
        trimmed.to_string()
    } else if other_scheme {
        return Err(AnalysisError::LocalProcessing {
            details: format!("Unsupported URL scheme in '{}'", trimmed),
        });
    } else {
        format!("https://{}", trimmed)
    };

    let url = Url::parse(&candidate).map_err(|e| AnalysisError::LocalProcessing {
        details: format!("Invalid URL '{}': {}", trimmed, e),
    })?;

    if url.host_str().map_or(true, str::is_empty) {
        return Err(AnalysisError::LocalProcessing {
            details: format!("Invalid URL '{}': missing host", trimmed),
        });
    }

    Ok(url)
}

/// Maps a failed page fetch onto the analysis error taxonomy
fn page_failure(url: &Url, error: FetchError) -> AnalysisError {
    let url = url.to_string();
    match error {
        FetchError::Timeout => AnalysisError::UpstreamTimeout { url },
        FetchError::Status { status, reason } => AnalysisError::UpstreamHttp { url, status, reason },
        FetchError::Unreachable(details) => AnalysisError::UpstreamUnreachable { url, details },
        FetchError::Other(details) => AnalysisError::LocalProcessing { details },
    }
}
