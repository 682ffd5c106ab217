//! Image classification and size probing
//!
//! Images are bucketed by file extension as soon as they are resolved, then
//! every distinct image URL is downloaded once to measure its size. Probes
//! run concurrently (all at once unless a bound is configured) and are
//! awaited until they settle or the phase budget runs out, whichever comes
//! first. A failed or abandoned probe leaves its bucket's count untouched
//! and adds nothing to its size.

use crate::analyzer::fetcher::{FetchError, Fetcher};
use crate::url::resolve;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;
use url::Url;

/// Bucket key for images whose path has no extension
pub const UNKNOWN_EXTENSION: &str = "unknown";

/// Per-extension aggregate of images
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageBucket {
    /// Number of images with this extension, probe outcome notwithstanding
    pub count: usize,

    /// Sum of successfully probed sizes, in bytes
    pub size: u64,

    /// The images in this bucket, in document order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,
}

/// Images found on one page
#[derive(Debug, Clone, Default)]
pub struct ImageInventory {
    /// Buckets keyed by lowercase extension
    pub buckets: BTreeMap<String, ImageBucket>,

    /// Every resolved image URL, in document order, duplicates included
    pub urls: Vec<String>,

    /// (extension, URL) per image, used to apply probe results
    entries: Vec<(String, Url)>,
}

/// Bounds on one probe phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeLimits {
    /// Probes in flight at once; every probe at once when absent
    pub max_concurrent: Option<usize>,
    /// Time the whole phase may take before unsettled probes are abandoned
    pub budget: Duration,
}

/// Result of probing one image
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    /// The probed URL
    pub url: Url,
    /// Size in bytes, or why it could not be measured
    pub result: Result<u64, FetchError>,
}

impl ImageInventory {
    /// Distinct image URLs, in first-seen order
    pub fn unique_urls(&self) -> Vec<Url> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter(|(_, url)| seen.insert(url.as_str()))
            .map(|(_, url)| url.clone())
            .collect()
    }

    /// Adds probed sizes into the buckets
    ///
    /// Each occurrence of a URL contributes its size once. Failed probes are
    /// skipped.
    pub fn apply_probes(&mut self, outcomes: &[ProbeOutcome]) {
        let sizes: HashMap<&str, u64> = outcomes
            .iter()
            .filter_map(|outcome| match &outcome.result {
                Ok(size) => Some((outcome.url.as_str(), *size)),
                Err(e) => {
                    tracing::debug!("Size probe failed for {}: {}", outcome.url, e);
                    None
                }
            })
            .collect();

        for (extension, url) in &self.entries {
            if let Some(size) = sizes.get(url.as_str()) {
                if let Some(bucket) = self.buckets.get_mut(extension) {
                    bucket.size += size;
                }
            }
        }
    }

    /// Records one resolved image
    fn record(&mut self, url: Url) {
        let extension = image_extension(&url);
        let bucket = self.buckets.entry(extension.clone()).or_default();
        bucket.count += 1;
        bucket.urls.push(url.to_string());
        self.urls.push(url.to_string());
        self.entries.push((extension, url));
    }
}

/// Derives the bucket key for an image URL
///
/// Takes the last path segment, keeps what follows its last `.` and
/// lowercases it. Query strings and fragments never take part. Returns
/// [`UNKNOWN_EXTENSION`] when there is no extension.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_lens::analyzer::image_extension;
///
/// let url = Url::parse("https://example.com/img/foo.PNG?v=2").unwrap();
/// assert_eq!(image_extension(&url), "png");
///
/// let url = Url::parse("https://example.com/logo").unwrap();
/// assert_eq!(image_extension(&url), "unknown");
/// ```
pub fn image_extension(url: &Url) -> String {
    let last_segment = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    match last_segment.rsplit_once('.') {
        Some((_, extension)) if !extension.is_empty() => extension.to_lowercase(),
        _ => UNKNOWN_EXTENSION.to_string(),
    }
}

/// Resolves image references and buckets them by extension
///
/// References that fail to resolve are dropped without affecting the rest.
pub fn collect_images(image_refs: &[String], base_url: &Url) -> ImageInventory {
    let mut inventory = ImageInventory::default();

    for reference in image_refs {
        match resolve(reference, base_url) {
            Ok(url) => inventory.record(url),
            Err(e) => tracing::debug!("Dropping image reference: {}", e),
        }
    }

    inventory
}

/// Probes every URL concurrently and waits for them to settle
///
/// Outcomes come back in completion order. Probes still pending when
/// `limits.budget` runs out are dropped and have no outcome.
pub async fn probe_images<F>(fetcher: &F, urls: Vec<Url>, limits: ProbeLimits) -> Vec<ProbeOutcome>
where
    F: Fetcher + ?Sized,
{
    let total = urls.len();
    let in_flight = limits.max_concurrent.unwrap_or(total).max(1);

    let mut pending = stream::iter(urls)
        .map(|url| async move {
            let result = fetcher.probe_size(&url).await;
            ProbeOutcome { url, result }
        })
        .buffer_unordered(in_flight);

    let mut outcomes = Vec::with_capacity(total);
    let drained = tokio::time::timeout(limits.budget, async {
        while let Some(outcome) = pending.next().await {
            outcomes.push(outcome);
        }
    })
    .await;

    if drained.is_err() {
        tracing::debug!(
            "Probe budget of {}ms spent, abandoning {} of {} probes",
            limits.budget.as_millis(),
            total - outcomes.len(),
            total
        );
    }

    outcomes
}

/// Buckets image references and measures their sizes
///
/// Counts and URL lists are final before the first probe is sent; sizes are
/// added once every probe has settled or been abandoned.
///
/// # Arguments
///
/// * `fetcher` - Performs the size probes
/// * `image_refs` - Raw `src` values in document order
/// * `base_url` - URL the references are resolved against
/// * `limits` - Concurrency bound and time budget of the probe phase
///
/// # Returns
///
/// The populated [`ImageInventory`]. Probe failures never surface here.
pub async fn classify_and_probe<F>(
    fetcher: &F,
    image_refs: &[String],
    base_url: &Url,
    limits: ProbeLimits,
) -> ImageInventory
where
    F: Fetcher + ?Sized,
{
    let mut inventory = collect_images(image_refs, base_url);
    let targets = inventory.unique_urls();
    let probed = targets.len();

    tracing::debug!(
        "Probing {} distinct images ({} references)",
        probed,
        inventory.urls.len()
    );

    let outcomes = probe_images(fetcher, targets, limits).await;
    let failed = probed - outcomes.iter().filter(|o| o.result.is_ok()).count();
    if failed > 0 {
        tracing::debug!("{} of {} image probes yielded no size", failed, probed);
    }

    inventory.apply_probes(&outcomes);
    inventory
}
