//! Link classification
//!
//! Anchor references are resolved against the page URL and sorted into
//! internal and external sets. Each set keeps the order in which URLs were
//! first seen and ignores exact duplicates.

use crate::config::HostMatching;
use crate::url::{classify, resolve, LinkScope};
use std::collections::HashSet;
use url::Url;

/// Insertion-ordered set of absolute URLs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    links: Vec<String>,
    seen: HashSet<String>,
}

impl LinkSet {
    /// Creates an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a URL; returns false if it was already present
    pub fn insert(&mut self, url: String) -> bool {
        if self.seen.contains(&url) {
            return false;
        }
        self.seen.insert(url.clone());
        self.links.push(url);
        true
    }

    /// Returns true if the exact URL string is present
    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// Number of distinct URLs
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Returns true if no URL has been added
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Iterates in first-insertion order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(String::as_str)
    }

    /// Converts into a sequence, keeping at most `cap` leading entries
    pub fn into_capped_vec(self, cap: Option<usize>) -> Vec<String> {
        let mut links = self.links;
        if let Some(cap) = cap {
            links.truncate(cap);
        }
        links
    }
}

/// Anchors of one page split by scope
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedLinks {
    pub internal: LinkSet,
    pub external: LinkSet,
}

/// Resolves and classifies anchor references
///
/// References that fail to resolve are dropped. The function holds no
/// state between calls, so the same input always yields the same sets.
///
/// # Example
///
/// ```
/// use url::Url;
/// use sumi_lens::analyzer::classify_links;
/// use sumi_lens::config::HostMatching;
///
/// let base = Url::parse("https://example.com/dir/page").unwrap();
/// let refs = vec!["/a".to_string(), "https://other.com/d".to_string()];
/// let links = classify_links(&refs, &base, HostMatching::LabelBoundary);
///
/// assert!(links.internal.contains("https://example.com/a"));
/// assert!(links.external.contains("https://other.com/d"));
/// ```
pub fn classify_links(anchor_refs: &[String], base_url: &Url, mode: HostMatching) -> ClassifiedLinks {
    let mut links = ClassifiedLinks::default();

    for reference in anchor_refs {
        let resolved = match resolve(reference, base_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!("Dropping link reference: {}", e);
                continue;
            }
        };

        let set = match classify(&resolved, base_url, mode) {
            LinkScope::Internal => &mut links.internal,
            LinkScope::External => &mut links.external,
        };
        set.insert(resolved.to_string());
    }

    tracing::debug!(
        "Classified {} internal and {} external links",
        links.internal.len(),
        links.external.len()
    );

    links
}
