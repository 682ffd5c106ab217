//! URL handling module for Sumi-Lens
//!
//! This module resolves references found in a page against the page's URL
//! and decides whether a resolved URL belongs to the same site.

mod domain;
mod matcher;
mod resolve;

use crate::config::HostMatching;
use url::Url;

// Re-export main functions
pub use domain::{extract_domain, strip_www};
pub use matcher::host_matches;
pub use resolve::resolve;

/// Which side of the site boundary a link falls on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkScope {
    /// Same host, a subdomain of it, or under the base URL
    Internal,
    /// Anything else
    External,
}

/// Classifies a resolved URL relative to the base URL
///
/// A URL is internal when any of these hold:
/// 1. Its host equals the base host, both with a leading `www.` removed
/// 2. Its full string starts with the base URL's string
/// 3. Its host is a subdomain of the base host (see [`host_matches`])
///
/// URLs without a host are internal only through rule 2.
///
/// # Arguments
///
/// * `resolved` - An absolute URL found on the page
/// * `base` - The URL of the page itself
/// * `mode` - How rule 3 recognizes subdomains
///
/// # Returns
///
/// [`LinkScope::Internal`] when any rule holds, [`LinkScope::External`] otherwise.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_lens::config::HostMatching;
/// use sumi_lens::url::{classify, LinkScope};
///
/// let base = Url::parse("https://www.example.com/").unwrap();
/// let sub = Url::parse("https://blog.example.com/post").unwrap();
/// let other = Url::parse("https://other.com/").unwrap();
///
/// assert_eq!(classify(&sub, &base, HostMatching::LabelBoundary), LinkScope::Internal);
/// assert_eq!(classify(&other, &base, HostMatching::LabelBoundary), LinkScope::External);
/// ```
pub fn classify(resolved: &Url, base: &Url, mode: HostMatching) -> LinkScope {
    let base_host = extract_domain(base).unwrap_or_default();
    let clean_base = strip_www(&base_host);

    // Rule 2 needs no host on either side
    if resolved.as_str().starts_with(base.as_str()) {
        return LinkScope::Internal;
    }

    let Some(host) = extract_domain(resolved) else {
        return LinkScope::External;
    };

    if clean_base.is_empty() {
        return LinkScope::External;
    }

    if strip_www(&host) == clean_base || host_matches(&host, clean_base, mode) {
        LinkScope::Internal
    } else {
        LinkScope::External
    }
}
