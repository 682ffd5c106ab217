use crate::config::HostMatching;

/// Checks whether `host` is the base host or one of its subdomains
///
/// `base` should already have its `www.` prefix stripped.
///
/// With [`HostMatching::LabelBoundary`] the suffix must start at a label:
/// `blog.example.com` matches `example.com` while `evilexample.com` does not.
/// [`HostMatching::Suffix`] compares raw string suffixes and accepts both.
///
/// # Examples
///
/// ```
/// use sumi_lens::config::HostMatching;
/// use sumi_lens::url::host_matches;
///
/// assert!(host_matches("blog.example.com", "example.com", HostMatching::LabelBoundary));
/// assert!(!host_matches("evilexample.com", "example.com", HostMatching::LabelBoundary));
/// assert!(host_matches("evilexample.com", "example.com", HostMatching::Suffix));
/// ```
pub fn host_matches(host: &str, base: &str, mode: HostMatching) -> bool {
    if base.is_empty() {
        return false;
    }

    match mode {
        HostMatching::LabelBoundary => {
            host == base
                || host
                    .strip_suffix(base)
                    .is_some_and(|prefix| prefix.ends_with('.'))
        }
        HostMatching::Suffix => host.ends_with(base),
    }
}
