use url::Url;

/// Extracts the lowercase host from a URL
///
/// Returns `None` for URLs without a host, such as `mailto:` or `data:`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_lens::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("mailto:someone@example.com").unwrap();
/// assert_eq!(extract_domain(&url), None);
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str()
        .filter(|h| !h.is_empty())
        .map(|h| h.to_lowercase())
}

/// Removes a single leading `www.` from a host
///
/// # Examples
///
/// ```
/// use sumi_lens::url::strip_www;
///
/// assert_eq!(strip_www("www.example.com"), "example.com");
/// assert_eq!(strip_www("example.com"), "example.com");
/// assert_eq!(strip_www("www2.example.com"), "www2.example.com");
/// ```
pub fn strip_www(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}
