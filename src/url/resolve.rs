use crate::{UrlError, UrlResult};
use url::Url;

/// Resolves a possibly-relative reference against a base URL
///
/// Absolute, scheme-relative (`//host/path`), path-relative and
/// fragment-only references are all accepted. The result is always an
/// absolute URL; anything `Url::join` rejects is returned as an error so the
/// caller can drop that one reference.
///
/// # Arguments
///
/// * `reference` - A raw `src` or `href` value; surrounding whitespace is ignored
/// * `base` - The URL of the page the reference was found on
///
/// # Returns
///
/// * `Ok(Url)` - The absolute URL
/// * `Err(UrlError::Empty)` - The reference was blank
/// * `Err(UrlError::Parse)` - The reference could not be joined onto the base
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_lens::url::resolve;
///
/// let base = Url::parse("https://example.com/dir/page").unwrap();
/// assert_eq!(resolve("img/a.png", &base).unwrap().as_str(), "https://example.com/dir/img/a.png");
/// assert_eq!(resolve("//cdn.example.com/b.png", &base).unwrap().as_str(), "https://cdn.example.com/b.png");
/// assert!(resolve("http://[::1", &base).is_err());
/// ```
pub fn resolve(reference: &str, base: &Url) -> UrlResult<Url> {
    let reference = reference.trim();

    if reference.is_empty() {
        return Err(UrlError::Empty);
    }

    base.join(reference)
        .map_err(|e| UrlError::Parse(format!("{}: {}", reference, e)))
}
