//! Markup scanner
//!
//! This module parses HTML content and pulls out the raw references the
//! analysis needs:
//! - `<img src="...">` values
//! - `<a href="...">` values that point somewhere navigable
//!
//! Values are returned exactly as written in the markup; resolution against
//! the page URL happens later.

use scraper::{Html, Selector};

/// Raw references found in one HTML document, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScannedPage {
    /// `src` attribute of every `<img>` that has a non-empty one
    pub images: Vec<String>,

    /// `href` attribute of every `<a>` that is navigable
    pub anchors: Vec<String>,
}

/// Parses HTML content and extracts image and anchor references
///
/// # Extraction Rules
///
/// **Images:** every `<img>` with a non-empty `src`.
///
/// **Anchors:** every `<a>` with an `href`, except:
/// - empty values
/// - fragment-only references (`#section`)
/// - `javascript:` pseudo-links
///
/// The parsed document is dropped before returning, so the result can be
/// held across await points.
///
/// # Example
///
/// ```
/// use sumi_lens::analyzer::scan_html;
///
/// let html = r##"<body><img src="/a.png"><a href="/about">About</a><a href="#top">Top</a></body>"##;
/// let scanned = scan_html(html);
/// assert_eq!(scanned.images, vec!["/a.png"]);
/// assert_eq!(scanned.anchors, vec!["/about"]);
/// ```
pub fn scan_html(html: &str) -> ScannedPage {
    let document = Html::parse_document(html);

    let images = match Selector::parse("img[src]") {
        Ok(selector) => attribute_values(&document, &selector, "src")
            .filter(|src| !src.trim().is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => Vec::new(),
    };

    let anchors = match Selector::parse("a[href]") {
        Ok(selector) => attribute_values(&document, &selector, "href")
            .filter(|href| is_navigable(href))
            .map(str::to_string)
            .collect(),
        Err(_) => Vec::new(),
    };

    ScannedPage { images, anchors }
}

/// Lazily yields one attribute from every element matching `selector`
fn attribute_values<'a>(
    document: &'a Html,
    selector: &'a Selector,
    attribute: &'static str,
) -> impl Iterator<Item = &'a str> + 'a {
    document
        .select(selector)
        .filter_map(move |element| element.value().attr(attribute))
}

/// Returns false for hrefs that are not links to another resource
fn is_navigable(href: &str) -> bool {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return false;
    }

    let is_javascript = href
        .get(..11)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("javascript:"));

    !is_javascript
}
