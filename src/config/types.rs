use serde::{Deserialize, Serialize};

/// Browser-like identification sent with every request
///
/// Some servers reject clients that do not look like a browser.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Main configuration structure for Sumi-Lens
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Analysis behavior configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Timeout for a single image size probe (milliseconds)
    #[serde(rename = "probe-timeout-ms")]
    pub probe_timeout_ms: u64,

    /// Bound on the page fetch; probes get whatever is left, but never less
    /// than one probe timeout (milliseconds)
    #[serde(rename = "overall-timeout-ms")]
    pub overall_timeout_ms: u64,

    /// Maximum number of links returned per category; unlimited when absent
    #[serde(rename = "max-links-per-category", skip_serializing_if = "Option::is_none")]
    pub max_links_per_category: Option<usize>,

    /// Whether each image bucket lists its constituent URLs
    #[serde(rename = "include-image-urls-per-bucket")]
    pub include_image_urls_per_bucket: bool,

    /// Maximum number of image probes in flight at once; all of them when absent
    #[serde(rename = "max-concurrent-probes", skip_serializing_if = "Option::is_none")]
    pub max_concurrent_probes: Option<usize>,

    /// How subdomains of the base host are recognized
    #[serde(rename = "host-matching")]
    pub host_matching: HostMatching,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: 5_000,
            overall_timeout_ms: 30_000,
            max_links_per_category: None,
            include_image_urls_per_bucket: true,
            max_concurrent_probes: None,
            host_matching: HostMatching::default(),
        }
    }
}

/// Subdomain matching rule used when classifying links
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostMatching {
    /// `blog.example.com` matches `example.com`, `notexample.com` does not
    #[default]
    LabelBoundary,
    /// Plain string suffix: `notexample.com` also matches `example.com`
    Suffix,
}

impl std::str::FromStr for HostMatching {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "label-boundary" => Ok(Self::LabelBoundary),
            "suffix" => Ok(Self::Suffix),
            other => Err(format!(
                "unknown host matching mode '{}', expected 'label-boundary' or 'suffix'",
                other
            )),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// The full `User-Agent` header value
    pub value: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            value: DEFAULT_USER_AGENT.to_string(),
        }
    }
}
