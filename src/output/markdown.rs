//! Markdown report generation
//!
//! This module renders a human-readable markdown view of an analysis:
//! an image table per extension with readable sizes, followed by the
//! internal and external link lists.

use crate::analyzer::AnalysisReport;
use crate::output::types::FailureResponse;

/// Units used by [`format_bytes`], in steps of 1024
const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Formats a byte count for humans
///
/// # Examples
///
/// ```
/// use sumi_lens::output::format_bytes;
///
/// assert_eq!(format_bytes(0), "0 Bytes");
/// assert_eq!(format_bytes(1536), "1.5 KB");
/// assert_eq!(format_bytes(1048576), "1 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, SIZE_UNITS[unit])
}

/// Formats an analysis report as markdown
pub fn format_markdown_report(report: &AnalysisReport) -> String {
    let mut md = String::new();

    md.push_str("# Sumi-Lens Page Analysis\n\n");
    md.push_str(&format!("- **URL**: {}\n", report.source_url));
    md.push_str(&format!(
        "- **Analyzed**: {}\n",
        report.analyzed_at.to_rfc3339()
    ));
    md.push_str(&format!("- **Images**: {}\n", report.total_images()));
    md.push_str(&format!(
        "- **Total Image Size**: {}\n",
        format_bytes(report.total_image_bytes())
    ));
    md.push_str(&format!(
        "- **Internal Links**: {}\n",
        report.internal_links.len()
    ));
    md.push_str(&format!(
        "- **External Links**: {}\n",
        report.external_links.len()
    ));
    if let Some(hash) = &report.config_hash {
        md.push_str(&format!("- **Config Hash**: `{}`\n", hash));
    }
    md.push('\n');

    md.push_str("## Images by Type\n\n");
    if report.image_types.is_empty() {
        md.push_str("No images found.\n\n");
    } else {
        md.push_str("| Type | Count | Size |\n");
        md.push_str("|------|-------|------|\n");
        for (extension, bucket) in &report.image_types {
            md.push_str(&format!(
                "| {} | {} | {} |\n",
                extension,
                bucket.count,
                format_bytes(bucket.size)
            ));
        }
        md.push('\n');

        for (extension, bucket) in &report.image_types {
            if bucket.urls.is_empty() {
                continue;
            }
            md.push_str(&format!("### {}\n\n", extension));
            for url in &bucket.urls {
                md.push_str(&format!("- {}\n", url));
            }
            md.push('\n');
        }
    }

    push_link_section(&mut md, "Internal Links", &report.internal_links);
    push_link_section(&mut md, "External Links", &report.external_links);

    md
}

/// Formats a failure as markdown
pub fn format_markdown_failure(failure: &FailureResponse) -> String {
    let mut md = String::new();
    md.push_str("# Sumi-Lens Page Analysis Failed\n\n");
    md.push_str(&format!("- **Status**: {}\n", failure.status));
    md.push_str(&format!("- **Message**: {}\n", failure.message));
    if let Some(details) = &failure.details {
        md.push_str(&format!("- **Details**: {}\n", details));
    }
    md
}

fn push_link_section(md: &mut String, title: &str, links: &[String]) {
    md.push_str(&format!("## {} ({})\n\n", title, links.len()));
    if links.is_empty() {
        md.push_str("None.\n\n");
        return;
    }
    for link in links {
        md.push_str(&format!("- {}\n", link));
    }
    md.push('\n');
}
