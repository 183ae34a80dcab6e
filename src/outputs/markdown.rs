//! Markdown triage digest.
//!
//! Findings are grouped by region (alphabetically) with an anchor per region,
//! so the digest can be dropped into any Markdown viewer:
//!
//! ```text
//! # Procurement Findings
//!
//! 3 findings in the last 30 days · 51 sources monitored · last scan 2026-10-19 06:00 UTC
//!
//! - [Ohio](#ohio) (1)
//!
//! ## Ohio
//!
//! ### Health Plan Services
//! ...
//! ```

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::models::{Finding, Statistics};
use crate::utils::{slugify_title, upcase};

pub fn render(findings: &[Finding], stats: &Statistics, days: u32) -> String {
    let mut md = String::new();
    // Writing into a String cannot fail.
    let _ = write_digest(&mut md, findings, stats, days);
    md
}

fn write_digest(
    md: &mut String,
    findings: &[Finding],
    stats: &Statistics,
    days: u32,
) -> std::fmt::Result {
    writeln!(md, "# Procurement Findings\n")?;

    let last_scan = stats
        .last_scan
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "never".to_string());
    writeln!(
        md,
        "{} findings in the last {} days · {} sources monitored · last scan {}\n",
        findings.len(),
        days,
        stats.sources_monitored,
        last_scan
    )?;

    if findings.is_empty() {
        writeln!(md, "_No findings yet. Run `rfp_sentinel scan` to search for opportunities._")?;
        return Ok(());
    }

    let mut by_region: BTreeMap<&str, Vec<&Finding>> = BTreeMap::new();
    for finding in findings {
        by_region.entry(finding.region.as_str()).or_default().push(finding);
    }

    for (region, group) in &by_region {
        writeln!(md, "- [{}](#{}) ({})", region, slugify_title(region), group.len())?;
    }

    for (region, group) in by_region {
        writeln!(md, "\n## {}", region)?;
        for finding in group {
            writeln!(md, "\n### {}\n", finding.title)?;
            let date = finding
                .found_at()
                .map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| finding.found_date.clone());
            write!(md, "- **Source:** {} · **Found:** {}", finding.source, date)?;
            if let Some(reference) = &finding.reference_number {
                write!(md, " · **Ref:** `{}`", reference)?;
            }
            writeln!(md)?;
            if !finding.keywords.is_empty() {
                let tags: Vec<String> = finding
                    .keywords
                    .iter()
                    .map(|k| format!("`{}`", upcase(k)))
                    .collect();
                writeln!(md, "- **Keywords:** {}", tags.join(" "))?;
            }
            writeln!(md, "- [View opportunity]({})", finding.url)?;
            if !finding.description.is_empty() {
                writeln!(md, "\n{}", finding.description)?;
            }
        }
    }
    Ok(())
}
