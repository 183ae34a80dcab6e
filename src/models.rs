//! Data models for sources, findings, and the persisted store record.
//!
//! This module defines the core data structures used throughout the application:
//! - [`SourceDescriptor`]: One configured procurement portal
//! - [`Finding`]: A candidate opportunity recorded from a source
//! - [`Statistics`]: Aggregate counters recomputed after each cycle
//! - [`StoreState`]: The single durable record written by the store
//! - [`CrawlResult`]: Transient per-cycle outcome handed back to callers
//!
//! Persisted records use camelCase field names, and every field carries a
//! serde default so that files written by older builds still load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::utils::{region_slug, url_digest};

/// A procurement portal to monitor.
///
/// Loaded once from configuration (or the built-in roster) and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SourceDescriptor {
    /// Region the portal serves, e.g. `"Texas"` or `"NASPO"`.
    pub region: String,
    /// Human-readable portal name.
    pub name: String,
    /// Root URL visited on every cycle.
    pub url: String,
    /// Use the placeholder extractor instead of the generic heuristic.
    #[serde(default, rename = "override")]
    pub override_variant: bool,
}

impl SourceDescriptor {
    pub fn new(region: &str, name: &str, url: &str) -> Self {
        Self {
            region: region.to_string(),
            name: name.to_string(),
            url: url.to_string(),
            override_variant: false,
        }
    }

    /// Mark this source as one whose portal cannot be inspected directly.
    pub fn with_override(mut self) -> Self {
        self.override_variant = true;
        self
    }
}

/// Lifecycle status of a finding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum FindingStatus {
    #[default]
    Active,
}

/// A candidate procurement opportunity.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Stable identifier; see [`Finding::derive_id`].
    pub id: String,
    /// External reference such as `"RFP-2024-017"`, when one was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_number: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub region: String,
    /// Display name of the source portal.
    #[serde(default)]
    pub source: String,
    /// Canonical location of the opportunity.
    #[serde(default)]
    pub url: String,
    /// Discovery time as RFC 3339. Kept as text so a malformed value in an
    /// existing store does not invalidate the rest of the file.
    #[serde(default)]
    pub found_date: String,
    /// Matched vocabulary terms, in vocabulary order.
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub status: FindingStatus,
    #[serde(default)]
    pub description: String,
}

impl Finding {
    /// Identifier for a finding located at `resolved_url` in `region`.
    ///
    /// Same region and URL always give the same id, across runs and hosts.
    pub fn derive_id(region: &str, resolved_url: &str) -> String {
        format!("{}_{}", region_slug(region), url_digest(resolved_url))
    }

    /// Parse [`Finding::found_date`], accepting RFC 3339 or a naive
    /// ISO-8601 timestamp (interpreted as UTC).
    pub fn found_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.found_date)
    }
}

/// Parse a stored timestamp; `None` when it is not a recognizable date-time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Aggregate counters for the store.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Number of findings currently retained.
    #[serde(default)]
    pub total_found: usize,
    /// Number of sources in the configured roster.
    #[serde(default)]
    pub sources_monitored: usize,
    /// Completion time of the last cycle.
    #[serde(default)]
    pub last_scan: Option<DateTime<Utc>>,
    /// Wall-clock length of the last cycle.
    #[serde(default)]
    pub last_scan_duration_ms: Option<u64>,
    /// Cycles completed since the store was created.
    #[serde(default)]
    pub scan_count: u64,
}

impl Statistics {
    pub fn fresh(sources_monitored: usize) -> Self {
        Self {
            sources_monitored,
            ..Self::default()
        }
    }
}

/// The durable record: everything the store persists.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreState {
    #[serde(default = "Utc::now")]
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub findings: Vec<Finding>,
    #[serde(default)]
    pub stats: Statistics,
}

impl StoreState {
    pub fn fresh(sources_monitored: usize) -> Self {
        Self {
            last_updated: Utc::now(),
            findings: Vec::new(),
            stats: Statistics::fresh(sources_monitored),
        }
    }
}

/// Outcome of one crawl cycle.
#[derive(Debug, Default)]
pub struct CrawlResult {
    /// Findings accepted into the store during this cycle.
    pub new_findings: Vec<Finding>,
    pub duration: Duration,
    /// Sources whose extraction completed (with or without findings).
    pub sources_completed: usize,
    /// Sources that recovered from a fetch failure with zero yield.
    pub sources_recovered: usize,
    /// Sources whose task panicked or was aborted.
    pub sources_faulted: usize,
    /// Set when the store could not be written at the end of the cycle.
    pub persist_error: Option<String>,
}

/// Result of a manual scan, shaped for the dashboard collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub success: bool,
    pub message: String,
    pub new_findings: usize,
}
