//! Crawl orchestration: one cycle across the whole roster.
//!
//! # Cycle
//!
//! 1. Snapshot the store's known identifiers.
//! 2. Spawn one extraction task per source, at most `concurrency` in flight.
//! 3. Gather outcomes in completion order. Recovered sources and panicked
//!    tasks are logged and contribute nothing.
//! 4. Append new findings, apply retention, recompute statistics, persist.
//!
//! `run_crawl_cycle` takes `&mut self`, so two cycles can never overlap on
//! the same orchestrator.

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument, warn};

use crate::config::Config;
use crate::fetch::PageFetcher;
use crate::keywords::Vocabulary;
use crate::models::{CrawlResult, Finding, FindingStatus, ScanReport, SourceDescriptor, Statistics};
use crate::scrapers::{ExtractionContext, ExtractionOutcome, ExtractorRegistry};
use crate::store::FindingStore;
use crate::utils::region_slug;

/// Tunables for a cycle, lifted out of [`Config`].
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    pub concurrency: usize,
    pub root_timeout: Duration,
    pub link_timeout: Duration,
    pub max_link_follows: usize,
    pub retention_cap: usize,
    pub seed_demo_on_empty: bool,
}

impl From<&Config> for CrawlSettings {
    fn from(config: &Config) -> Self {
        Self {
            concurrency: config.concurrency.max(1),
            root_timeout: config.root_timeout(),
            link_timeout: config.link_timeout(),
            max_link_follows: config.max_link_follows,
            retention_cap: config.retention_cap,
            seed_demo_on_empty: config.seed_demo_on_empty,
        }
    }
}

/// How one source's task ended.
enum TaskOutcome {
    Extracted(ExtractionOutcome),
    Faulted(String),
}

pub struct CrawlOrchestrator {
    settings: CrawlSettings,
    sources: Arc<[SourceDescriptor]>,
    vocabulary: Arc<Vocabulary>,
    fetcher: Arc<dyn PageFetcher>,
    registry: ExtractorRegistry,
    store: FindingStore,
}

impl CrawlOrchestrator {
    pub fn new(
        settings: CrawlSettings,
        sources: Vec<SourceDescriptor>,
        vocabulary: Vocabulary,
        fetcher: Arc<dyn PageFetcher>,
        registry: ExtractorRegistry,
        store: FindingStore,
    ) -> Self {
        Self {
            settings,
            sources: sources.into(),
            vocabulary: Arc::new(vocabulary),
            fetcher,
            registry,
            store,
        }
    }

    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    pub fn store(&self) -> &FindingStore {
        &self.store
    }

    pub fn statistics(&self) -> Statistics {
        self.store.statistics().clone()
    }

    /// Findings discovered in the last `days` days, newest first.
    pub fn recent_findings(&self, days: u32) -> Vec<Finding> {
        self.store
            .recent_findings(Duration::from_secs(u64::from(days) * 24 * 60 * 60))
    }

    /// Run one full cycle across every configured source.
    ///
    /// Sources are extracted concurrently, at most `concurrency` at a time.
    /// A source that times out, errors or panics contributes nothing and
    /// does not stop the others. New findings are appended, retention is
    /// applied, statistics are recomputed, and the store is persisted.
    ///
    /// # Returns
    ///
    /// A [`CrawlResult`] with the accepted findings, per-source tallies and
    /// the cycle duration. A failed persist is reported in
    /// [`CrawlResult::persist_error`]; the cycle itself never fails.
    #[instrument(level = "info", skip_all, fields(sources = self.sources.len()))]
    pub async fn run_crawl_cycle(&mut self) -> CrawlResult {
        let started = Instant::now();
        let ctx = ExtractionContext {
            known_ids: Arc::new(self.store.known_ids()),
            vocabulary: Arc::clone(&self.vocabulary),
            fetcher: Arc::clone(&self.fetcher),
            root_timeout: self.settings.root_timeout,
            link_timeout: self.settings.link_timeout,
            max_link_follows: self.settings.max_link_follows,
            now: Utc::now(),
        };
        info!(
            concurrency = self.settings.concurrency,
            known = ctx.known_ids.len(),
            "Starting crawl cycle"
        );

        // Each buffered future owns its spawned task until it finishes, so at
        // most `concurrency` extractions run at once.
        let tasks = self.sources.iter().cloned().map(|source| {
            let extractor = self.registry.resolve(&source);
            let ctx = ctx.clone();
            async move {
                let region = source.region.clone();
                let handle = tokio::spawn(async move { extractor.extract(&source, &ctx).await });
                match handle.await {
                    Ok(outcome) => (region, TaskOutcome::Extracted(outcome)),
                    Err(e) => (region, TaskOutcome::Faulted(e.to_string())),
                }
            }
        });
        let outcomes: Vec<(String, TaskOutcome)> = stream::iter(tasks)
            .buffer_unordered(self.settings.concurrency)
            .collect()
            .await;

        let mut result = CrawlResult::default();
        let mut candidates = Vec::new();
        for (region, outcome) in outcomes {
            match outcome {
                TaskOutcome::Extracted(ExtractionOutcome::Findings(found)) => {
                    result.sources_completed += 1;
                    candidates.extend(found);
                }
                TaskOutcome::Extracted(ExtractionOutcome::Recovered { reason }) => {
                    result.sources_recovered += 1;
                    warn!(%region, %reason, "Source skipped this cycle");
                }
                TaskOutcome::Faulted(reason) => {
                    result.sources_faulted += 1;
                    error!(%region, %reason, "Extraction task faulted");
                }
            }
        }

        if candidates.is_empty() && self.store.is_empty() && self.settings.seed_demo_on_empty {
            info!("Nothing found on an empty store; seeding demo findings");
            candidates = demo_findings(ctx.now);
        }

        result.new_findings = self.store.append(candidates);
        self.store.enforce_retention(self.settings.retention_cap);
        result.duration = started.elapsed();
        self.store.record_cycle(Utc::now(), result.duration);

        if let Err(e) = self.store.persist().await {
            error!(error = %e, "Failed to persist store; previous file kept");
            result.persist_error = Some(e.to_string());
        }

        info!(
            new = result.new_findings.len(),
            total = self.store.findings().len(),
            completed = result.sources_completed,
            recovered = result.sources_recovered,
            faulted = result.sources_faulted,
            elapsed_ms = result.duration.as_millis() as u64,
            "Crawl cycle complete"
        );
        result
    }

    /// On-demand cycle with a pass/fail summary for the caller.
    pub async fn manual_scan(&mut self) -> ScanReport {
        let result = self.run_crawl_cycle().await;
        let new_findings = result.new_findings.len();
        match result.persist_error {
            None => ScanReport {
                success: true,
                message: format!("Scan completed. Found {} new findings.", new_findings),
                new_findings,
            },
            Some(e) => ScanReport {
                success: false,
                message: format!("Scan failed: {}", e),
                new_findings,
            },
        }
    }
}

/// (region, source, url, title, keywords, age in hours, description)
type DemoRow = (
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static [&'static str],
    i64,
    &'static str,
);

const DEMO_ROWS: &[DemoRow] = &[
    (
        "California",
        "Cal eProcure",
        "https://www.caleprocure.ca.gov",
        "California Medicaid Managed Care Services",
        &["medicaid", "managed care"],
        0,
        "Comprehensive managed care services for Medicaid beneficiaries in California.",
    ),
    (
        "Texas",
        "Texas SmartBuy",
        "https://www.txsmartbuy.com",
        "Texas Healthcare Technology Solutions",
        &["healthcare services"],
        24,
        "Technology solutions for Texas healthcare programs including Medicaid systems.",
    ),
    (
        "Multi-State",
        "NASPO ValuePoint",
        "https://www.naspovaluepoint.org",
        "NASPO Multi-State Health Plan Services",
        &["health plan", "managed care"],
        6,
        "Multi-state cooperative purchasing opportunity for health plan administration services.",
    ),
];

/// Labeled sample findings shown on a brand-new install.
fn demo_findings(now: DateTime<Utc>) -> Vec<Finding> {
    let day = now.format("%Y%m%d").to_string();
    DEMO_ROWS
        .iter()
        .map(|&(region, source, url, title, keywords, age_hours, description)| Finding {
            id: format!("demo_{}_{}", region_slug(region), day),
            reference_number: None,
            title: format!("[Demo] {}", title),
            region: region.to_string(),
            source: source.to_string(),
            url: url.to_string(),
            found_date: (now - ChronoDuration::hours(age_hours)).to_rfc3339(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            status: FindingStatus::Active,
            description: description.to_string(),
        })
        .collect()
}
