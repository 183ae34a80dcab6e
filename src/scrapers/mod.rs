//! Site extractors: turn one configured source into zero or more findings.
//!
//! Every extractor implements [`SiteExtractor`]. Which one runs for a source
//! is decided by the [`ExtractorRegistry`], a small strategy table keyed by
//! region that falls back to the generic heuristic.
//!
//! # Strategies
//!
//! | Strategy | Module | Network | Used for |
//! |----------|--------|---------|----------|
//! | Generic heuristic | [`generic`] | root page + up to N linked pages | every source by default |
//! | Placeholder | [`placeholder`] | none | portals flagged `override: true` |
//!
//! # Outcomes
//!
//! Extractors never return an error. A fetch failure becomes
//! [`ExtractionOutcome::Recovered`]; a page without matches is an empty
//! [`ExtractionOutcome::Findings`].

pub mod generic;
pub mod page;
pub mod placeholder;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use crate::fetch::PageFetcher;
use crate::keywords::Vocabulary;
use crate::models::{Finding, SourceDescriptor};

pub use generic::GenericExtractor;
pub use placeholder::PlaceholderExtractor;

/// Everything an extractor may read during one cycle. Shared read-only
/// across all tasks of the cycle.
#[derive(Clone)]
pub struct ExtractionContext {
    /// Identifiers already in the store when the cycle started.
    pub known_ids: Arc<HashSet<String>>,
    pub vocabulary: Arc<Vocabulary>,
    pub fetcher: Arc<dyn PageFetcher>,
    pub root_timeout: Duration,
    /// Shorter than `root_timeout`; linked pages are lower priority.
    pub link_timeout: Duration,
    /// Upper bound on linked pages fetched per source.
    pub max_link_follows: usize,
    /// Cycle start time, stamped onto every finding of the cycle.
    pub now: DateTime<Utc>,
}

impl ExtractionContext {
    pub fn is_known(&self, id: &str) -> bool {
        self.known_ids.contains(id)
    }
}

/// What an extraction task hands back to the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// The source was inspected. May be empty.
    Findings(Vec<Finding>),
    /// The source could not be inspected this cycle; yield is zero.
    Recovered { reason: String },
}

impl ExtractionOutcome {
    pub fn none() -> Self {
        ExtractionOutcome::Findings(Vec::new())
    }
}

/// A strategy for extracting findings from one source.
#[async_trait]
pub trait SiteExtractor: Send + Sync {
    /// Short strategy name for logs and the `sources` listing.
    fn name(&self) -> &'static str;

    async fn extract(&self, source: &SourceDescriptor, ctx: &ExtractionContext)
    -> ExtractionOutcome;
}

/// Region-keyed strategy table with a generic fallback.
pub struct ExtractorRegistry {
    overrides: HashMap<String, Arc<dyn SiteExtractor>>,
    fallback: Arc<dyn SiteExtractor>,
}

impl ExtractorRegistry {
    pub fn new(fallback: Arc<dyn SiteExtractor>) -> Self {
        Self {
            overrides: HashMap::new(),
            fallback,
        }
    }

    /// Generic fallback, with the placeholder registered for every source
    /// flagged `override`.
    pub fn for_sources(sources: &[SourceDescriptor]) -> Self {
        let placeholder: Arc<dyn SiteExtractor> = Arc::new(PlaceholderExtractor);
        let mut registry = Self::new(Arc::new(GenericExtractor));
        for source in sources.iter().filter(|s| s.override_variant) {
            registry.register(&source.region, Arc::clone(&placeholder));
        }
        registry
    }

    pub fn register(&mut self, region: &str, extractor: Arc<dyn SiteExtractor>) {
        self.overrides.insert(region.to_string(), extractor);
    }

    pub fn resolve(&self, source: &SourceDescriptor) -> Arc<dyn SiteExtractor> {
        self.overrides
            .get(&source.region)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }
}
