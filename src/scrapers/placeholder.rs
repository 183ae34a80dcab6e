//! Placeholder extractor for portals that cannot be inspected directly.
//!
//! Script-driven marketplaces render their listings in the browser, so the
//! generic heuristic sees an empty shell. For those sources this extractor
//! records one clearly labeled finding pointing at the portal, so a human
//! knows to check it by hand. No network request is made.

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::{ExtractionContext, ExtractionOutcome, SiteExtractor};
use crate::models::{Finding, FindingStatus, SourceDescriptor};
use crate::utils::region_slug;

#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderExtractor;

impl PlaceholderExtractor {
    /// One id per source per calendar day (UTC).
    pub fn placeholder_id(source: &SourceDescriptor, ctx: &ExtractionContext) -> String {
        format!(
            "{}_placeholder_{}",
            region_slug(&source.region),
            ctx.now.format("%Y%m%d")
        )
    }
}

#[async_trait]
impl SiteExtractor for PlaceholderExtractor {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    #[instrument(level = "info", skip_all, fields(region = %source.region))]
    async fn extract(
        &self,
        source: &SourceDescriptor,
        ctx: &ExtractionContext,
    ) -> ExtractionOutcome {
        let id = Self::placeholder_id(source, ctx);
        if ctx.is_known(&id) {
            debug!(%id, "Placeholder already recorded today");
            return ExtractionOutcome::none();
        }

        let finding = Finding {
            id,
            reference_number: None,
            title: format!(
                "[Placeholder] {} Opportunities - {}",
                ctx.vocabulary.label, source.region
            ),
            region: source.region.clone(),
            source: source.name.clone(),
            url: source.url.clone(),
            found_date: ctx.now.to_rfc3339(),
            keywords: Vec::new(),
            status: FindingStatus::Active,
            description: format!(
                "{} publishes listings through a script-driven portal that cannot be \
                 inspected automatically. Review it manually for {} opportunities.",
                source.name, ctx.vocabulary.label
            ),
        };
        ExtractionOutcome::Findings(vec![finding])
    }
}
