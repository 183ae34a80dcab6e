//! Generic keyword heuristic used for every source without an override.
//!
//! # Flow
//!
//! 1. Fetch the root page; anything but `200 OK` ends the source with no yield.
//! 2. Match the visible text against the active vocabulary.
//! 3. Follow links that look like listings (`rfp`, `bid`, `solicitation`, ...)
//!    until one linked page also matches; that page becomes the finding.
//! 4. Otherwise the root page itself is recorded with a generic title.

use async_trait::async_trait;
use tracing::{debug, info, instrument};
use url::Url;

use super::page::{DetailPage, analyze_detail, analyze_root};
use super::{ExtractionContext, ExtractionOutcome, SiteExtractor};
use crate::fetch::FetchOutcome;
use crate::models::{Finding, FindingStatus, SourceDescriptor};
use crate::utils::truncate_for_log;

/// A linked page that corroborated the root page's keyword match.
struct Corroborated {
    url: Url,
    page: DetailPage,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct GenericExtractor;

#[async_trait]
impl SiteExtractor for GenericExtractor {
    fn name(&self) -> &'static str {
        "generic"
    }

    #[instrument(level = "info", skip_all, fields(region = %source.region, url = %source.url))]
    async fn extract(
        &self,
        source: &SourceDescriptor,
        ctx: &ExtractionContext,
    ) -> ExtractionOutcome {
        let base = match Url::parse(&source.url) {
            Ok(base) => base,
            Err(e) => {
                debug!(error = %e, "Source URL does not parse");
                return ExtractionOutcome::Recovered {
                    reason: format!("invalid source URL: {}", e),
                };
            }
        };

        let outcome = ctx.fetcher.fetch(base.as_str(), ctx.root_timeout).await;
        let Some(body) = outcome.ok_body() else {
            if let FetchOutcome::Ok { body, .. } = &outcome {
                debug!(preview = %truncate_for_log(body, 200), "Non-200 body");
            }
            debug!(outcome = %outcome, "Root page not actionable");
            return ExtractionOutcome::Recovered {
                reason: outcome.to_string(),
            };
        };

        let root = analyze_root(body, &base);
        let keywords = ctx.vocabulary.matches(&root.text);
        if keywords.is_empty() {
            debug!("No vocabulary match on root page");
            return ExtractionOutcome::none();
        }
        info!(keywords = ?keywords, links = root.candidate_links.len(), "Root page matched");

        let corroborated = follow_links(&root.candidate_links, ctx).await;
        let finding = build_finding(source, &base, corroborated, keywords, ctx);

        if ctx.is_known(&finding.id) {
            debug!(id = %finding.id, "Finding already recorded");
            return ExtractionOutcome::none();
        }
        info!(id = %finding.id, title = %finding.title, "New finding");
        ExtractionOutcome::Findings(vec![finding])
    }
}

/// Visit candidate links in order and return the first one whose page also
/// matches the content vocabulary.
async fn follow_links(links: &[Url], ctx: &ExtractionContext) -> Option<Corroborated> {
    for url in links.iter().take(ctx.max_link_follows) {
        let outcome = ctx.fetcher.fetch(url.as_str(), ctx.link_timeout).await;
        let Some(body) = outcome.ok_body() else {
            debug!(%url, outcome = %outcome, "Skipping linked page");
            continue;
        };

        let page = analyze_detail(body);
        if ctx.vocabulary.matches(&page.text).is_empty() {
            debug!(%url, "Linked page has no vocabulary match");
            continue;
        }
        return Some(Corroborated {
            url: url.clone(),
            page,
        });
    }
    None
}

fn build_finding(
    source: &SourceDescriptor,
    base: &Url,
    corroborated: Option<Corroborated>,
    keywords: Vec<String>,
    ctx: &ExtractionContext,
) -> Finding {
    let generic_title = format!("{} Opportunity - {}", ctx.vocabulary.label, source.region);
    let (url, title, reference_number) = match corroborated {
        Some(Corroborated { url, page }) => (
            url.to_string(),
            page.title.unwrap_or(generic_title),
            page.reference_number,
        ),
        None => (base.to_string(), generic_title, None),
    };

    let description = format!(
        "Potential {} procurement opportunity found on {}. Keywords detected: {}",
        ctx.vocabulary.label,
        source.name,
        keywords.join(", ")
    );

    Finding {
        id: Finding::derive_id(&source.region, &url),
        reference_number,
        title,
        region: source.region.clone(),
        source: source.name.clone(),
        url,
        found_date: ctx.now.to_rfc3339(),
        keywords,
        status: FindingStatus::Active,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrapers::test_support::{StubFetcher, context};
    use std::collections::HashSet;
    use std::sync::Arc;

    const ROOT: &str = "https://procure.example.gov/";

    fn source() -> SourceDescriptor {
        SourceDescriptor::new("New Mexico", "New Mexico SPD", ROOT)
    }

    fn findings(outcome: ExtractionOutcome) -> Vec<Finding> {
        match outcome {
            ExtractionOutcome::Findings(found) => found,
            ExtractionOutcome::Recovered { reason } => panic!("unexpected recovery: {reason}"),
        }
    }

    #[tokio::test]
    async fn test_not_found_root_yields_nothing() {
        let ctx = context(StubFetcher::new().page(ROOT, 404, "Medicaid page moved"));
        let outcome = GenericExtractor.extract(&source(), &ctx).await;
        assert!(matches!(
            outcome,
            ExtractionOutcome::Recovered { ref reason } if reason.contains("404")
        ));
    }

    #[tokio::test]
    async fn test_timeout_and_network_error_recover() {
        let ctx = context(StubFetcher::new());
        let outcome = GenericExtractor.extract(&source(), &ctx).await;
        assert_eq!(
            outcome,
            ExtractionOutcome::Recovered {
                reason: "timed out".to_string()
            }
        );

        let ctx = context(StubFetcher::new().error(ROOT, "connection reset"));
        let outcome = GenericExtractor.extract(&source(), &ctx).await;
        assert!(matches!(outcome, ExtractionOutcome::Recovered { .. }));
    }

    #[tokio::test]
    async fn test_no_keyword_match_yields_nothing() {
        let ctx = context(StubFetcher::new().page(ROOT, 200, "<p>Road salt bids</p>"));
        let found = findings(GenericExtractor.extract(&source(), &ctx).await);
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_root_match_without_links_records_root() {
        let ctx = context(StubFetcher::new().page(
            ROOT,
            200,
            "<h1>Welcome</h1><p>Medicaid and managed care notices</p>",
        ));
        let found = findings(GenericExtractor.extract(&source(), &ctx).await);

        assert_eq!(found.len(), 1);
        let f = &found[0];
        assert_eq!(f.url, ROOT);
        assert_eq!(f.id, Finding::derive_id("New Mexico", ROOT));
        assert_eq!(f.title, "Medicaid/Healthcare Opportunity - New Mexico");
        assert_eq!(f.keywords, vec!["medicaid", "managed care"]);
        assert_eq!(f.reference_number, None);
        assert!(f.description.contains("New Mexico SPD"));
        assert!(f.description.contains("medicaid, managed care"));
        assert!(f.found_at().is_some());
    }

    #[tokio::test]
    async fn test_corroborating_link_becomes_the_finding() {
        let root = r#"<p>Medicaid programs</p>
            <a href="/news">News</a>
            <a href="/bids/roads">Road bids</a>
            <a href="/bids/health">Health bids</a>
            <a href="/bids/later">Later bids</a>"#;
        let roads = "<h1>Road Resurfacing</h1><p>BID 1001</p>";
        let health = "<title>Portal</title><h1>Medicaid Managed Care Services</h1>\
            <p>Solicitation No. see RFP-2026-014 for details.</p>";
        let fetcher = StubFetcher::new()
            .page(ROOT, 200, root)
            .page("https://procure.example.gov/bids/roads", 200, roads)
            .page("https://procure.example.gov/bids/health", 200, health)
            .page("https://procure.example.gov/bids/later", 200, health);
        let ctx = context(fetcher);

        let found = findings(GenericExtractor.extract(&source(), &ctx).await);
        assert_eq!(found.len(), 1);
        let f = &found[0];
        assert_eq!(f.url, "https://procure.example.gov/bids/health");
        assert_eq!(f.title, "Medicaid Managed Care Services");
        assert_eq!(f.reference_number.as_deref(), Some("RFP-2026-014"));
        assert_eq!(f.keywords, vec!["medicaid"]);
        assert_eq!(
            f.id,
            Finding::derive_id("New Mexico", "https://procure.example.gov/bids/health")
        );
    }

    #[tokio::test]
    async fn test_failing_links_fall_back_to_root() {
        let root = r#"<p>Health plan procurement</p>
            <a href="/rfp/1">RFP one</a>
            <a href="/rfp/2">RFP two</a>"#;
        let fetcher = StubFetcher::new()
            .page(ROOT, 200, root)
            .error("https://procure.example.gov/rfp/1", "reset")
            .page("https://procure.example.gov/rfp/2", 500, "oops");
        let ctx = context(fetcher);

        let found = findings(GenericExtractor.extract(&source(), &ctx).await);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].url, ROOT);
        assert_eq!(found[0].reference_number, None);
    }

    #[tokio::test]
    async fn test_link_follow_cap() {
        let root = r#"<p>Medicaid</p>
            <a href="/rfp/1">RFP</a><a href="/rfp/2">RFP</a><a href="/rfp/3">RFP</a>"#;
        let fetcher = StubFetcher::new()
            .page(ROOT, 200, root)
            .page("https://procure.example.gov/rfp/3", 200, "<h1>Medicaid RFP 300</h1>");
        let mut ctx = context(fetcher);

        ctx.max_link_follows = 2;
        let found = findings(GenericExtractor.extract(&source(), &ctx).await);
        assert_eq!(found[0].url, ROOT);

        ctx.max_link_follows = 3;
        let found = findings(GenericExtractor.extract(&source(), &ctx).await);
        assert_eq!(found[0].url, "https://procure.example.gov/rfp/3");
        assert_eq!(found[0].reference_number.as_deref(), Some("RFP 300"));
    }

    #[tokio::test]
    async fn test_known_identifier_is_skipped() {
        let mut ctx = context(StubFetcher::new().page(ROOT, 200, "<p>medicaid</p>"));
        ctx.known_ids = Arc::new(HashSet::from([Finding::derive_id("New Mexico", ROOT)]));

        let found = findings(GenericExtractor.extract(&source(), &ctx).await);
        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_source_url_recovers() {
        let ctx = context(StubFetcher::new());
        let bad = SourceDescriptor::new("Nowhere", "Broken", "not a url");
        let outcome = GenericExtractor.extract(&bad, &ctx).await;
        assert!(matches!(outcome, ExtractionOutcome::Recovered { .. }));
    }

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_recovery_leaves_warning_to_the_orchestrator() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let ctx = context(StubFetcher::new().page(ROOT, 503, "busy"));
        let outcome = GenericExtractor.extract(&source(), &ctx).await;
        assert!(matches!(outcome, ExtractionOutcome::Recovered { .. }));

        let bad = SourceDescriptor::new("Nowhere", "Broken", "not a url");
        let outcome = GenericExtractor.extract(&bad, &ctx).await;
        assert!(matches!(outcome, ExtractionOutcome::Recovered { .. }));

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.is_empty(), "unexpected warnings: {output}");
    }
}
