//! HTML analysis for the generic extractor.
//!
//! `scraper::Html` is not `Send`, so documents are parsed and reduced to
//! owned summaries here, synchronously, before any further `.await`.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::keywords::is_relevant_link_text;
use crate::utils::collapse_whitespace;

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("static selector"));

static TITLE_SELECTORS: Lazy<Vec<Selector>> = Lazy::new(|| {
    ["h1", "h2", "title"]
        .iter()
        .map(|s| Selector::parse(s).expect("static selector"))
        .collect()
});

static REFERENCE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(RFP|BID|SOLICITATION)\s*[-#:.]?\s*\d{2,}[\d-]*").expect("static regex")
});

/// Elements whose text never counts as page content.
const NON_CONTENT: &[&str] = &["script", "style", "noscript", "template"];

/// Visible text of a document with markup removed, whitespace collapsed.
fn visible_text(document: &Html) -> String {
    let mut out = String::new();
    for node in document.root_element().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let hidden = node
            .parent()
            .and_then(|p| p.value().as_element().map(|e| e.name().to_string()))
            .is_some_and(|name| NON_CONTENT.contains(&name.as_str()));
        if !hidden {
            out.push_str(text);
            out.push(' ');
        }
    }
    collapse_whitespace(&out)
}

fn element_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// A root page reduced to what the generic heuristic needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootPage {
    /// Lowercased visible text.
    pub text: String,
    /// Absolute http(s) URLs of relevant links, document order, no repeats.
    pub candidate_links: Vec<Url>,
}

/// Parse a root page and collect links whose text or href looks like a
/// procurement listing.
pub fn analyze_root(body: &str, base: &Url) -> RootPage {
    let document = Html::parse_document(body);
    let text = visible_text(&document).to_lowercase();

    let candidate_links = document
        .select(&LINK_SELECTOR)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            let anchor = element_text(a);
            if !is_relevant_link_text(&anchor) && !is_relevant_link_text(href) {
                return None;
            }
            let resolved = base.join(href.trim()).ok()?;
            matches!(resolved.scheme(), "http" | "https").then_some(resolved)
        })
        .map(|mut url| {
            url.set_fragment(None);
            url
        })
        .filter(|url| url != base)
        .unique()
        .collect();

    RootPage {
        text,
        candidate_links,
    }
}

/// A linked page reduced to what the generic heuristic needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPage {
    /// Lowercased visible text.
    pub text: String,
    /// First non-empty `<h1>`, `<h2>` or `<title>`, in that priority.
    pub title: Option<String>,
    /// First reference number such as `RFP-2024-017`, uppercased.
    pub reference_number: Option<String>,
}

pub fn analyze_detail(body: &str) -> DetailPage {
    let document = Html::parse_document(body);
    let raw_text = visible_text(&document);

    let title = TITLE_SELECTORS.iter().find_map(|selector| {
        document
            .select(selector)
            .map(element_text)
            .find(|t| !t.is_empty())
    });

    DetailPage {
        title,
        reference_number: extract_reference_number(&raw_text),
        text: raw_text.to_lowercase(),
    }
}

/// Find an `RFP`/`BID`/`SOLICITATION` number in free text.
pub fn extract_reference_number(text: &str) -> Option<String> {
    REFERENCE_RE.find(text).map(|m| m.as_str().to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://procure.example.gov/portal/").unwrap()
    }

    #[test]
    fn test_visible_text_skips_scripts_and_styles() {
        let html = r#"<html><head><title>Portal</title><style>.medicaid{}</style></head>
            <body><script>var medicaid = 1;</script><p>Road  Salt</p></body></html>"#;
        let page = analyze_root(html, &base());
        assert!(page.text.contains("road salt"));
        assert!(page.text.contains("portal"));
        assert!(!page.text.contains("medicaid"));
    }

    #[test]
    fn test_candidate_links_are_resolved_filtered_and_unique() {
        let html = r#"<body>
            <a href="/bids/open">Current opportunities</a>
            <a href="about.html">About us</a>
            <a href="rfp-list.html">Listings</a>
            <a href="/bids/open#top">Open bids again</a>
            <a href="mailto:rfp@example.gov">Email the RFP desk</a>
            <a href="https://other.example.org/Solicitations">External</a>
        </body>"#;
        let page = analyze_root(html, &base());
        let links: Vec<String> = page.candidate_links.iter().map(Url::to_string).collect();

        assert_eq!(
            links,
            vec![
                "https://procure.example.gov/bids/open",
                "https://procure.example.gov/portal/rfp-list.html",
                "https://other.example.org/Solicitations",
            ]
        );
    }

    #[test]
    fn test_detail_title_priority() {
        let with_h1 = "<title>Site</title><h2>Section</h2><h1> Managed  Care RFP </h1>";
        assert_eq!(
            analyze_detail(with_h1).title.as_deref(),
            Some("Managed Care RFP")
        );

        let with_h2 = "<title>Site</title><h1>  </h1><h2>Section</h2>";
        assert_eq!(analyze_detail(with_h2).title.as_deref(), Some("Section"));

        let only_title = "<html><head><title>Site</title></head><body>x</body></html>";
        assert_eq!(analyze_detail(only_title).title.as_deref(), Some("Site"));

        assert_eq!(analyze_detail("<p>nothing</p>").title, None);
    }

    #[test]
    fn test_reference_number_extraction() {
        assert_eq!(
            extract_reference_number("See rfp-2024-017 for details").as_deref(),
            Some("RFP-2024-017")
        );
        assert_eq!(
            extract_reference_number("Solicitation #88231 closes soon").as_deref(),
            Some("SOLICITATION #88231")
        );
        assert_eq!(
            extract_reference_number("Bid 42 awarded").as_deref(),
            Some("BID 42")
        );
        assert_eq!(extract_reference_number("bid 7 only one digit"), None);
        assert_eq!(extract_reference_number("bidder list"), None);
    }

    #[test]
    fn test_malformed_markup_degrades_gracefully() {
        let page = analyze_detail("<h1>Health plan <b>services</h1></div></span");
        assert_eq!(page.title.as_deref(), Some("Health plan services"));
        assert!(page.text.contains("health plan"));
    }
}
