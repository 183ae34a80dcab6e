//! Keyword vocabularies and the case-insensitive matcher.
//!
//! Two built-in content vocabularies are provided; which one is active is a
//! configuration choice made by the caller, never by the matcher.

use itertools::Itertools;
use serde::Deserialize;

/// Broad Medicaid / healthcare vocabulary.
pub const BROAD_TERMS: &[&str] = &[
    "medicaid",
    "managed care",
    "health plan",
    "healthcare services",
    "medical assistance",
];

/// Narrower clinical-services vocabulary.
pub const CLINICAL_TERMS: &[&str] = &[
    "managed care",
    "hcbs",
    "home and community based services",
    "behavioral health",
    "long-term services and supports",
    "ltss",
];

/// Terms that make a hyperlink worth following from a root page.
pub const LINK_TERMS: &[&str] = &[
    "rfp",
    "solicitation",
    "bid",
    "opportunity",
    "proposal",
    "procurement",
];

/// Return the vocabulary terms contained in `text`, in vocabulary order.
///
/// Matching is a case-insensitive substring test. Blank terms never match.
///
/// # Arguments
///
/// * `text` - Page text to inspect
/// * `vocabulary` - Terms to look for
///
/// # Returns
///
/// The matched terms, lowercased, each reported once.
///
/// # Examples
///
/// ```ignore
/// let text = "this page discusses Managed Care services";
/// let found = match_keywords(text, &["managed care", "hcbs"]);
/// assert_eq!(found, vec!["managed care"]);
/// ```
pub fn match_keywords<S: AsRef<str>>(text: &str, vocabulary: &[S]) -> Vec<String> {
    let haystack = text.to_lowercase();
    vocabulary
        .iter()
        .map(|term| term.as_ref().trim().to_lowercase())
        .filter(|term| !term.is_empty() && haystack.contains(term.as_str()))
        .unique()
        .collect()
}

/// Which content vocabulary a deployment watches for.
///
/// In YAML this is either a name or a single-key map:
///
/// ```yaml
/// vocabulary: clinical
/// vocabulary: {custom: [dental, pharmacy benefit]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "VocabularyConfig")]
pub enum VocabularyChoice {
    #[default]
    Broad,
    Clinical,
    Custom(Vec<String>),
}

/// Accepted YAML shapes for [`VocabularyChoice`].
#[derive(Deserialize)]
#[serde(untagged)]
enum VocabularyConfig {
    Named(NamedVocabulary),
    Custom { custom: Vec<String> },
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum NamedVocabulary {
    Broad,
    Clinical,
}

impl From<VocabularyConfig> for VocabularyChoice {
    fn from(raw: VocabularyConfig) -> Self {
        match raw {
            VocabularyConfig::Named(NamedVocabulary::Broad) => VocabularyChoice::Broad,
            VocabularyConfig::Named(NamedVocabulary::Clinical) => VocabularyChoice::Clinical,
            VocabularyConfig::Custom { custom } => VocabularyChoice::Custom(custom),
        }
    }
}

/// A resolved vocabulary: the terms plus a label used in generated titles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    pub label: String,
    pub terms: Vec<String>,
}

impl Vocabulary {
    pub fn from_choice(choice: &VocabularyChoice) -> Self {
        match choice {
            VocabularyChoice::Broad => Self::new("Medicaid/Healthcare", BROAD_TERMS),
            VocabularyChoice::Clinical => Self::new("Clinical Services", CLINICAL_TERMS),
            VocabularyChoice::Custom(terms) => Self::new("Procurement", terms),
        }
    }

    pub fn new<S: AsRef<str>>(label: &str, terms: &[S]) -> Self {
        Self {
            label: label.to_string(),
            terms: terms.iter().map(|t| t.as_ref().to_string()).collect(),
        }
    }

    pub fn matches(&self, text: &str) -> Vec<String> {
        match_keywords(text, &self.terms)
    }
}

/// True when `text` mentions any link-relevance term.
pub fn is_relevant_link_text(text: &str) -> bool {
    !match_keywords(text, LINK_TERMS).is_empty()
}
