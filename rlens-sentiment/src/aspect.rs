//! Aspect Extractor - keyword-scoped sentence selection
//!
//! Splits a review on `.`, `!` and `?`, keeps the trimmed non-empty segments
//! that contain any keyword of the requested aspect (case-insensitive
//! substring), and hands the joined segments to fusion.

use aho_corasick::{AhoCorasick, BuildError};
use rlens_common::config::default_aspects;
use std::collections::BTreeMap;
use thiserror::Error;

/// Separator used when several aspect sentences are scored as one text
pub const SENTENCE_JOINER: &str = ". ";

/// Question keywords per aspect, in detection order
const QUESTION_KEYWORDS: [(&str, &[&str]); 4] = [
    (
        "food",
        &[
            "food", "taste", "flavor", "dish", "meal", "cuisine", "delicious", "tasty", "pizza",
            "pasta", "menu",
        ],
    ),
    (
        "service",
        &[
            "service", "staff", "waiter", "server", "friendly", "helpful", "rude", "slow", "fast",
            "attentive",
        ],
    ),
    (
        "ambience",
        &[
            "ambience", "atmosphere", "environment", "decor", "music", "lighting", "cozy",
            "noisy", "clean",
        ],
    ),
    (
        "price",
        &[
            "price", "cost", "expensive", "cheap", "value", "money", "worth", "affordable",
            "overpriced", "quantity",
        ],
    ),
];

#[derive(Debug, Error, PartialEq)]
#[error("Aspect '{0}' is not configured")]
pub struct UnknownAspect(pub String);

/// Keyword matcher for one aspect could not be compiled
#[derive(Debug, Error)]
#[error("Keyword matcher for aspect '{aspect}' failed to build: {source}")]
pub struct CatalogError {
    pub aspect: String,
    #[source]
    pub source: BuildError,
}

/// Keywords of one aspect and their compiled matcher
#[derive(Debug, Clone)]
struct AspectKeywords {
    keywords: Vec<String>,
    matcher: AhoCorasick,
}

/// Aspect categories and their keywords (names and keywords lowercase)
///
/// Keyword matching folds ASCII case only.
#[derive(Debug, Clone)]
pub struct AspectCatalog {
    categories: BTreeMap<String, AspectKeywords>,
}

impl Default for AspectCatalog {
    fn default() -> Self {
        Self::new(default_aspects()).expect("Failed to build default aspect catalog")
    }
}

impl AspectCatalog {
    pub fn new(categories: BTreeMap<String, Vec<String>>) -> Result<Self, CatalogError> {
        let mut compiled = BTreeMap::new();
        for (name, keywords) in categories {
            let name = name.trim().to_lowercase();
            let keywords: Vec<String> = keywords
                .into_iter()
                .map(|k| k.trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect();
            let matcher = AhoCorasick::builder()
                .ascii_case_insensitive(true)
                .build(&keywords)
                .map_err(|source| CatalogError {
                    aspect: name.clone(),
                    source,
                })?;
            compiled.insert(name, AspectKeywords { keywords, matcher });
        }
        Ok(Self {
            categories: compiled,
        })
    }

    /// Configured aspect names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn contains(&self, aspect: &str) -> bool {
        self.categories.contains_key(&aspect.trim().to_lowercase())
    }

    pub fn keywords(&self, aspect: &str) -> Option<&[String]> {
        self.categories
            .get(&aspect.trim().to_lowercase())
            .map(|entry| entry.keywords.as_slice())
    }

    /// Sentences of `text` that mention `aspect`, in text order
    ///
    /// # Errors
    /// `UnknownAspect` when `aspect` is not a configured category.
    pub fn extract(&self, text: &str, aspect: &str) -> Result<Vec<String>, UnknownAspect> {
        let entry = self
            .categories
            .get(&aspect.trim().to_lowercase())
            .ok_or_else(|| UnknownAspect(aspect.to_string()))?;

        Ok(split_sentences(text)
            .filter(|sentence| entry.matcher.is_match(*sentence))
            .map(str::to_string)
            .collect())
    }
}

/// Trimmed non-empty segments between `.`, `!` and `?`
pub fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Aspect a user question is about, if any
///
/// Checks food, service, ambience and price in that order and returns the
/// first whose question keywords occur in `question`.
pub fn detect_question_aspect(question: &str) -> Option<&'static str> {
    let lowered = question.to_lowercase();
    QUESTION_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(aspect, _)| *aspect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_matches_in_order() {
        let catalog = AspectCatalog::default();
        let sentences = catalog
            .extract(
                "The waiter was rude! The pasta was great. Staff ignored us?",
                "service",
            )
            .unwrap();
        assert_eq!(sentences, vec!["The waiter was rude", "Staff ignored us"]);
    }

    #[test]
    fn test_extract_not_mentioned() {
        let catalog = AspectCatalog::default();
        let sentences = catalog
            .extract("Great pasta, friendly staff.", "price")
            .unwrap();
        assert!(sentences.is_empty());
    }

    #[test]
    fn test_aspect_name_case_insensitive() {
        let catalog = AspectCatalog::default();
        let sentences = catalog.extract("Way too EXPENSIVE.", "Price").unwrap();
        assert_eq!(sentences, vec!["Way too EXPENSIVE"]);
    }

    #[test]
    fn test_unknown_aspect() {
        let catalog = AspectCatalog::default();
        assert_eq!(
            catalog.extract("Free parking.", "parking"),
            Err(UnknownAspect("parking".to_string()))
        );
    }

    #[test]
    fn test_custom_catalog() {
        let mut categories = default_aspects();
        categories.insert("Drinks".into(), vec!["Wine".into(), "  ".into()]);
        let catalog = AspectCatalog::new(categories).unwrap();

        assert!(catalog.contains("drinks"));
        assert_eq!(catalog.keywords("drinks").unwrap(), ["wine".to_string()]);
        let sentences = catalog
            .extract("The wine list is short. Bread was fine.", "drinks")
            .unwrap();
        assert_eq!(sentences, vec!["The wine list is short"]);
    }

    #[test]
    fn test_keyword_match_ignores_ascii_case() {
        let catalog = AspectCatalog::default();
        let sentences = catalog
            .extract("SERVICE was slow. Our waitress forgot the bread.", "service")
            .unwrap();
        assert_eq!(
            sentences,
            vec!["SERVICE was slow", "Our waitress forgot the bread"]
        );
    }

    #[test]
    fn test_split_sentences_drops_empty_segments() {
        let parts: Vec<&str> = split_sentences("Wow!!  Really?. ").collect();
        assert_eq!(parts, vec!["Wow", "Really"]);
    }

    #[test]
    fn test_detect_question_aspect() {
        assert_eq!(detect_question_aspect("How is the PIZZA here?"), Some("food"));
        assert_eq!(detect_question_aspect("Is the staff friendly?"), Some("service"));
        assert_eq!(detect_question_aspect("Is it good value for money?"), Some("price"));
        assert_eq!(detect_question_aspect("Where is it located?"), None);
    }

    #[test]
    fn test_detect_question_aspect_order() {
        // "menu" (food) wins over "expensive" (price)
        assert_eq!(
            detect_question_aspect("Is the menu expensive?"),
            Some("food")
        );
    }
}
