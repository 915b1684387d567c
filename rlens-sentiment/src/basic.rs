//! Basic fallback scorer
//!
//! Counts fixed positive and negative restaurant words. Used when no adapter
//! is live, when every live adapter abstains, or when "basic" is requested.

use crate::types::{AnalysisMethod, ClassScores, SentimentLabel, SentimentResult};
use aho_corasick::{AhoCorasick, BuildError};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Confidence ceiling for a polar basic verdict
const MAX_CONFIDENCE: f64 = 0.8;

/// Confidence reported on a tie
const TIE_CONFIDENCE: f64 = 0.5;

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "wonderful", "fantastic", "delicious", "tasty",
    "fresh", "perfect", "love", "best", "outstanding", "superb", "brilliant", "awesome",
    "incredible",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "horrible", "disgusting", "worst", "hate", "disappointing",
    "poor", "bland", "cold", "stale", "overpriced", "slow", "rude", "dirty", "unacceptable",
];

/// Case-insensitive matchers over the fixed word lists, built on first use
struct WordMatchers {
    positive: AhoCorasick,
    negative: AhoCorasick,
}

fn build_matcher(words: &[&str]) -> Result<AhoCorasick, BuildError> {
    AhoCorasick::builder()
        .ascii_case_insensitive(true)
        .build(words)
}

fn matchers() -> &'static WordMatchers {
    static MATCHERS: OnceLock<WordMatchers> = OnceLock::new();
    MATCHERS.get_or_init(|| WordMatchers {
        positive: build_matcher(POSITIVE_WORDS).expect("Failed to build positive word matcher"),
        negative: build_matcher(NEGATIVE_WORDS).expect("Failed to build negative word matcher"),
    })
}

/// Number of distinct listed words present in `text`
///
/// A word counts once however often it repeats.
fn distinct_hits(matcher: &AhoCorasick, text: &str) -> usize {
    let mut seen = HashSet::new();
    for hit in matcher.find_overlapping_iter(text) {
        seen.insert(hit.pattern());
    }
    seen.len()
}

/// Score `text` with the fixed word lists
///
/// `text` is expected to be non-empty; the caller handles the empty case.
pub fn analyze_basic(text: &str) -> SentimentResult {
    let matchers = matchers();
    let positive = distinct_hits(&matchers.positive, text) as f64;
    let negative = distinct_hits(&matchers.negative, text) as f64;
    let words = text.split_whitespace().count().max(1) as f64;

    let polar_confidence = |count: f64| (count / (words * 0.1).max(1.0)).min(MAX_CONFIDENCE);

    let (label, confidence) = if positive > negative {
        (SentimentLabel::Positive, polar_confidence(positive))
    } else if negative > positive {
        (SentimentLabel::Negative, polar_confidence(negative))
    } else {
        (SentimentLabel::Neutral, TIE_CONFIDENCE)
    };

    SentimentResult {
        label,
        confidence: confidence.clamp(0.0, 1.0),
        scores: ClassScores::new(
            positive / words,
            negative / words,
            (1.0 - (positive + negative) / words).max(0.0),
        ),
        method: AnalysisMethod::Basic,
        original_text: text.to_string(),
        processed_text: None,
        sources: vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_short_text() {
        let result = analyze_basic("Great food, excellent staff");
        assert_eq!(result.label, SentimentLabel::Positive);
        // 2 hits over max(0.4, 1) capped at 0.8
        assert_eq!(result.confidence, 0.8);
        assert_eq!(result.method, AnalysisMethod::Basic);
        assert!((result.scores.positive - 0.5).abs() < 1e-12);
        assert!((result.scores.neutral - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_repeated_word_counts_once() {
        let text = format!("great great great {}", ["a"; 17].join(" "));
        let result = analyze_basic(&text);
        assert_eq!(result.label, SentimentLabel::Positive);
        // 1 distinct hit over max(2.0, 1)
        assert!((result.confidence - 0.5).abs() < 1e-12);
        assert!((result.scores.positive - 1.0 / 20.0).abs() < 1e-12);

        let result = analyze_basic("terrible terrible terrible food but good");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.confidence, 0.5);
    }

    #[test]
    fn test_negative_long_text() {
        let text = "We waited forty minutes for a table and then the soup arrived \
                    cold and the bread was stale by the time anyone came back and \
                    honestly we will not be returning to this place again any time soon";
        let result = analyze_basic(text);
        assert_eq!(result.label, SentimentLabel::Negative);
        let words = text.split_whitespace().count() as f64;
        assert!((result.confidence - 2.0 / (words * 0.1)).abs() < 1e-12);
    }

    #[test]
    fn test_tie_is_neutral() {
        let result = analyze_basic("good food but slow");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.confidence, 0.5);

        let result = analyze_basic("We visited on Tuesday");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.scores, ClassScores::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_case_insensitive_substring() {
        let result = analyze_basic("TERRIBLE. Just terribly RUDE.");
        assert_eq!(result.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_neutral_score_floored() {
        let result = analyze_basic("greatbestgoodtasty");
        assert_eq!(result.scores.neutral, 0.0);
        assert_eq!(result.scores.positive, 4.0);
    }
}
