//! Label Normalizer - native vocabularies to the standard taxonomy
//!
//! Policy, first match wins:
//! 1. Recognized positive/negative/neutral synonyms (case-insensitive)
//! 2. Positional class codes (`LABEL_n` or bare `n`), read per label space
//! 3. Binary label spaces only: a score band synthesizes Neutral
//!    (>= 0.6 implied polarity, <= 0.4 opposite polarity, otherwise Neutral)
//!
//! Rule 3 is an approximation. A binary model has no neutral class, so the
//! band between 0.4 and 0.6 is read as "the model is unsure" and reported as
//! Neutral. It is the only place a Neutral verdict is manufactured.

use crate::types::{ClassScores, LabelSpace, NativeResult, SentimentLabel};
use thiserror::Error;

/// Binary scores at or above this keep the implied polarity
pub const BINARY_UPPER_BAND: f64 = 0.6;

/// Binary scores at or below this flip to the opposite polarity
pub const BINARY_LOWER_BAND: f64 = 0.4;

const POSITIVE_SYNONYMS: &[&str] = &["positive", "pos", "+"];
const NEGATIVE_SYNONYMS: &[&str] = &["negative", "neg", "-"];
const NEUTRAL_SYNONYMS: &[&str] = &["neutral", "neu", "none"];

/// Native result mapped onto the standard taxonomy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedVote {
    pub label: SentimentLabel,
    /// Magnitude of evidence (0.0-1.0)
    pub confidence: f64,
    pub scores: ClassScores,
}

#[derive(Debug, Error, PartialEq)]
pub enum NormalizeError {
    #[error("Unrecognized native label '{0}'")]
    UnknownLabel(String),
}

/// Resolve a native label through the synonym and positional-code rules
pub fn resolve_label(native: &str, space: LabelSpace) -> Option<SentimentLabel> {
    let lowered = native.trim().to_lowercase();

    // Rule 1: synonyms
    if POSITIVE_SYNONYMS.contains(&lowered.as_str()) {
        return Some(SentimentLabel::Positive);
    }
    if NEGATIVE_SYNONYMS.contains(&lowered.as_str()) {
        return Some(SentimentLabel::Negative);
    }
    if NEUTRAL_SYNONYMS.contains(&lowered.as_str()) {
        return Some(SentimentLabel::Neutral);
    }

    // Rule 2: positional codes
    let code = lowered.strip_prefix("label_").unwrap_or(&lowered);
    match (space, code) {
        (LabelSpace::ThreeWay, "0") => Some(SentimentLabel::Negative),
        (LabelSpace::ThreeWay, "1") => Some(SentimentLabel::Neutral),
        (LabelSpace::ThreeWay, "2") => Some(SentimentLabel::Positive),
        (LabelSpace::Binary, "0") => Some(SentimentLabel::Negative),
        (LabelSpace::Binary, "1") => Some(SentimentLabel::Positive),
        _ => None,
    }
}

/// Clamp a native magnitude into [0, 1]; non-finite values carry no evidence
pub fn evidence(score: f64) -> f64 {
    if score.is_finite() {
        score.abs().min(1.0)
    } else {
        0.0
    }
}

/// Map a native result onto the standard taxonomy
///
/// # Errors
/// `UnknownLabel` when neither rule 1 nor rule 2 recognizes the label; the
/// fusion engine treats that as an abstention.
pub fn normalize(native: &NativeResult) -> Result<NormalizedVote, NormalizeError> {
    let implied = resolve_label(&native.label, native.label_space)
        .ok_or_else(|| NormalizeError::UnknownLabel(native.label.clone()))?;

    let (label, confidence) = match native.label_space {
        LabelSpace::ThreeWay => (implied, evidence(native.score)),
        LabelSpace::Binary => apply_binary_band(implied, native.score),
    };

    Ok(NormalizedVote {
        label,
        confidence,
        scores: map_class_scores(native),
    })
}

/// Rule 3: synthesize Neutral for binary backends
fn apply_binary_band(implied: SentimentLabel, score: f64) -> (SentimentLabel, f64) {
    let score = if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.5
    };

    if implied == SentimentLabel::Neutral {
        return (SentimentLabel::Neutral, evidence(score));
    }

    if score >= BINARY_UPPER_BAND {
        (implied, score)
    } else if score <= BINARY_LOWER_BAND {
        (implied.opposite(), 1.0 - score)
    } else {
        // 0.5 is the strongest "unsure"; the band edges approach 0.8
        (SentimentLabel::Neutral, 1.0 - (score - 0.5).abs() * 2.0)
    }
}

/// Map native per-class scores onto the three standard classes
///
/// Unrecognized keys are dropped and missing classes stay 0. A backend that
/// reports no class scores gets its headline verdict as a one-hot vector.
fn map_class_scores(native: &NativeResult) -> ClassScores {
    let mut scores = ClassScores::default();
    let mut recognized = false;

    for (key, value) in &native.class_scores {
        if let Some(label) = resolve_label(key, native.label_space) {
            *scores.get_mut(label) = if value.is_finite() { *value } else { 0.0 };
            recognized = true;
        }
    }

    if !recognized {
        if let Some(label) = resolve_label(&native.label, native.label_space) {
            *scores.get_mut(label) = evidence(native.score);
        }
    }

    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn native(label: &str, score: f64, space: LabelSpace) -> NativeResult {
        NativeResult {
            label: label.to_string(),
            score,
            class_scores: vec![],
            label_space: space,
        }
    }

    #[test]
    fn test_synonyms_case_insensitive() {
        for (raw, expected) in [
            ("POSITIVE", SentimentLabel::Positive),
            ("pos", SentimentLabel::Positive),
            ("Negative", SentimentLabel::Negative),
            ("neg", SentimentLabel::Negative),
            ("Neutral", SentimentLabel::Neutral),
            ("neu", SentimentLabel::Neutral),
        ] {
            assert_eq!(resolve_label(raw, LabelSpace::ThreeWay), Some(expected), "{}", raw);
        }
    }

    #[test]
    fn test_positional_codes() {
        assert_eq!(
            resolve_label("LABEL_0", LabelSpace::ThreeWay),
            Some(SentimentLabel::Negative)
        );
        assert_eq!(
            resolve_label("LABEL_1", LabelSpace::ThreeWay),
            Some(SentimentLabel::Neutral)
        );
        assert_eq!(
            resolve_label("label_2", LabelSpace::ThreeWay),
            Some(SentimentLabel::Positive)
        );
        assert_eq!(
            resolve_label("LABEL_1", LabelSpace::Binary),
            Some(SentimentLabel::Positive)
        );
        assert_eq!(resolve_label("LABEL_2", LabelSpace::Binary), None);
    }

    #[test]
    fn test_compound_score_is_absolute_valued() {
        let vote = normalize(&native("neg", -0.73, LabelSpace::ThreeWay)).unwrap();
        assert_eq!(vote.label, SentimentLabel::Negative);
        assert!((vote.confidence - 0.73).abs() < 1e-12);
    }

    #[test]
    fn test_confidence_clamped() {
        let vote = normalize(&native("positive", 3.5, LabelSpace::ThreeWay)).unwrap();
        assert_eq!(vote.confidence, 1.0);

        let vote = normalize(&native("positive", f64::NAN, LabelSpace::ThreeWay)).unwrap();
        assert_eq!(vote.confidence, 0.0);
    }

    #[test]
    fn test_binary_band() {
        let strong = normalize(&native("POSITIVE", 0.92, LabelSpace::Binary)).unwrap();
        assert_eq!(strong.label, SentimentLabel::Positive);
        assert!((strong.confidence - 0.92).abs() < 1e-12);

        let flipped = normalize(&native("POSITIVE", 0.3, LabelSpace::Binary)).unwrap();
        assert_eq!(flipped.label, SentimentLabel::Negative);
        assert!((flipped.confidence - 0.7).abs() < 1e-12);

        let unsure = normalize(&native("NEGATIVE", 0.5, LabelSpace::Binary)).unwrap();
        assert_eq!(unsure.label, SentimentLabel::Neutral);
        assert!((unsure.confidence - 1.0).abs() < 1e-12);

        let edge = normalize(&native("NEGATIVE", 0.6, LabelSpace::Binary)).unwrap();
        assert_eq!(edge.label, SentimentLabel::Negative);
    }

    #[test]
    fn test_unknown_label_rejected() {
        let result = normalize(&native("sarcastic", 0.9, LabelSpace::ThreeWay));
        assert_eq!(
            result,
            Err(NormalizeError::UnknownLabel("sarcastic".to_string()))
        );
    }

    #[test]
    fn test_class_scores_mapped_and_unknown_dropped() {
        let vote = normalize(&NativeResult {
            label: "LABEL_2".into(),
            score: 0.7,
            class_scores: vec![
                ("LABEL_0".into(), 0.1),
                ("LABEL_1".into(), 0.2),
                ("LABEL_2".into(), 0.7),
                ("compound".into(), 0.9),
            ],
            label_space: LabelSpace::ThreeWay,
        })
        .unwrap();

        assert_eq!(vote.scores, ClassScores::new(0.7, 0.1, 0.2));
    }

    #[test]
    fn test_missing_class_scores_become_one_hot() {
        let vote = normalize(&native("neg", -0.4, LabelSpace::ThreeWay)).unwrap();
        assert_eq!(vote.scores, ClassScores::new(0.0, 0.4, 0.0));
    }
}
