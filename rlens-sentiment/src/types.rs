//! Core Types and Trait Definitions for RestaurantLens Sentiment
//!
//! Defines the adapter contract and result types for the fusion pipeline:
//! - **Tier 1:** ClassifierAdapter (one per scoring backend)
//! - **Tier 2:** Label normalization and confidence-weighted fusion
//! - **Tier 3:** Aspect scoping and multilingual metadata
//!
//! Every layer returns a freshly built result; nothing here is mutated after
//! it leaves the layer that produced it.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

// ============================================================================
// Common Types
// ============================================================================

/// Standard three-class polarity taxonomy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
}

impl SentimentLabel {
    /// All labels in tie-break priority order (Positive > Negative > Neutral)
    pub const PRIORITY: [SentimentLabel; 3] = [
        SentimentLabel::Positive,
        SentimentLabel::Negative,
        SentimentLabel::Neutral,
    ];

    /// Lowercase class name used as a score key
    pub fn as_key(&self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Negative => "negative",
            SentimentLabel::Neutral => "neutral",
        }
    }

    /// Opposite polarity (Neutral has none)
    pub fn opposite(&self) -> SentimentLabel {
        match self {
            SentimentLabel::Positive => SentimentLabel::Negative,
            SentimentLabel::Negative => SentimentLabel::Positive,
            SentimentLabel::Neutral => SentimentLabel::Neutral,
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SentimentLabel::Positive => write!(f, "Positive"),
            SentimentLabel::Negative => write!(f, "Negative"),
            SentimentLabel::Neutral => write!(f, "Neutral"),
        }
    }
}

/// Per-class scores keyed by the three standard classes
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassScores {
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
}

impl ClassScores {
    pub fn new(positive: f64, negative: f64, neutral: f64) -> Self {
        Self {
            positive,
            negative,
            neutral,
        }
    }

    /// Scores for a result that carries no polarity evidence at all
    pub fn all_neutral() -> Self {
        Self::new(0.0, 0.0, 1.0)
    }

    pub fn get(&self, label: SentimentLabel) -> f64 {
        match label {
            SentimentLabel::Positive => self.positive,
            SentimentLabel::Negative => self.negative,
            SentimentLabel::Neutral => self.neutral,
        }
    }

    pub fn get_mut(&mut self, label: SentimentLabel) -> &mut f64 {
        match label {
            SentimentLabel::Positive => &mut self.positive,
            SentimentLabel::Negative => &mut self.negative,
            SentimentLabel::Neutral => &mut self.neutral,
        }
    }
}

// ============================================================================
// Tier 1: Classifier Adapter Trait
// ============================================================================

/// Label vocabulary of a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelSpace {
    /// negative / neutral / positive
    ThreeWay,
    /// negative / positive (no neutral class)
    Binary,
}

impl From<rlens_common::config::LabelSpaceSetting> for LabelSpace {
    fn from(setting: rlens_common::config::LabelSpaceSetting) -> Self {
        match setting {
            rlens_common::config::LabelSpaceSetting::ThreeWay => LabelSpace::ThreeWay,
            rlens_common::config::LabelSpaceSetting::Binary => LabelSpace::Binary,
        }
    }
}

/// Backend output in the backend's own vocabulary
///
/// `score` is whatever the backend calls its headline number: a compound
/// score in [-1, 1], a polarity, or a class probability.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeResult {
    /// Native label string (e.g. "pos", "LABEL_2", "POSITIVE")
    pub label: String,
    /// Native headline score
    pub score: f64,
    /// Optional per-class native scores, keyed by native class names
    pub class_scores: Vec<(String, f64)>,
    /// Vocabulary the label and class names come from
    pub label_space: LabelSpace,
}

/// Tier 1 classifier adapter
///
/// One implementation per scoring backend, selected by the availability
/// registry from configuration.
///
/// # Example
/// ```rust,ignore
/// use rlens_sentiment::types::{AdapterError, ClassifierAdapter, LabelSpace, NativeResult};
///
/// struct Constant;
///
/// #[async_trait::async_trait]
/// impl ClassifierAdapter for Constant {
///     fn name(&self) -> &str { "constant" }
///
///     async fn score(&self, _text: &str) -> Result<NativeResult, AdapterError> {
///         Ok(NativeResult {
///             label: "positive".into(),
///             score: 0.9,
///             class_scores: vec![],
///             label_space: LabelSpace::ThreeWay,
///         })
///     }
/// }
/// ```
#[async_trait::async_trait]
pub trait ClassifierAdapter: Send + Sync {
    /// Adapter name for provenance tracking (`single:<name>`)
    fn name(&self) -> &str;

    /// Score one non-empty, already truncated text
    ///
    /// # Errors
    /// Any error makes this adapter abstain for the current call only.
    async fn score(&self, text: &str) -> Result<NativeResult, AdapterError>;
}

/// Adapter failure, at construction or call time
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Backend resource absent (construction) or refused the call
    #[error("Adapter not available: {0}")]
    Unavailable(String),

    /// Call exceeded the per-call budget
    #[error("Adapter timed out after {0:?}")]
    Timeout(Duration),

    /// Network communication error
    #[error("Network error: {0}")]
    Network(String),

    /// Backend answered with an error
    #[error("Backend error: {0}")]
    Backend(String),

    /// Failed to parse backend output or a resource file
    #[error("Parse error: {0}")]
    Parse(String),

    /// I/O error (resource files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for AdapterError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AdapterError::Parse(err.to_string())
        } else {
            AdapterError::Network(err.to_string())
        }
    }
}

// ============================================================================
// Tier 2: Fusion Results
// ============================================================================

/// Which method produced a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum AnalysisMethod {
    /// One adapter's normalized result
    Single(String),
    /// Confidence-weighted fusion of two or more adapters
    Hybrid,
    /// Built-in lexicon-count fallback
    Basic,
    /// Empty or whitespace-only input
    Empty,
    /// Aspect requested but not mentioned; nothing was scored
    NotMentioned,
}

impl std::fmt::Display for AnalysisMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisMethod::Single(name) => write!(f, "single:{}", name),
            AnalysisMethod::Hybrid => write!(f, "hybrid"),
            AnalysisMethod::Basic => write!(f, "basic"),
            AnalysisMethod::Empty => write!(f, "empty"),
            AnalysisMethod::NotMentioned => write!(f, "not_found"),
        }
    }
}

impl From<AnalysisMethod> for String {
    fn from(method: AnalysisMethod) -> Self {
        method.to_string()
    }
}

impl TryFrom<String> for AnalysisMethod {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "hybrid" => Ok(AnalysisMethod::Hybrid),
            "basic" => Ok(AnalysisMethod::Basic),
            "empty" => Ok(AnalysisMethod::Empty),
            "not_found" => Ok(AnalysisMethod::NotMentioned),
            other => other
                .strip_prefix("single:")
                .map(|name| AnalysisMethod::Single(name.to_string()))
                .ok_or_else(|| format!("unknown analysis method '{}'", other)),
        }
    }
}

/// One adapter's normalized vote, kept for provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceVote {
    /// Adapter name
    pub method: String,
    pub label: SentimentLabel,
    pub confidence: f64,
    /// Configured fusion weight of the adapter
    pub weight: f64,
}

/// Standardized polarity verdict
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    /// Strength of evidence for `label` (0.0-1.0)
    pub confidence: f64,
    pub scores: ClassScores,
    pub method: AnalysisMethod,
    pub original_text: String,
    /// Text actually scored, when it differs from `original_text`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processed_text: Option<String>,
    /// Votes that contributed (empty for `basic` and `empty`)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceVote>,
}

impl SentimentResult {
    /// Fixed result for empty or whitespace-only input
    pub fn empty(original_text: &str) -> Self {
        Self {
            label: SentimentLabel::Neutral,
            confidence: 0.0,
            scores: ClassScores::all_neutral(),
            method: AnalysisMethod::Empty,
            original_text: original_text.to_string(),
            processed_text: None,
            sources: vec![],
        }
    }

    /// Accumulated `weight × confidence` of the votes for `label`
    pub fn label_support(&self, label: SentimentLabel) -> f64 {
        self.sources
            .iter()
            .filter(|v| v.label == label)
            .map(|v| v.weight * v.confidence)
            .sum()
    }
}

// ============================================================================
// Tier 3: Aspect and Multilingual Results
// ============================================================================

/// Verdict restricted to the spans of a review that mention one aspect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectResult {
    pub aspect: String,
    pub aspect_mentioned: bool,
    /// Matched sentences in text order (empty when not mentioned)
    pub aspect_sentences: Vec<String>,
    #[serde(flatten)]
    pub sentiment: SentimentResult,
}

/// Verdict plus the language metadata of the original input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultilingualResult<T> {
    #[serde(flatten)]
    pub result: T,
    /// ISO 639-1 code of the input
    pub original_language: String,
    /// Pivot-language text, absent when no translation happened
    pub translated_text: Option<String>,
    /// Detection or translation failed and the engine fell back
    #[serde(default)]
    pub translation_degraded: bool,
}

/// Access to the sentiment part of any result layer
pub trait SentimentOutcome {
    fn sentiment(&self) -> &SentimentResult;
    fn sentiment_mut(&mut self) -> &mut SentimentResult;
}

impl SentimentOutcome for SentimentResult {
    fn sentiment(&self) -> &SentimentResult {
        self
    }

    fn sentiment_mut(&mut self) -> &mut SentimentResult {
        self
    }
}

impl SentimentOutcome for AspectResult {
    fn sentiment(&self) -> &SentimentResult {
        &self.sentiment
    }

    fn sentiment_mut(&mut self) -> &mut SentimentResult {
        &mut self.sentiment
    }
}

impl<T: SentimentOutcome> MultilingualResult<T> {
    pub fn label(&self) -> SentimentLabel {
        self.result.sentiment().label
    }

    pub fn confidence(&self) -> f64 {
        self.result.sentiment().confidence
    }
}

// ============================================================================
// Tests
// ============================================================================
