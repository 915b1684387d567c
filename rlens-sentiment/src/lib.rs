//! rlens-sentiment - sentiment fusion and aspect extraction for reviews
//!
//! Layers, leaf first:
//! - [`adapters`]: Tier 1 classifier adapters (valence, polarity, model)
//! - [`normalizer`]: native labels to Positive / Negative / Neutral
//! - [`registry`]: which adapters came up at startup
//! - [`fusion`]: Tier 2 confidence-weighted voting, with [`basic`] as fallback
//! - [`aspect`] and [`engine`]: aspect-scoped analysis
//! - [`multilingual`]: Tier 3 detect, translate, analyze

pub mod adapters;
pub mod aspect;
pub mod basic;
pub mod engine;
pub mod fusion;
pub mod language;
pub mod multilingual;
pub mod normalizer;
pub mod registry;
pub mod summary;
pub mod translation;
pub mod types;

pub use engine::{MethodPreference, SentimentEngine};
pub use multilingual::MultilingualAnalyzer;
pub use registry::AvailabilityRegistry;
pub use types::{
    AnalysisMethod, AspectResult, ClassScores, ClassifierAdapter, MultilingualResult,
    SentimentLabel, SentimentResult,
};
