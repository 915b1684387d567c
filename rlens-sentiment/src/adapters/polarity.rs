// Polarity Averaging Adapter
//
// Averages per-word polarity over the words that carry one.
// Native output: polarity in [-1, 1] and subjectivity in [0, 1].
// Native labels: "positive" (> 0.1), "negative" (< -0.1), "neutral" otherwise.

use super::{is_negation, word_tokens};
use crate::types::{AdapterError, ClassifierAdapter, LabelSpace, NativeResult};
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

/// Polarity threshold for a polar native label
const POLARITY_THRESHOLD: f64 = 0.1;

/// Multiplier for a word preceded by a negation
const NEGATION_FACTOR: f64 = -0.5;

/// Intensifiers and their multipliers
const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("extremely", 1.5),
    ("incredibly", 1.5),
    ("absolutely", 1.4),
    ("so", 1.2),
    ("too", 1.2),
    ("quite", 1.1),
    ("pretty", 1.1),
    ("slightly", 0.6),
    ("somewhat", 0.7),
    ("barely", 0.4),
];

/// (word, polarity, subjectivity)
const BUILTIN_LEXICON: &[(&str, f64, f64)] = &[
    ("good", 0.7, 0.6),
    ("great", 0.8, 0.75),
    ("excellent", 1.0, 1.0),
    ("amazing", 0.6, 0.9),
    ("wonderful", 1.0, 1.0),
    ("fantastic", 0.4, 0.9),
    ("delicious", 1.0, 1.0),
    ("tasty", 0.5, 0.6),
    ("fresh", 0.3, 0.5),
    ("perfect", 1.0, 1.0),
    ("best", 1.0, 0.3),
    ("outstanding", 0.5, 0.6),
    ("superb", 1.0, 1.0),
    ("awesome", 1.0, 1.0),
    ("nice", 0.6, 1.0),
    ("friendly", 0.375, 0.5),
    ("helpful", 0.4, 0.5),
    ("attentive", 0.4, 0.6),
    ("cozy", 0.5, 0.7),
    ("clean", 0.37, 0.69),
    ("pleasant", 0.73, 0.97),
    ("lovely", 0.5, 0.75),
    ("beautiful", 0.85, 1.0),
    ("happy", 0.8, 1.0),
    ("impressive", 1.0, 1.0),
    ("reasonable", 0.2, 0.6),
    ("affordable", 0.3, 0.5),
    ("generous", 0.5, 0.7),
    ("fine", 0.42, 0.5),
    ("decent", 0.17, 0.67),
    ("okay", 0.5, 0.5),
    ("ok", 0.5, 0.5),
    ("quick", 0.33, 0.5),
    ("fast", 0.2, 0.6),
    ("recommend", 0.3, 0.4),
    ("love", 0.5, 0.6),
    ("loved", 0.7, 0.8),
    ("enjoyed", 0.4, 0.5),
    ("favorite", 0.5, 1.0),
    ("bad", -0.7, 0.67),
    ("terrible", -1.0, 1.0),
    ("awful", -1.0, 1.0),
    ("horrible", -1.0, 1.0),
    ("disgusting", -1.0, 1.0),
    ("worst", -1.0, 1.0),
    ("poor", -0.4, 0.6),
    ("bland", -0.5, 0.5),
    ("cold", -0.6, 1.0),
    ("stale", -0.5, 0.5),
    ("overpriced", -0.5, 0.6),
    ("expensive", -0.5, 0.7),
    ("slow", -0.3, 0.4),
    ("rude", -0.3, 0.6),
    ("dirty", -0.6, 0.8),
    ("mediocre", -0.4, 0.6),
    ("greasy", -0.3, 0.5),
    ("soggy", -0.5, 0.6),
    ("noisy", -0.3, 0.5),
    ("loud", -0.2, 0.6),
    ("boring", -1.0, 1.0),
    ("disappointing", -0.6, 0.7),
    ("disappointed", -0.75, 0.75),
    ("unfriendly", -0.4, 0.6),
    ("sad", -0.5, 1.0),
    ("nasty", -1.0, 1.0),
    ("tasteless", -0.6, 0.8),
    ("undercooked", -0.4, 0.6),
    ("overcooked", -0.4, 0.6),
    ("cramped", -0.3, 0.5),
];

/// Polarity averaging adapter (polarity-score family)
pub struct PolarityAdapter {
    name: String,
    lexicon: HashMap<&'static str, (f64, f64)>,
}

impl PolarityAdapter {
    pub fn new(name: impl Into<String>) -> Self {
        let lexicon = BUILTIN_LEXICON
            .iter()
            .map(|(word, polarity, subjectivity)| (*word, (*polarity, *subjectivity)))
            .collect();
        Self {
            name: name.into(),
            lexicon,
        }
    }

    /// Mean (polarity, subjectivity) over the words found in the lexicon
    ///
    /// Text without any lexicon word scores (0.0, 0.0).
    pub fn sentiment(&self, text: &str) -> (f64, f64) {
        let tokens = word_tokens(text);
        let mut polarities = Vec::new();
        let mut subjectivities = Vec::new();

        for (i, token) in tokens.iter().enumerate() {
            let Some(&(polarity, subjectivity)) = self.lexicon.get(token.as_str()) else {
                continue;
            };

            let mut polarity = polarity;
            let mut subjectivity = subjectivity;

            if i >= 1 {
                if let Some((_, factor)) = INTENSIFIERS
                    .iter()
                    .find(|(word, _)| *word == tokens[i - 1])
                {
                    polarity *= factor;
                    subjectivity *= factor;
                }
            }

            let negated = (1..=2)
                .filter(|d| i >= *d)
                .any(|d| is_negation(&tokens[i - d]));
            if negated {
                polarity *= NEGATION_FACTOR;
            }

            polarities.push(polarity.clamp(-1.0, 1.0));
            subjectivities.push(subjectivity.clamp(0.0, 1.0));
        }

        if polarities.is_empty() {
            return (0.0, 0.0);
        }

        let count = polarities.len() as f64;
        (
            polarities.iter().sum::<f64>() / count,
            subjectivities.iter().sum::<f64>() / count,
        )
    }
}

#[async_trait]
impl ClassifierAdapter for PolarityAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn score(&self, text: &str) -> Result<NativeResult, AdapterError> {
        let (polarity, subjectivity) = self.sentiment(text);

        let label = if polarity > POLARITY_THRESHOLD {
            "positive"
        } else if polarity < -POLARITY_THRESHOLD {
            "negative"
        } else {
            "neutral"
        };

        debug!(
            adapter = %self.name,
            polarity = polarity,
            subjectivity = subjectivity,
            label = label,
            "Polarity scored"
        );

        Ok(NativeResult {
            label: label.to_string(),
            score: polarity,
            class_scores: vec![
                ("positive".to_string(), polarity.max(0.0)),
                ("negative".to_string(), (-polarity).max(0.0)),
                ("neutral".to_string(), 1.0 - polarity.abs()),
            ],
            label_space: LabelSpace::ThreeWay,
        })
    }
}
