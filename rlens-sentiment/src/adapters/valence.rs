// Valence Lexicon Adapter
//
// Rule-based valence scoring over a word lexicon (-4.0 .. +4.0 per word).
// Native output: compound score in [-1, 1] plus pos/neg/neu proportions.
// Native labels: "pos" (compound >= 0.05), "neg" (<= -0.05), "neu" otherwise.

use super::is_negation;
use crate::types::{AdapterError, ClassifierAdapter, LabelSpace, NativeResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

/// Compound score threshold for a polar native label
const COMPOUND_THRESHOLD: f64 = 0.05;

/// Normalization constant for the compound score
const ALPHA: f64 = 15.0;

/// Booster/dampener step
const BOOST: f64 = 0.293;

/// ALL-CAPS emphasis step
const CAPS_BOOST: f64 = 0.733;

/// Multiplier for a negated word
const NEGATION_SCALAR: f64 = -0.74;

/// Per-"!" emphasis, at most 4 counted
const EXCLAMATION_BOOST: f64 = 0.292;

const BOOSTERS: &[&str] = &[
    "absolutely", "amazingly", "completely", "deeply", "especially", "exceptionally",
    "extremely", "highly", "incredibly", "really", "so", "super", "thoroughly", "totally",
    "truly", "very", "most", "too",
];

const DAMPENERS: &[&str] = &[
    "barely", "hardly", "kinda", "marginally", "partly", "slightly", "somewhat", "sort",
];

/// Built-in lexicon tuned for restaurant reviews
const BUILTIN_LEXICON: &[(&str, f64)] = &[
    // positive
    ("good", 1.9), ("great", 3.1), ("excellent", 2.7), ("amazing", 2.8),
    ("wonderful", 2.7), ("fantastic", 2.6), ("delicious", 2.7), ("tasty", 2.0),
    ("fresh", 1.3), ("perfect", 2.7), ("perfectly", 2.5), ("love", 3.2), ("loved", 2.9),
    ("best", 3.2), ("outstanding", 3.0), ("superb", 3.1), ("brilliant", 2.8),
    ("awesome", 3.1), ("incredible", 2.2), ("nice", 1.8), ("friendly", 2.2),
    ("helpful", 1.8), ("attentive", 1.6), ("cozy", 1.6), ("clean", 1.7),
    ("pleasant", 2.3), ("enjoy", 2.2), ("enjoyed", 2.3), ("happy", 2.7),
    ("recommend", 1.5), ("recommended", 1.5), ("lovely", 2.8), ("okay", 0.9), ("ok", 0.9),
    ("fine", 0.8), ("decent", 1.1), ("reasonable", 1.0), ("affordable", 1.3),
    ("worth", 0.9), ("generous", 2.3), ("polite", 1.5), ("welcoming", 1.9),
    ("beautiful", 2.9), ("charming", 2.1), ("impressive", 2.3), ("impressed", 2.1),
    ("satisfied", 1.8), ("special", 1.7), ("yummy", 2.4), ("flavorful", 2.0),
    ("romantic", 1.9), ("favorite", 2.0), ("glad", 2.0), ("quick", 0.8), ("fast", 0.6),
    ("professional", 1.4), ("gem", 2.2), ("heavenly", 2.6), ("exquisite", 2.9),
    // negative
    ("bad", -2.5), ("terrible", -2.1), ("awful", -2.0), ("horrible", -2.5),
    ("disgusting", -2.4), ("worst", -3.1), ("hate", -2.7), ("hated", -2.5),
    ("disappointing", -2.2), ("disappointed", -1.9), ("disappointment", -2.3),
    ("poor", -2.1), ("bland", -1.5), ("cold", -0.6), ("stale", -1.6),
    ("overpriced", -1.8), ("slow", -1.0), ("rude", -2.0), ("dirty", -1.9),
    ("unacceptable", -2.0), ("mediocre", -1.5), ("greasy", -1.2), ("soggy", -1.3),
    ("burnt", -1.4), ("noisy", -1.0), ("loud", -0.6), ("expensive", -0.8),
    ("sick", -2.1), ("gross", -2.1), ("unfriendly", -2.0), ("ignored", -1.5),
    ("waste", -1.8), ("wasted", -1.7), ("meh", -0.8), ("boring", -1.3),
    ("annoying", -1.8), ("angry", -2.3), ("sad", -2.1), ("problem", -1.7),
    ("dull", -1.7), ("undercooked", -1.5), ("overcooked", -1.3), ("inedible", -2.3),
    ("nasty", -2.6), ("lukewarm", -0.8), ("never", -0.5), ("avoid", -1.6),
    ("cramped", -1.2), ("filthy", -2.6), ("tasteless", -1.9), ("unprofessional", -1.9),
];

/// Valence lexicon adapter (lexicon-based family)
pub struct ValenceAdapter {
    name: String,
    lexicon: HashMap<String, f64>,
}

impl ValenceAdapter {
    /// Adapter over the built-in lexicon
    pub fn new(name: impl Into<String>) -> Self {
        let lexicon = BUILTIN_LEXICON
            .iter()
            .map(|(word, valence)| (word.to_string(), *valence))
            .collect();
        Self {
            name: name.into(),
            lexicon,
        }
    }

    /// Built-in lexicon extended (and overridden) by a `word<TAB>valence` file
    ///
    /// Blank lines and lines starting with `#` are skipped. Extra columns
    /// after the valence are ignored.
    ///
    /// # Errors
    /// Unreadable file or a line whose valence is not a number.
    pub fn with_lexicon_file(name: impl Into<String>, path: &Path) -> Result<Self, AdapterError> {
        let content = std::fs::read_to_string(path)?;
        let mut adapter = Self::new(name);
        let mut loaded = 0usize;

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut columns = line.split('\t');
            let word = columns.next().unwrap_or_default().trim().to_lowercase();
            let valence = columns
                .next()
                .and_then(|v| v.trim().parse::<f64>().ok())
                .filter(|v| v.is_finite())
                .ok_or_else(|| {
                    AdapterError::Parse(format!(
                        "{}:{}: expected 'word<TAB>valence'",
                        path.display(),
                        line_no + 1
                    ))
                })?;
            adapter.lexicon.insert(word, valence);
            loaded += 1;
        }

        info!(
            "Valence lexicon extended with {} entries from {}",
            loaded,
            path.display()
        );
        Ok(adapter)
    }

    /// Score text into (compound, pos, neg, neu)
    pub fn polarity_scores(&self, text: &str) -> (f64, f64, f64, f64) {
        let raw_tokens: Vec<&str> = text
            .split_whitespace()
            .map(|t| t.trim_matches(|c: char| !c.is_alphanumeric() && c != '\''))
            .filter(|t| !t.is_empty())
            .collect();
        let tokens: Vec<String> = raw_tokens.iter().map(|t| t.to_lowercase()).collect();

        // Caps emphasis only counts when the text is not shouted throughout
        let has_lowercase = raw_tokens
            .iter()
            .any(|t| t.chars().any(|c| c.is_lowercase()));

        let but_index = tokens.iter().position(|t| t == "but");

        let mut valences = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            let Some(&base) = self.lexicon.get(token.as_str()) else {
                valences.push(0.0);
                continue;
            };
            let mut valence = base;

            if has_lowercase && is_shouted(raw_tokens[i]) {
                valence += CAPS_BOOST * valence.signum();
            }

            // Boosters and dampeners within three words, decaying with distance
            for (distance, decay) in [(1usize, 1.0), (2, 0.95), (3, 0.9)] {
                if i < distance {
                    break;
                }
                let previous = tokens[i - distance].as_str();
                let step = if BOOSTERS.contains(&previous) {
                    BOOST
                } else if DAMPENERS.contains(&previous) {
                    -BOOST
                } else {
                    0.0
                };
                valence += step * decay * valence.signum();
            }

            let negated = (1..=3)
                .filter(|d| i >= *d)
                .any(|d| is_negation(&tokens[i - d]));
            if negated {
                valence *= NEGATION_SCALAR;
            }

            if let Some(b) = but_index {
                if i < b {
                    valence *= 0.5;
                } else if i > b {
                    valence *= 1.5;
                }
            }

            valences.push(valence);
        }

        let mut sum: f64 = valences.iter().sum();
        let exclamations = text.matches('!').count().min(4) as f64;
        if sum != 0.0 {
            sum += exclamations * EXCLAMATION_BOOST * sum.signum();
        }
        let compound = if sum == 0.0 {
            0.0
        } else {
            (sum / (sum * sum + ALPHA).sqrt()).clamp(-1.0, 1.0)
        };

        let mut pos_sum = 0.0;
        let mut neg_sum = 0.0;
        let mut neu_count = 0.0;
        for v in &valences {
            if *v > 0.0 {
                pos_sum += v + 1.0;
            } else if *v < 0.0 {
                neg_sum += v - 1.0;
            } else {
                neu_count += 1.0;
            }
        }
        let total = pos_sum + neg_sum.abs() + neu_count;
        let (pos, neg, neu) = if total > 0.0 {
            (pos_sum / total, neg_sum.abs() / total, neu_count / total)
        } else {
            (0.0, 0.0, 1.0)
        };

        (compound, pos, neg, neu)
    }
}

fn is_shouted(raw: &str) -> bool {
    raw.chars().filter(|c| c.is_alphabetic()).count() > 1
        && raw.chars().all(|c| !c.is_alphabetic() || c.is_uppercase())
}

#[async_trait]
impl ClassifierAdapter for ValenceAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn score(&self, text: &str) -> Result<NativeResult, AdapterError> {
        let (compound, pos, neg, neu) = self.polarity_scores(text);

        let label = if compound >= COMPOUND_THRESHOLD {
            "pos"
        } else if compound <= -COMPOUND_THRESHOLD {
            "neg"
        } else {
            "neu"
        };

        debug!(
            adapter = %self.name,
            compound = compound,
            label = label,
            "Valence scored"
        );

        Ok(NativeResult {
            label: label.to_string(),
            score: compound,
            class_scores: vec![
                ("pos".to_string(), pos),
                ("neg".to_string(), neg),
                ("neu".to_string(), neu),
            ],
            label_space: LabelSpace::ThreeWay,
        })
    }
}
