// Tier 1 Classifier Adapters
//
// 3 backends: valence lexicon, polarity averaging, remote transformer model.
// Each is constructed once by the availability registry and then only read.

use crate::types::{AdapterError, ClassifierAdapter};
use rlens_common::config::{AdapterConfig, AdapterKind};
use std::sync::Arc;
use std::time::Duration;

pub mod model;
pub mod polarity;
pub mod valence;

pub use model::ModelAdapter;
pub use polarity::PolarityAdapter;
pub use valence::ValenceAdapter;

/// Truncate `text` to at most `max_chars` characters on a char boundary
///
/// Returns the (possibly shortened) text and whether anything was cut.
pub fn truncate_input(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (&text[..byte_index], true),
        None => (text, false),
    }
}

/// Lowercased word tokens with surrounding punctuation stripped
///
/// Apostrophes inside words are kept so "didn't" stays one token.
pub(crate) fn word_tokens(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|raw| {
            raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .trim_matches('\'')
                .to_lowercase()
        })
        .filter(|t| !t.is_empty())
        .collect()
}

const NEGATIONS: &[&str] = &[
    "not", "no", "never", "nothing", "none", "neither", "nor", "nowhere", "without", "cannot",
    "cant", "dont", "didnt", "doesnt", "isnt", "wasnt", "werent", "wont", "wouldnt", "hardly",
];

/// True for "not", "never", "didn't" and friends
pub(crate) fn is_negation(token: &str) -> bool {
    NEGATIONS.contains(&token) || token.ends_with("n't")
}

/// Construct the adapter an `[[adapters]]` entry describes
///
/// # Errors
/// Any error here is a construction failure: the registry records it and
/// leaves the adapter out of the live set.
pub async fn build_adapter(
    name: &str,
    config: &AdapterConfig,
    call_timeout: Duration,
) -> Result<Arc<dyn ClassifierAdapter>, AdapterError> {
    match config.kind {
        AdapterKind::Valence => {
            let adapter = match &config.lexicon_path {
                Some(path) => ValenceAdapter::with_lexicon_file(name, path)?,
                None => ValenceAdapter::new(name),
            };
            Ok(Arc::new(adapter))
        }
        AdapterKind::Polarity => Ok(Arc::new(PolarityAdapter::new(name))),
        AdapterKind::Model => {
            let adapter = ModelAdapter::connect(name, config, call_timeout).await?;
            Ok(Arc::new(adapter))
        }
    }
}
