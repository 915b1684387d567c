//! Fusion Engine - confidence-weighted voting over live adapters
//!
//! `Start → CollectPerMethod → Combine → Return`
//!
//! Every live adapter is called concurrently under the per-call timeout.
//! Errors, timeouts and unrecognized labels are abstentions. Each surviving
//! vote adds `weight × confidence` to its label; the highest total wins, ties
//! go Positive > Negative > Neutral, and all-zero support is Neutral.

use crate::basic::analyze_basic;
use crate::normalizer::{normalize, NormalizedVote};
use crate::registry::LiveAdapter;
use crate::types::{
    AdapterError, AnalysisMethod, ClassScores, SentimentLabel, SentimentResult, SourceVote,
};
use futures::future::join_all;
use std::time::Duration;
use tracing::{debug, info, warn};

/// One adapter's normalized vote with its fusion weight
#[derive(Debug, Clone, PartialEq)]
pub struct Ballot {
    /// Adapter name
    pub method: String,
    pub weight: f64,
    pub vote: NormalizedVote,
}

impl Ballot {
    fn source(&self) -> SourceVote {
        SourceVote {
            method: self.method.clone(),
            label: self.vote.label,
            confidence: self.vote.confidence,
            weight: self.weight,
        }
    }
}

/// Concurrent adapter invocation and vote combination
#[derive(Debug, Clone)]
pub struct FusionEngine {
    call_timeout: Duration,
}

impl FusionEngine {
    pub fn new(call_timeout: Duration) -> Self {
        Self { call_timeout }
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Call every adapter concurrently and keep the votes that came back
    ///
    /// Ballots come back in adapter order; combination does not rely on it.
    pub async fn collect(&self, adapters: &[LiveAdapter], text: &str) -> Vec<Ballot> {
        let calls = adapters.iter().map(|live| async move {
            let name = live.name();
            let outcome = match tokio::time::timeout(self.call_timeout, live.adapter.score(text)).await
            {
                Ok(result) => result,
                Err(_) => Err(AdapterError::Timeout(self.call_timeout)),
            };

            let native = match outcome {
                Ok(native) => native,
                Err(e) => {
                    warn!(adapter = name, error = %e, "Adapter abstained");
                    return None;
                }
            };

            match normalize(&native) {
                Ok(vote) => {
                    debug!(
                        adapter = name,
                        label = %vote.label,
                        confidence = vote.confidence,
                        "Adapter voted"
                    );
                    Some(Ballot {
                        method: name.to_string(),
                        weight: live.weight,
                        vote,
                    })
                }
                Err(e) => {
                    warn!(adapter = name, error = %e, "Adapter abstained");
                    None
                }
            }
        });

        join_all(calls).await.into_iter().flatten().collect()
    }

    /// Score `text` with `adapters`, falling back to basic when none vote
    ///
    /// Passing a single adapter bypasses fusion (`single:<name>`).
    pub async fn fuse(&self, adapters: &[LiveAdapter], text: &str) -> SentimentResult {
        let ballots = self.collect(adapters, text).await;
        match combine(text, ballots) {
            Some(result) => {
                info!(
                    method = %result.method,
                    label = %result.label,
                    confidence = result.confidence,
                    "Sentiment fused"
                );
                result
            }
            None => {
                debug!(
                    live = adapters.len(),
                    "No adapter voted, using basic fallback"
                );
                analyze_basic(text)
            }
        }
    }
}

/// Combine ballots into one verdict
///
/// Returns `None` for an empty ballot set. A single ballot is returned as
/// that adapter's own normalized result.
pub fn combine(text: &str, mut ballots: Vec<Ballot>) -> Option<SentimentResult> {
    ballots.sort_by(|a, b| a.method.cmp(&b.method));

    if ballots.len() == 1 {
        let ballot = &ballots[0];
        return Some(SentimentResult {
            label: ballot.vote.label,
            confidence: ballot.vote.confidence.clamp(0.0, 1.0),
            scores: ballot.vote.scores,
            method: AnalysisMethod::Single(ballot.method.clone()),
            original_text: text.to_string(),
            processed_text: None,
            sources: vec![ballot.source()],
        });
    }

    if ballots.is_empty() {
        return None;
    }

    let mut support = ClassScores::default();
    let mut total_weight = 0.0;
    let mut weighted_scores = ClassScores::default();

    for ballot in &ballots {
        *support.get_mut(ballot.vote.label) += ballot.weight * ballot.vote.confidence;
        total_weight += ballot.weight;
        for label in SentimentLabel::PRIORITY {
            *weighted_scores.get_mut(label) += ballot.weight * ballot.vote.scores.get(label);
        }
    }

    let mut label = SentimentLabel::Neutral;
    let mut best = 0.0;
    for candidate in SentimentLabel::PRIORITY {
        if support.get(candidate) > best {
            best = support.get(candidate);
            label = candidate;
        }
    }

    let (confidence, scores) = if total_weight > 0.0 {
        let mut scores = ClassScores::default();
        for class in SentimentLabel::PRIORITY {
            *scores.get_mut(class) = weighted_scores.get(class) / total_weight;
        }
        (best / total_weight, scores)
    } else {
        // Every voter has weight 0: no evidence, plain average of the scores
        let count = ballots.len() as f64;
        let mut scores = ClassScores::default();
        for class in SentimentLabel::PRIORITY {
            *scores.get_mut(class) =
                ballots.iter().map(|b| b.vote.scores.get(class)).sum::<f64>() / count;
        }
        (0.0, scores)
    };

    Some(SentimentResult {
        label,
        confidence: confidence.clamp(0.0, 1.0),
        scores,
        method: AnalysisMethod::Hybrid,
        original_text: text.to_string(),
        processed_text: None,
        sources: ballots.iter().map(Ballot::source).collect(),
    })
}
