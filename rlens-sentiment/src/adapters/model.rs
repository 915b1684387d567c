// Remote Transformer Model Adapter
//
// POSTs `{"inputs": text}` to a text-classification inference endpoint.
// Accepts both response shapes in use: `[[{label, score}, ...]]` and
// `[{label, score}, ...]`. Labels are native ("LABEL_2", "POSITIVE", ...).

use crate::types::{AdapterError, ClassifierAdapter, LabelSpace, NativeResult};
use async_trait::async_trait;
use rlens_common::config::AdapterConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

/// Probe text sent at construction when probing is enabled
const PROBE_TEXT: &str = "ok";

#[derive(Debug, Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Nested(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl InferenceResponse {
    fn into_scores(self) -> Vec<LabelScore> {
        match self {
            InferenceResponse::Nested(mut batches) => {
                if batches.is_empty() {
                    Vec::new()
                } else {
                    batches.swap_remove(0)
                }
            }
            InferenceResponse::Flat(scores) => scores,
        }
    }
}

/// Remote transformer adapter (model-based family)
pub struct ModelAdapter {
    name: String,
    endpoint: reqwest::Url,
    label_space: LabelSpace,
    client: reqwest::Client,
}

impl ModelAdapter {
    /// Build the adapter and, unless disabled, probe the endpoint once
    ///
    /// # Errors
    /// `Unavailable` when no endpoint is configured, the URL is invalid, or
    /// the probe fails.
    pub async fn connect(
        name: &str,
        config: &AdapterConfig,
        call_timeout: Duration,
    ) -> Result<Self, AdapterError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| AdapterError::Unavailable(format!("{}: no endpoint configured", name)))?;

        let endpoint = reqwest::Url::parse(endpoint).map_err(|e| {
            AdapterError::Unavailable(format!("{}: invalid endpoint '{}': {}", name, endpoint, e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(call_timeout)
            .build()
            .map_err(|e| AdapterError::Unavailable(format!("{}: HTTP client: {}", name, e)))?;

        let adapter = Self {
            name: name.to_string(),
            endpoint,
            label_space: config.label_space.into(),
            client,
        };

        if config.probe {
            adapter.score(PROBE_TEXT).await.map_err(|e| {
                AdapterError::Unavailable(format!("{}: probe failed: {}", name, e))
            })?;
        }

        info!("Model adapter '{}' ready at {}", adapter.name, adapter.endpoint);
        Ok(adapter)
    }
}

#[async_trait]
impl ClassifierAdapter for ModelAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn score(&self, text: &str) -> Result<NativeResult, AdapterError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&InferenceRequest { inputs: text })
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            return Err(AdapterError::Unavailable(format!(
                "{} returned {}",
                self.endpoint, status
            )));
        }
        if !status.is_success() {
            return Err(AdapterError::Backend(format!(
                "{} returned {}",
                self.endpoint, status
            )));
        }

        let body: InferenceResponse = response.json().await?;
        let scores = body.into_scores();

        let best = scores
            .iter()
            .filter(|s| s.score.is_finite())
            .max_by(|a, b| a.score.total_cmp(&b.score))
            .cloned()
            .ok_or_else(|| AdapterError::Parse("inference response has no labels".to_string()))?;

        debug!(
            adapter = %self.name,
            label = %best.label,
            score = best.score,
            "Model scored"
        );

        Ok(NativeResult {
            label: best.label,
            score: best.score,
            class_scores: scores.into_iter().map(|s| (s.label, s.score)).collect(),
            label_space: self.label_space,
        })
    }
}
