//! Sentiment engine
//!
//! Owns the availability registry snapshot, the fusion engine and the aspect
//! catalog. Construct one per process (or per test) and pass it down; there is
//! no global instance.
//!
//! No analysis call returns an error. Empty input yields the `empty` result,
//! total adapter unavailability yields the basic fallback.

use crate::adapters::truncate_input;
use crate::aspect::{AspectCatalog, SENTENCE_JOINER};
use crate::basic::analyze_basic;
use crate::fusion::FusionEngine;
use crate::registry::AvailabilityRegistry;
use crate::types::{AnalysisMethod, AspectResult, ClassScores, SentimentLabel, SentimentResult};
use rlens_common::config::{AdapterConfig, EngineSettings, TomlConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Which scoring path a call takes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodPreference {
    /// Fuse every live adapter
    Hybrid,
    /// Basic fallback only
    Basic,
    /// One named adapter, bypassing fusion
    Adapter(String),
}

impl MethodPreference {
    pub fn parse(method: &str) -> Self {
        match method.trim().to_lowercase().as_str() {
            "hybrid" => MethodPreference::Hybrid,
            "basic" => MethodPreference::Basic,
            other => MethodPreference::Adapter(other.to_string()),
        }
    }
}

impl std::fmt::Display for MethodPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MethodPreference::Hybrid => write!(f, "hybrid"),
            MethodPreference::Basic => write!(f, "basic"),
            MethodPreference::Adapter(name) => write!(f, "{}", name),
        }
    }
}

pub struct SentimentEngine {
    registry: RwLock<Arc<AvailabilityRegistry>>,
    /// Adapter configuration the registry is rebuilt from (None when injected)
    adapter_configs: Option<Vec<AdapterConfig>>,
    fusion: FusionEngine,
    aspects: AspectCatalog,
    max_input_chars: usize,
    preferred: MethodPreference,
    strict_aspects: bool,
}

impl SentimentEngine {
    /// Build the registry from configuration and assemble the engine
    ///
    /// # Errors
    /// `Error::Config` when an aspect's keyword matcher cannot be built.
    pub async fn from_config(config: &TomlConfig) -> rlens_common::Result<Self> {
        let aspects = AspectCatalog::new(config.resolved_aspects())
            .map_err(|e| rlens_common::Error::Config(e.to_string()))?;

        let adapter_configs = config.effective_adapters();
        let call_timeout = Duration::from_millis(config.engine.call_timeout_ms);
        let registry = AvailabilityRegistry::build(&adapter_configs, call_timeout).await;

        let mut engine = Self::with_registry(registry, &config.engine, aspects);
        engine.adapter_configs = Some(adapter_configs);
        Ok(engine)
    }

    /// Assemble an engine around an already built registry
    pub fn with_registry(
        registry: AvailabilityRegistry,
        settings: &EngineSettings,
        aspects: AspectCatalog,
    ) -> Self {
        let preferred = MethodPreference::parse(&settings.preferred_method);
        info!(
            "Sentiment engine ready: {} live adapters, preferred method '{}'",
            registry.live().len(),
            preferred
        );

        Self {
            registry: RwLock::new(Arc::new(registry)),
            adapter_configs: None,
            fusion: FusionEngine::new(Duration::from_millis(settings.call_timeout_ms)),
            aspects,
            max_input_chars: settings.max_input_chars,
            preferred,
            strict_aspects: settings.strict_aspects,
        }
    }

    /// Current registry snapshot
    pub async fn registry(&self) -> Arc<AvailabilityRegistry> {
        Arc::clone(&*self.registry.read().await)
    }

    /// Rebuild the registry from configuration and swap it in
    ///
    /// Requests already running keep the snapshot they started with. An
    /// engine built around an injected registry has nothing to rebuild and
    /// keeps its current one.
    pub async fn reset(&self) -> Arc<AvailabilityRegistry> {
        let Some(configs) = &self.adapter_configs else {
            debug!("Registry was injected; reset keeps the current snapshot");
            return self.registry().await;
        };

        let fresh = Arc::new(AvailabilityRegistry::build(configs, self.fusion.call_timeout()).await);
        *self.registry.write().await = Arc::clone(&fresh);
        info!("Availability registry reset");
        fresh
    }

    /// Replace the registry with one built elsewhere
    pub async fn replace_registry(&self, registry: AvailabilityRegistry) {
        *self.registry.write().await = Arc::new(registry);
    }

    pub fn aspects(&self) -> &AspectCatalog {
        &self.aspects
    }

    pub fn call_timeout(&self) -> Duration {
        self.fusion.call_timeout()
    }

    pub fn preferred_method(&self) -> &MethodPreference {
        &self.preferred
    }

    /// Polarity verdict using the configured preferred method
    pub async fn analyze_sentiment(&self, text: &str) -> SentimentResult {
        self.score(text, &self.preferred).await
    }

    /// Polarity verdict using `method` ("hybrid", "basic" or an adapter name)
    pub async fn analyze_with_method(&self, text: &str, method: &str) -> SentimentResult {
        self.score(text, &MethodPreference::parse(method)).await
    }

    /// Verdict over the sentences of `text` that mention `aspect`
    ///
    /// # Panics
    /// On an unconfigured aspect when `strict_aspects` is enabled.
    pub async fn analyze_aspect_sentiment(&self, text: &str, aspect: &str) -> AspectResult {
        let aspect = aspect.trim().to_lowercase();

        let sentences = match self.aspects.extract(text, &aspect) {
            Ok(sentences) => sentences,
            Err(e) => {
                if self.strict_aspects {
                    panic!("{}", e);
                }
                warn!("{}; reporting it as not mentioned", e);
                Vec::new()
            }
        };

        if sentences.is_empty() {
            debug!(aspect = %aspect, "Aspect not mentioned");
            return AspectResult {
                aspect,
                aspect_mentioned: false,
                aspect_sentences: sentences,
                sentiment: SentimentResult {
                    label: SentimentLabel::Neutral,
                    confidence: 0.0,
                    scores: ClassScores::all_neutral(),
                    method: AnalysisMethod::NotMentioned,
                    original_text: text.to_string(),
                    processed_text: None,
                    sources: vec![],
                },
            };
        }

        let joined = sentences.join(SENTENCE_JOINER);
        let mut sentiment = self.score(&joined, &self.preferred).await;
        sentiment.processed_text = Some(sentiment.processed_text.take().unwrap_or(joined));
        sentiment.original_text = text.to_string();

        AspectResult {
            aspect,
            aspect_mentioned: true,
            aspect_sentences: sentences,
            sentiment,
        }
    }

    async fn score(&self, text: &str, preference: &MethodPreference) -> SentimentResult {
        if text.trim().is_empty() {
            return SentimentResult::empty(text);
        }

        let (scored, truncated) = truncate_input(text, self.max_input_chars);
        if truncated {
            debug!(
                max_chars = self.max_input_chars,
                "Input truncated before scoring"
            );
        }

        let registry = self.registry().await;
        let mut result = match preference {
            MethodPreference::Basic => analyze_basic(scored),
            MethodPreference::Adapter(name) => match registry.get(name) {
                Some(live) => self.fusion.fuse(std::slice::from_ref(live), scored).await,
                None => {
                    warn!("Preferred method '{}' is not a live adapter, using hybrid", name);
                    self.fusion.fuse(registry.live(), scored).await
                }
            },
            MethodPreference::Hybrid => self.fusion.fuse(registry.live(), scored).await,
        };

        result.original_text = text.to_string();
        result.processed_text = truncated.then(|| scored.to_string());
        result
    }
}
