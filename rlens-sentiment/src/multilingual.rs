//! Multilingual wrapper
//!
//! detect → translate to the pivot language → analyze → reattach language
//! metadata. Detection or translation failure never fails the call: the
//! original text is analyzed and the result is marked degraded.

use crate::engine::SentimentEngine;
use crate::language::{is_supported, primary_subtag, HeuristicDetector, LanguageDetector, PIVOT_LANGUAGE};
use crate::translation::{HttpTranslator, TranslationError, Translator};
use crate::types::{AspectResult, MultilingualResult, SentimentOutcome, SentimentResult};
use rlens_common::config::TranslationConfig;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Text to analyze plus the language metadata gathered on the way
#[derive(Debug, Clone, PartialEq)]
struct PreparedText {
    language: String,
    translated: Option<String>,
    degraded: bool,
}

pub struct MultilingualAnalyzer {
    engine: Arc<SentimentEngine>,
    detector: Arc<dyn LanguageDetector>,
    translator: Option<Arc<dyn Translator>>,
}

impl MultilingualAnalyzer {
    pub fn new(
        engine: Arc<SentimentEngine>,
        detector: Arc<dyn LanguageDetector>,
        translator: Option<Arc<dyn Translator>>,
    ) -> Self {
        Self {
            engine,
            detector,
            translator,
        }
    }

    /// Heuristic detector plus the HTTP translator when one is configured
    pub fn from_config(engine: Arc<SentimentEngine>, config: &TranslationConfig) -> Self {
        let translator: Option<Arc<dyn Translator>> = if config.endpoint.is_some() {
            match HttpTranslator::new(config, engine.call_timeout()) {
                Ok(translator) => Some(Arc::new(translator)),
                Err(e) => {
                    warn!("Translator disabled: {}", e);
                    None
                }
            }
        } else {
            debug!("No translation endpoint configured");
            None
        };

        Self::new(engine, Arc::new(HeuristicDetector::new()), translator)
    }

    pub fn engine(&self) -> &Arc<SentimentEngine> {
        &self.engine
    }

    pub async fn analyze_sentiment(&self, text: &str) -> MultilingualResult<SentimentResult> {
        let prepared = self.prepare(text).await;
        let scored_text = prepared.translated.as_deref().unwrap_or(text);
        let result = self.engine.analyze_sentiment(scored_text).await;
        Self::attach(text, result, prepared)
    }

    pub async fn analyze_aspect_sentiment(
        &self,
        text: &str,
        aspect: &str,
    ) -> MultilingualResult<AspectResult> {
        let prepared = self.prepare(text).await;
        let scored_text = prepared.translated.as_deref().unwrap_or(text);
        let result = self.engine.analyze_aspect_sentiment(scored_text, aspect).await;
        Self::attach(text, result, prepared)
    }

    /// Overall and aspect verdicts from one detection and translation pass
    pub async fn analyze_overall_and_aspect(
        &self,
        text: &str,
        aspect: &str,
    ) -> (
        MultilingualResult<SentimentResult>,
        MultilingualResult<AspectResult>,
    ) {
        let prepared = self.prepare(text).await;
        let scored_text = prepared.translated.as_deref().unwrap_or(text);
        let overall = self.engine.analyze_sentiment(scored_text).await;
        let aspect = self.engine.analyze_aspect_sentiment(scored_text, aspect).await;
        (
            Self::attach(text, overall, prepared.clone()),
            Self::attach(text, aspect, prepared),
        )
    }

    fn attach<T: SentimentOutcome>(
        original: &str,
        mut result: T,
        prepared: PreparedText,
    ) -> MultilingualResult<T> {
        result.sentiment_mut().original_text = original.to_string();
        MultilingualResult {
            result,
            original_language: prepared.language,
            translated_text: prepared.translated,
            translation_degraded: prepared.degraded,
        }
    }

    async fn prepare(&self, text: &str) -> PreparedText {
        if text.trim().is_empty() {
            return PreparedText {
                language: PIVOT_LANGUAGE.to_string(),
                translated: None,
                degraded: false,
            };
        }

        let timeout = self.engine.call_timeout();
        let mut degraded = false;

        let language = match with_timeout(timeout, self.detector.detect_language(text)).await {
            Ok(code) => {
                let code = primary_subtag(&code);
                if is_supported(&code) {
                    code
                } else {
                    debug!(detected = %code, "Unsupported language, assuming pivot");
                    PIVOT_LANGUAGE.to_string()
                }
            }
            Err(e) => {
                warn!("Language detection failed, assuming pivot: {}", e);
                degraded = true;
                PIVOT_LANGUAGE.to_string()
            }
        };

        if language == PIVOT_LANGUAGE {
            return PreparedText {
                language,
                translated: None,
                degraded,
            };
        }

        let Some(translator) = &self.translator else {
            warn!(language = %language, "No translator configured, analyzing original text");
            return PreparedText {
                language,
                translated: None,
                degraded: true,
            };
        };

        match with_timeout(timeout, translator.translate(text, &language, PIVOT_LANGUAGE)).await {
            Ok(translated) if !translated.trim().is_empty() => PreparedText {
                language,
                translated: Some(translated),
                degraded,
            },
            Ok(_) => {
                warn!(language = %language, "Translation came back empty, analyzing original text");
                PreparedText {
                    language,
                    translated: None,
                    degraded: true,
                }
            }
            Err(e) => {
                warn!(language = %language, "Translation failed, analyzing original text: {}", e);
                PreparedText {
                    language,
                    translated: None,
                    degraded: true,
                }
            }
        }
    }
}

async fn with_timeout<T>(
    timeout: Duration,
    call: impl std::future::Future<Output = Result<T, TranslationError>>,
) -> Result<T, TranslationError> {
    match tokio::time::timeout(timeout, call).await {
        Ok(result) => result,
        Err(_) => Err(TranslationError::Timeout(timeout)),
    }
}
