// Translation Collaborator
//
// Contract: translate(text, from, to). Same-language or empty input is
// returned unchanged without touching the backend.
// Concrete backend: LibreTranslate-compatible JSON API
//   POST <endpoint>/translate {q, source, target, format, api_key?}
//   → {"translatedText": "..."}

use async_trait::async_trait;
use rlens_common::config::TranslationConfig;
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Detection or translation failure
#[derive(Debug, Error)]
pub enum TranslationError {
    /// No backend configured or backend refused service
    #[error("Translation not available: {0}")]
    Unavailable(String),

    #[error("Translation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Translation backend error: {0}")]
    Backend(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for TranslationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            TranslationError::Parse(err.to_string())
        } else {
            TranslationError::Network(err.to_string())
        }
    }
}

/// Translation collaborator
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text` from `from` into `to`
    ///
    /// Returns `text` unchanged, without a backend call, when `from == to`
    /// or `text` is blank.
    async fn translate(&self, text: &str, from: &str, to: &str) -> Result<String, TranslationError> {
        if from.eq_ignore_ascii_case(to) || text.trim().is_empty() {
            return Ok(text.to_string());
        }
        self.translate_remote(text, from, to).await
    }

    /// Backend call; `from` and `to` differ and `text` is not blank
    async fn translate_remote(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<String, TranslationError>;
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

type DirectRateLimiter = governor::RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// HTTP translator for LibreTranslate-compatible servers
pub struct HttpTranslator {
    url: reqwest::Url,
    api_key: Option<String>,
    client: reqwest::Client,
    rate_limiter: DirectRateLimiter,
}

impl HttpTranslator {
    /// Build a translator from `[translation]` settings
    ///
    /// # Errors
    /// `Unavailable` when no endpoint is configured or it is not a URL.
    pub fn new(config: &TranslationConfig, call_timeout: Duration) -> Result<Self, TranslationError> {
        let endpoint = config
            .endpoint
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| TranslationError::Unavailable("no endpoint configured".to_string()))?;

        let url = reqwest::Url::parse(&format!("{}/translate", endpoint.trim_end_matches('/')))
            .map_err(|e| {
                TranslationError::Unavailable(format!("invalid endpoint '{}': {}", endpoint, e))
            })?;

        let client = reqwest::Client::builder()
            .timeout(call_timeout)
            .build()
            .map_err(|e| TranslationError::Unavailable(format!("HTTP client: {}", e)))?;

        let per_second = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = governor::RateLimiter::direct(governor::Quota::per_second(per_second));

        info!(
            "Translator configured at {} ({} requests/s)",
            url, per_second
        );

        Ok(Self {
            url,
            api_key: config.api_key.clone(),
            client,
            rate_limiter,
        })
    }
}

#[async_trait]
impl Translator for HttpTranslator {
    async fn translate_remote(
        &self,
        text: &str,
        from: &str,
        to: &str,
    ) -> Result<String, TranslationError> {
        self.rate_limiter.until_ready().await;

        debug!(from = from, to = to, chars = text.chars().count(), "Translating");

        let response = self
            .client
            .post(self.url.clone())
            .json(&TranslateRequest {
                q: text,
                source: from,
                target: to,
                format: "text",
                api_key: self.api_key.as_deref(),
            })
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::SERVICE_UNAVAILABLE {
            return Err(TranslationError::Unavailable(format!(
                "{} returned {}",
                self.url, status
            )));
        }
        if !status.is_success() {
            return Err(TranslationError::Backend(format!(
                "{} returned {}",
                self.url, status
            )));
        }

        let body: TranslateResponse = response.json().await?;
        Ok(body.translated_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingTranslator {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Translator for CountingTranslator {
        async fn translate_remote(
            &self,
            text: &str,
            _from: &str,
            _to: &str,
        ) -> Result<String, TranslationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(text.to_uppercase())
        }
    }

    #[tokio::test]
    async fn test_same_language_skips_backend() {
        let translator = CountingTranslator {
            calls: AtomicUsize::new(0),
        };
        let out = translator.translate("hola", "en", "EN").await.unwrap();
        assert_eq!(out, "hola");
        let out = translator.translate("   ", "es", "en").await.unwrap();
        assert_eq!(out, "   ");
        assert_eq!(translator.calls.load(Ordering::SeqCst), 0);

        let out = translator.translate("hola", "es", "en").await.unwrap();
        assert_eq!(out, "HOLA");
        assert_eq!(translator.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_missing_endpoint_is_unavailable() {
        let result = HttpTranslator::new(&TranslationConfig::default(), Duration::from_secs(1));
        assert!(matches!(result, Err(TranslationError::Unavailable(_))));
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(TranslateRequest {
            q: "hola",
            source: "es",
            target: "en",
            format: "text",
            api_key: None,
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"q": "hola", "source": "es", "target": "en", "format": "text"})
        );
    }
}
