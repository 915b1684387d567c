//! Shared test doubles for engine integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use rlens_common::config::EngineSettings;
use rlens_sentiment::aspect::AspectCatalog;
use rlens_sentiment::types::{AdapterError, ClassifierAdapter, LabelSpace, NativeResult};
use rlens_sentiment::{AvailabilityRegistry, SentimentEngine};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Adapter answering a fixed native result, optionally after a delay
pub struct StubAdapter {
    name: String,
    label: String,
    score: f64,
    delay: Option<Duration>,
    fail: bool,
    pub calls: AtomicUsize,
}

impl StubAdapter {
    pub fn new(name: &str, label: &str, score: f64) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            score,
            delay: None,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClassifierAdapter for StubAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn score(&self, _text: &str) -> Result<NativeResult, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(AdapterError::Backend("stub failure".to_string()));
        }
        Ok(NativeResult {
            label: self.label.clone(),
            score: self.score,
            class_scores: vec![],
            label_space: LabelSpace::ThreeWay,
        })
    }
}

/// Engine settings with a short call timeout
pub fn settings(call_timeout_ms: u64) -> EngineSettings {
    EngineSettings {
        call_timeout_ms,
        ..EngineSettings::default()
    }
}

/// Engine over the given adapters and weights with default aspects
pub fn engine_with(adapters: Vec<(Arc<dyn ClassifierAdapter>, f64)>) -> SentimentEngine {
    engine_with_settings(adapters, &settings(1_000))
}

pub fn engine_with_settings(
    adapters: Vec<(Arc<dyn ClassifierAdapter>, f64)>,
    settings: &EngineSettings,
) -> SentimentEngine {
    SentimentEngine::with_registry(
        AvailabilityRegistry::from_adapters(adapters),
        settings,
        AspectCatalog::default(),
    )
}

pub fn stub(name: &str, label: &str, score: f64) -> Arc<dyn ClassifierAdapter> {
    Arc::new(StubAdapter::new(name, label, score))
}

/// Bind an axum app to an ephemeral local port and return its base URL
pub async fn spawn_server(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to read local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });
    format!("http://{}", addr)
}
