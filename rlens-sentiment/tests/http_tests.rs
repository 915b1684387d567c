//! Model adapter and translator against in-process HTTP servers

mod helpers;

use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use helpers::spawn_server;
use rlens_common::config::{AdapterConfig, AdapterKind, LabelSpaceSetting, TranslationConfig};
use rlens_sentiment::adapters::ModelAdapter;
use rlens_sentiment::language::HeuristicDetector;
use rlens_sentiment::normalizer::normalize;
use rlens_sentiment::registry::{AdapterState, AvailabilityRegistry};
use rlens_sentiment::translation::{HttpTranslator, TranslationError, Translator};
use rlens_sentiment::types::{AdapterError, ClassifierAdapter};
use rlens_sentiment::{MultilingualAnalyzer, SentimentEngine, SentimentLabel};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

fn model_config(endpoint: &str) -> AdapterConfig {
    let mut config = AdapterConfig::new(AdapterKind::Model);
    config.endpoint = Some(endpoint.to_string());
    config
}

async fn three_way_model(Json(body): Json<Value>) -> Json<Value> {
    let text = body["inputs"].as_str().unwrap_or_default().to_lowercase();
    let scores = if text.contains("awful") {
        json!([[
            {"label": "LABEL_0", "score": 0.88},
            {"label": "LABEL_1", "score": 0.08},
            {"label": "LABEL_2", "score": 0.04}
        ]])
    } else {
        json!([[
            {"label": "LABEL_0", "score": 0.03},
            {"label": "LABEL_1", "score": 0.06},
            {"label": "LABEL_2", "score": 0.91}
        ]])
    };
    Json(scores)
}

#[tokio::test]
async fn test_model_adapter_three_way() {
    let base = spawn_server(Router::new().route("/classify", post(three_way_model))).await;
    let config = model_config(&format!("{}/classify", base));

    let adapter = ModelAdapter::connect("model", &config, Duration::from_secs(5))
        .await
        .unwrap();

    let native = adapter.score("Awful, never again").await.unwrap();
    assert_eq!(native.label, "LABEL_0");
    let vote = normalize(&native).unwrap();
    assert_eq!(vote.label, SentimentLabel::Negative);
    assert!((vote.confidence - 0.88).abs() < 1e-9);
    assert!((vote.scores.neutral - 0.08).abs() < 1e-9);
}

#[tokio::test]
async fn test_model_adapter_binary_band() {
    let app = Router::new().route(
        "/classify",
        post(|| async { Json(json!([{"label": "POSITIVE", "score": 0.55}])) }),
    );
    let base = spawn_server(app).await;
    let mut config = model_config(&format!("{}/classify", base));
    config.label_space = LabelSpaceSetting::Binary;

    let adapter = ModelAdapter::connect("model", &config, Duration::from_secs(5))
        .await
        .unwrap();
    let vote = normalize(&adapter.score("It was a meal").await.unwrap()).unwrap();

    assert_eq!(vote.label, SentimentLabel::Neutral);
}

#[tokio::test]
async fn test_model_probe_failure_fails_construction() {
    let app = Router::new().route(
        "/classify",
        post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "loading") }),
    );
    let base = spawn_server(app).await;
    let config = model_config(&format!("{}/classify", base));

    let result = ModelAdapter::connect("model", &config, Duration::from_secs(5)).await;
    assert!(matches!(result, Err(AdapterError::Unavailable(_))));

    let registry = AvailabilityRegistry::build(&[config], Duration::from_secs(5)).await;
    assert!(registry.is_empty());
    assert!(matches!(registry.statuses()[0].state, AdapterState::Failed(_)));
}

#[tokio::test]
async fn test_model_call_errors_map_to_adapter_errors() {
    let app = Router::new()
        .route(
            "/busy",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, "loading") }),
        )
        .route(
            "/broken",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route("/garbage", post(|| async { "not json" }));
    let base = spawn_server(app).await;

    for (path, expect_unavailable, expect_backend) in [
        ("busy", true, false),
        ("broken", false, true),
        ("garbage", false, false),
    ] {
        let mut config = model_config(&format!("{}/{}", base, path));
        config.probe = false;
        let adapter = ModelAdapter::connect("model", &config, Duration::from_secs(5))
            .await
            .unwrap();

        let err = adapter.score("Nice").await.unwrap_err();
        assert_eq!(matches!(err, AdapterError::Unavailable(_)), expect_unavailable, "{}", path);
        assert_eq!(matches!(err, AdapterError::Backend(_)), expect_backend, "{}", path);
        if path == "garbage" {
            assert!(matches!(err, AdapterError::Parse(_)), "{:?}", err);
        }
    }
}

#[tokio::test]
async fn test_engine_fuses_local_and_remote_adapters() {
    let base = spawn_server(Router::new().route("/classify", post(three_way_model))).await;
    let toml = format!(
        r#"
        [[adapters]]
        kind = "valence"

        [[adapters]]
        kind = "polarity"

        [[adapters]]
        kind = "model"
        endpoint = "{}/classify"
        "#,
        base
    );
    let config = rlens_common::config::TomlConfig::from_toml_str(&toml).unwrap();

    let engine = SentimentEngine::from_config(&config).await.unwrap();
    assert_eq!(engine.registry().await.live().len(), 3);

    let result = engine
        .analyze_sentiment("Excellent pasta and wonderful staff")
        .await;
    assert_eq!(result.label, SentimentLabel::Positive);
    assert_eq!(result.sources.len(), 3);
}

async fn libre_translate(Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
    if body["format"] != "text" || body["target"] != "en" {
        return Err(StatusCode::BAD_REQUEST);
    }
    let translated = match body["q"].as_str() {
        Some("El servicio fue terrible y la comida estaba fría") => {
            "The service was terrible and the food was cold"
        }
        _ => return Err(StatusCode::UNPROCESSABLE_ENTITY),
    };
    Ok(Json(json!({ "translatedText": translated })))
}

fn translation_config(base: &str) -> TranslationConfig {
    TranslationConfig {
        endpoint: Some(base.to_string()),
        api_key: None,
        requests_per_second: 50,
    }
}

#[tokio::test]
async fn test_http_translator() {
    let base = spawn_server(Router::new().route("/translate", post(libre_translate))).await;
    let translator =
        HttpTranslator::new(&translation_config(&format!("{}/", base)), Duration::from_secs(5))
            .unwrap();

    let out = translator
        .translate("El servicio fue terrible y la comida estaba fría", "es", "en")
        .await
        .unwrap();
    assert_eq!(out, "The service was terrible and the food was cold");

    let err = translator.translate("¿Qué?", "es", "en").await.unwrap_err();
    assert!(matches!(err, TranslationError::Backend(_)));
}

#[tokio::test]
async fn test_multilingual_over_http_translator() {
    let base = spawn_server(Router::new().route("/translate", post(libre_translate))).await;
    let engine = Arc::new(
        SentimentEngine::from_config(&rlens_common::config::TomlConfig::default())
            .await
            .unwrap(),
    );
    let analyzer = MultilingualAnalyzer::new(
        engine,
        Arc::new(HeuristicDetector::new()),
        Some(Arc::new(
            HttpTranslator::new(&translation_config(&base), Duration::from_secs(5)).unwrap(),
        ) as Arc<dyn Translator>),
    );

    let result = analyzer
        .analyze_sentiment("El servicio fue terrible y la comida estaba fría")
        .await;

    assert_eq!(result.original_language, "es");
    assert_eq!(
        result.translated_text.as_deref(),
        Some("The service was terrible and the food was cold")
    );
    assert_eq!(result.label(), SentimentLabel::Negative);
}
