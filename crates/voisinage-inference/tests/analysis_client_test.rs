//! Integration tests for the vision analyzer against a mock
//! OpenAI-compatible server.

use std::io::Cursor;
use std::time::Duration;

use image::{ImageFormat, RgbImage};
use serde_json::json;
use voisinage_inference::{
    cancellation_pair, AnalysisConfig, Category, Error, ItemAnalyzer, RetryPolicy, VisionAnalyzer,
};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn photo() -> Vec<u8> {
    let img = RgbImage::from_fn(64, 48, |x, y| image::Rgb([x as u8 * 4, y as u8 * 5, 90]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn config(server: &MockServer, max_retries: u32) -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.vision.base_url = server.uri();
    config.vision.api_key = Some("test-key".to_string());
    config.vision.model = "test-vision".to_string();
    config.retry = RetryPolicy {
        max_retries,
        base_delay_ms: 1,
        max_jitter_ms: 0,
    };
    config
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-123",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 900, "completion_tokens": 80, "total_tokens": 980}
    })
}

const DRILL_JSON: &str = r#"{
    "title": "Perceuse Bosch électrique 18V",
    "description": "Perceuse sans fil avec deux batteries, peu servi.",
    "category": "tools",
    "condition": "excellent",
    "brand": "Bosch",
    "model": "PSR 18",
    "estimated_value": "45 €",
    "tags": ["Perceuse", "bricolage", "perceuse"],
    "confidence": 0.92
}"#;

#[tokio::test]
async fn test_analysis_success_sends_bearer_and_image() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(header("Content-Type", "application/json"))
        .and(body_partial_json(json!({"model": "test-vision", "max_tokens": 1000})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(DRILL_JSON)))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = VisionAnalyzer::new(config(&server, 3)).unwrap();
    let result = analyzer.analyze_image(&photo()).await.unwrap();

    assert_eq!(result.title, "Perceuse Bosch électrique 18V");
    assert_eq!(result.category, Category::Tools);
    assert_eq!(result.brand.as_deref(), Some("Bosch"));
    assert_eq!(result.estimated_value, Some(45.0));
    assert_eq!(result.tags, vec!["perceuse", "bricolage"]);
    assert!(result.category_confidence.is_some());
    assert!(result
        .category_alternatives
        .as_ref()
        .unwrap()
        .iter()
        .all(|alt| alt.category != Category::Tools));
}

#[tokio::test]
async fn test_json_mode_requests_json_object() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(
            json!({"response_format": {"type": "json_object"}}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(DRILL_JSON)))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config(&server, 3);
    config.vision.json_mode = true;
    let analyzer = VisionAnalyzer::new(config).unwrap();
    assert!(analyzer.analyze_image(&photo()).await.is_ok());
}

#[tokio::test]
async fn test_rate_limit_is_retried_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "Rate limit reached", "type": "requests"}
        })))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(DRILL_JSON)))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = VisionAnalyzer::new(config(&server, 3)).unwrap();
    let result = analyzer.analyze_image(&photo()).await.unwrap();
    assert_eq!(result.category, Category::Tools);
}

#[tokio::test]
async fn test_rate_limit_exhaustion_is_rate_limited_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {"message": "Rate limit reached", "type": "requests"}
        })))
        .expect(3)
        .mount(&server)
        .await;

    let analyzer = VisionAnalyzer::new(config(&server, 2)).unwrap();
    let err = analyzer.analyze_image(&photo()).await.unwrap_err();

    match &err {
        Error::RateLimited { attempts, message } => {
            assert_eq!(*attempts, 3);
            assert_eq!(message, "Rate limit reached");
        }
        other => panic!("expected RateLimited, got {:?}", other),
    }
    assert!(err.user_message().contains("try again later"));
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = VisionAnalyzer::new(config(&server, 3)).unwrap();
    let err = analyzer.analyze_image(&photo()).await.unwrap_err();

    assert!(matches!(err, Error::Request(_)));
    assert!(err.to_string().contains("upstream exploded"));
}

#[tokio::test]
async fn test_missing_api_key_sends_nothing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(DRILL_JSON)))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = config(&server, 3);
    config.vision.api_key = None;
    let analyzer = VisionAnalyzer::new(config).unwrap();
    let err = analyzer.analyze_image(&photo()).await.unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[tokio::test]
async fn test_non_image_input_is_rejected_before_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(DRILL_JSON)))
        .expect(0)
        .mount(&server)
        .await;

    let analyzer = VisionAnalyzer::new(config(&server, 3)).unwrap();
    let err = analyzer
        .analyze_image(b"definitely not a picture")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[tokio::test]
async fn test_fenced_json_in_prose_is_extracted() {
    let server = MockServer::start().await;
    let content = format!("Voici l'analyse demandée :\n```json\n{}\n```\nBonne journée !", DRILL_JSON);

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&content)))
        .mount(&server)
        .await;

    let analyzer = VisionAnalyzer::new(config(&server, 3)).unwrap();
    let result = analyzer.analyze_image(&photo()).await.unwrap();
    assert_eq!(result.brand.as_deref(), Some("Bosch"));
}

#[tokio::test]
async fn test_unparseable_content_is_analysis_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("Sorry, I can't help with that.")),
        )
        .mount(&server)
        .await;

    let analyzer = VisionAnalyzer::new(config(&server, 3)).unwrap();
    let err = analyzer.analyze_image(&photo()).await.unwrap_err();
    assert!(matches!(err, Error::Analysis(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_low_confidence_model_is_overridden_by_keywords() {
    let server = MockServer::start().await;
    let content = json!({
        "title": "Perceuse Bosch électrique 18V",
        "description": "",
        "category": "electronics",
        "confidence": 0.55
    })
    .to_string();

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&content)))
        .mount(&server)
        .await;

    let analyzer = VisionAnalyzer::new(config(&server, 3)).unwrap();
    let result = analyzer.analyze_image(&photo()).await.unwrap();

    assert_eq!(result.category, Category::Tools);
    let alternatives = result.category_alternatives.unwrap();
    assert_eq!(alternatives[0].category, Category::Electronics);
    assert_eq!(alternatives[0].reason, "AI with medium confidence");
}

#[tokio::test]
async fn test_cancel_abandons_slow_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(DRILL_JSON))
                .set_delay(Duration::from_secs(30)),
        )
        .mount(&server)
        .await;

    let analyzer = VisionAnalyzer::new(config(&server, 3)).unwrap();
    let (handle, cancel) = cancellation_pair();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
    });

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        analyzer.analyze_image_with_cancel(&photo(), &cancel),
    )
    .await
    .expect("cancellation should end the analysis promptly");
    assert!(matches!(outcome, Err(Error::Cancelled)));
}

#[tokio::test]
async fn test_cancel_during_backoff() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = config(&server, 3);
    config.retry.base_delay_ms = 60_000;
    let analyzer = VisionAnalyzer::new(config).unwrap();
    let (handle, cancel) = cancellation_pair();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.cancel();
    });

    let outcome = tokio::time::timeout(
        Duration::from_secs(5),
        analyzer.analyze_image_with_cancel(&photo(), &cancel),
    )
    .await
    .expect("cancellation should interrupt the backoff");
    assert!(matches!(outcome, Err(Error::Cancelled)));
}

#[tokio::test]
async fn test_health_check() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = VisionAnalyzer::new(config(&server, 3)).unwrap();
    assert!(analyzer.health_check().await.unwrap());
    assert_eq!(analyzer.model_name(), "test-vision");
}

#[tokio::test]
async fn test_health_check_reports_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let analyzer = VisionAnalyzer::new(config(&server, 3)).unwrap();
    assert!(!analyzer.health_check().await.unwrap());
}
