//! Mock API tests for the Google AI adapter over real HTTP.
//!
//! These tests use wiremock to stand in for the Vertex AI prediction
//! endpoint, so the reqwest transport, headers, and status mapping are
//! exercised end to end.

use promptwire_core::{Error, PromptConfig, ProviderError};
use promptwire_providers::{GenerateModel, GoogleAi, GoogleAiOptions};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHAT_PATH: &str = "/test-project/locations/us-central1/publishers/google/models/chat-bison:predict";
const TEXT_PATH: &str = "/test-project/locations/us-central1/publishers/google/models/text-bison:predict";
const EMBED_PATH: &str =
    "/test-project/locations/us-central1/publishers/google/models/textembedding-gecko:predict";

fn client(server: &MockServer, model: GenerateModel) -> GoogleAi {
    let options = GoogleAiOptions {
        model,
        ..GoogleAiOptions::default()
    };
    GoogleAi::new("test-api-key", "test-project", options)
        .unwrap()
        .with_base_url(server.uri())
}

#[tokio::test]
async fn chat_request_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(header("Authorization", "Bearer test-api-key"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(json!({
            "instances": [{"context": "hello", "examples": [], "messages": []}],
            "parameters": {"maxOutputTokens": 300, "temperature": 0.45, "topP": 1.0, "topK": 40}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predictions": [{
                "candidates": [{"author": "1", "content": "hi there"}],
                "citationMetadata": [{"citations": []}],
                "safetyAttributes": {"blocked": false, "categories": [], "scores": []}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, GenerateModel::ChatBison)
        .generate("hello", &PromptConfig::default(), Some("session-1"))
        .await
        .unwrap();

    assert_eq!(result.results.len(), 1);
    assert_eq!(result.results[0].text, "hi there");
    assert_eq!(result.usage.prompt_tokens(), 5);
    assert_eq!(result.usage.completion_tokens(), 8);
    assert_eq!(result.usage.total_tokens(), 13);
    assert_eq!(result.session_id.as_deref(), Some("session-1"));
}

#[tokio::test]
async fn completion_request_uses_text_model_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TEXT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predictions": [{"content": "Paris", "safetyAttributes": {"blocked": false}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, GenerateModel::TextBison)
        .generate("Capital of France?", &PromptConfig::with_stop_sequences(["\n"]), None)
        .await
        .unwrap();

    assert_eq!(result.results[0].text, "Paris");
    assert_eq!(result.usage.total_tokens(), 18 + 5);
}

#[tokio::test]
async fn embedding_request_uses_embedding_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(EMBED_PATH))
        .and(body_json(json!({"instances": [{"content": "embed me"}]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "predictions": [{"embeddings": {"values": [0.25, 0.75]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = client(&server, GenerateModel::TextBison)
        .embed("embed me", None)
        .await
        .unwrap();

    assert_eq!(result.embedding, vec![0.25, 0.75]);
    assert_eq!(result.usage.completion_tokens(), 0);
}

#[tokio::test]
async fn unauthorized_maps_to_authentication_failed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": {"code": 401, "message": "Request had invalid authentication credentials.", "status": "UNAUTHENTICATED"}
        })))
        .mount(&server)
        .await;

    let err = client(&server, GenerateModel::TextBison)
        .generate("hello", &PromptConfig::default(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Provider(ProviderError::AuthenticationFailed(_))));
}

#[tokio::test]
async fn rate_limit_reads_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let err = client(&server, GenerateModel::TextBison)
        .generate("hello", &PromptConfig::default(), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Provider(ProviderError::RateLimited { retry_after_secs: 30 })
    ));
}

#[tokio::test]
async fn server_error_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backend unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    let err = client(&server, GenerateModel::ChatBison)
        .generate("hello", &PromptConfig::default(), None)
        .await
        .unwrap_err();

    match err {
        Error::Provider(ProviderError::ApiError { status_code, message }) => {
            assert_eq!(status_code, 500);
            assert_eq!(message, "backend unavailable");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn validation_failure_never_reaches_the_server() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"predictions": []})))
        .expect(0)
        .mount(&server)
        .await;

    let config = PromptConfig::with_stop_sequences(["a", "b", "c", "d", "e"]);
    let err = client(&server, GenerateModel::TextBison)
        .generate("hello", &config, None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Validation(_)));
}
