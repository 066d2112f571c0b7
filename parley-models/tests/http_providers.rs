//! HTTP contract tests for the Ollama and Gemini providers.
//!
//! Uses wiremock for HTTP mocking.

use parley_models::Error;
use parley_models::auth::ApiKey;
use parley_models::providers::{
    GeminiProvider, GenerateRequest, GenerationProvider, OllamaProvider, SchemaDescriptor,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn schema() -> SchemaDescriptor {
    SchemaDescriptor::new(
        "Verdict",
        json!({"type": "object", "properties": {"ok": {"type": "boolean"}}}),
    )
}

#[tokio::test]
async fn ollama_sends_schema_as_format_and_parses_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "llama3",
            "stream": false,
            "format": {"type": "object"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3",
            "message": {"role": "assistant", "content": "{\"ok\": true}"},
            "done": true,
            "prompt_eval_count": 7,
            "eval_count": 3
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = OllamaProvider::with_base_url(mock_server.uri());
    let response = provider
        .generate(GenerateRequest::new("llama3", "hello").output_schema(schema()))
        .await
        .expect("generate failed");

    assert_eq!(response.parsed, Some(json!({"ok": true})));
    assert_eq!(response.usage.total_tokens, 10);
}

#[tokio::test]
async fn ollama_maps_error_status_to_provider_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_string("model 'nope' not found"))
        .mount(&mock_server)
        .await;

    let provider = OllamaProvider::with_base_url(mock_server.uri());
    let err = provider
        .generate(GenerateRequest::new("nope", "hello"))
        .await
        .unwrap_err();

    match err {
        Error::ProviderApi(msg) => {
            assert!(msg.contains("404"));
            assert!(msg.contains("not found"));
        }
        other => panic!("expected ProviderApi, got {other:?}"),
    }
}

#[tokio::test]
async fn ollama_unreachable_is_request_error() {
    // Nothing listens on port 9 (discard) in test environments.
    let provider = OllamaProvider::with_base_url("http://127.0.0.1:9");
    let err = provider
        .generate(GenerateRequest::new("llama3", "hello"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Request(_)));
}

#[tokio::test]
async fn gemini_sends_key_header_and_json_schema() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseJsonSchema": {"type": "object"}
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"ok\": false}"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 5, "candidatesTokenCount": 4}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::with_base_url(ApiKey::new("test-key"), mock_server.uri());
    let response = provider
        .generate(
            GenerateRequest::new("gemini-2.5-flash", "hello")
                .system("judge")
                .output_schema(schema()),
        )
        .await
        .expect("generate failed");

    assert_eq!(response.parsed, Some(json!({"ok": false})));
    assert_eq!(response.text.as_deref(), Some("{\"ok\": false}"));
    assert_eq!(response.model, "gemini-2.5-flash");
}

#[tokio::test]
async fn gemini_truncated_output_keeps_text_without_parsed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"ok\": tr"}]},
                "finishReason": "MAX_TOKENS"
            }]
        })))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::with_base_url(ApiKey::new("test-key"), mock_server.uri());
    let response = provider
        .generate(GenerateRequest::new("gemini-2.5-flash", "hello").output_schema(schema()))
        .await
        .expect("generate failed");

    assert!(response.parsed.is_none());
    assert_eq!(response.text.as_deref(), Some("{\"ok\": tr"));
}

#[tokio::test]
async fn gemini_auth_failure_is_provider_api_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::with_base_url(ApiKey::new("bad"), mock_server.uri());
    let err = provider
        .generate(GenerateRequest::new("gemini-2.5-flash", "hello"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ProviderApi(msg) if msg.contains("403")));
}

#[tokio::test]
async fn ollama_unexpected_body_is_serialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "loading"})))
        .mount(&mock_server)
        .await;

    let provider = OllamaProvider::with_base_url(mock_server.uri());
    let err = provider
        .generate(GenerateRequest::new("llama3", "hello"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Serialization(_)));
}

#[tokio::test]
async fn gemini_non_json_body_is_serialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>upstream error</html>"))
        .mount(&mock_server)
        .await;

    let provider = GeminiProvider::with_base_url(ApiKey::new("key"), mock_server.uri());
    let err = provider
        .generate(GenerateRequest::new("gemini-2.5-flash", "hello"))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Serialization(_)));
}
