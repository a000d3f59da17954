//! Integration tests for the Gemini provider against a local HTTP double.
//!
//! These tests verify the wire mapping of the adapter:
//! 1. Request path, auth header, and generation config
//! 2. Response text, usage, and finish reason
//! 3. Status codes mapped onto `AIError`

use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use referee::adapters::ai::{GeminiConfig, GeminiProvider};
use referee::adapters::analysis::{LlmOptionComparator, LlmParameterSynthesizer};
use referee::domain::decision::{DecisionCategory, DynamicParameter, UserPreferences};
use referee::ports::{
    AIError, AIProvider, CompletionRequest, FinishReason, MessageRole, OptionComparator,
    ParameterSynthesizer, RequestMetadata,
};
use std::sync::Arc;

// =============================================================================
// Test Infrastructure
// =============================================================================

const MODEL: &str = "gemini-test";
const ENDPOINT: &str = "/v1beta/models/gemini-test:generateContent";

fn provider(server: &MockServer) -> GeminiProvider {
    GeminiProvider::new(
        GeminiConfig::new("test-key")
            .with_base_url(server.uri())
            .with_model(MODEL)
            .with_timeout(Duration::from_secs(5)),
    )
    .unwrap()
}

fn text_response(text: &str) -> Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 34},
        "modelVersion": "gemini-test-001"
    })
}

fn request() -> CompletionRequest {
    CompletionRequest::new(RequestMetadata::new("trace-1"))
        .with_message(MessageRole::User, "Compare these options")
}

async fn body_of(server: &MockServer) -> Value {
    let requests: Vec<Request> = server.received_requests().await.unwrap();
    serde_json::from_slice(&requests[0].body).unwrap()
}

// =============================================================================
// Request / response mapping
// =============================================================================

#[tokio::test]
async fn sends_json_mode_request_and_maps_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("{\"ok\":true}")))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(&server)
        .complete(
            request()
                .with_system_prompt("Be a referee")
                .with_json_schema(json!({"type": "OBJECT"}))
                .with_max_tokens(4000)
                .with_thinking_budget(1500),
        )
        .await
        .unwrap();

    assert_eq!(response.content, "{\"ok\":true}");
    assert_eq!(response.usage.prompt_tokens, 12);
    assert_eq!(response.usage.completion_tokens, 34);
    assert_eq!(response.model, "gemini-test-001");
    assert_eq!(response.finish_reason, FinishReason::Stop);

    let body = body_of(&server).await;
    assert_eq!(body["contents"][0]["role"], "user");
    assert_eq!(body["contents"][0]["parts"][0]["text"], "Compare these options");
    assert_eq!(body["systemInstruction"]["parts"][0]["text"], "Be a referee");
    assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
    assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    assert_eq!(body["generationConfig"]["maxOutputTokens"], 4000);
    assert_eq!(body["generationConfig"]["thinkingConfig"]["thinkingBudget"], 1500);
}

#[tokio::test]
async fn request_model_overrides_configured_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-other:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("hi")))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(&server)
        .complete(request().with_model("gemini-other"))
        .await
        .unwrap();

    assert_eq!(response.content, "hi");
}

#[tokio::test]
async fn max_tokens_finish_maps_to_length() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"parts": [{"text": "{\"options\": ["}]},
                "finishReason": "MAX_TOKENS"
            }]
        })))
        .mount(&server)
        .await;

    let response = provider(&server).complete(request()).await.unwrap();

    assert_eq!(response.finish_reason, FinishReason::Length);
}

#[tokio::test]
async fn blocked_prompt_is_content_filtered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        })))
        .mount(&server)
        .await;

    let err = provider(&server).complete(request()).await.unwrap_err();

    assert!(matches!(err, AIError::ContentFiltered { .. }));
}

// =============================================================================
// Status mapping
// =============================================================================

#[tokio::test]
async fn unauthorized_maps_to_authentication_failed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let err = provider(&server).complete(request()).await.unwrap_err();

    assert!(matches!(err, AIError::AuthenticationFailed));
}

#[tokio::test]
async fn too_many_requests_uses_retry_after_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "17"))
        .mount(&server)
        .await;

    let err = provider(&server).complete(request()).await.unwrap_err();

    assert!(matches!(err, AIError::RateLimited { retry_after_secs: 17 }));
}

#[tokio::test]
async fn too_many_requests_reads_retry_delay_from_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": {
                "code": 429,
                "details": [{"@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "41s"}]
            }
        })))
        .mount(&server)
        .await;

    let err = provider(&server).complete(request()).await.unwrap_err();

    assert!(matches!(err, AIError::RateLimited { retry_after_secs: 41 }));
}

#[tokio::test]
async fn server_error_maps_to_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let err = provider(&server).complete(request()).await.unwrap_err();

    assert!(matches!(err, AIError::Unavailable { .. }));
}

#[tokio::test]
async fn retries_transient_failure_when_configured() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response("second try")))
        .mount(&server)
        .await;

    let provider = GeminiProvider::new(
        GeminiConfig::new("test-key")
            .with_base_url(server.uri())
            .with_model(MODEL)
            .with_max_retries(1),
    )
    .unwrap();

    let response = provider.complete(request()).await.unwrap();

    assert_eq!(response.content, "second try");
}

// =============================================================================
// Analysis adapters over the wire
// =============================================================================

#[tokio::test]
async fn synthesizer_falls_back_when_provider_rejects_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let synthesizer = LlmParameterSynthesizer::new(Arc::new(provider(&server)), MODEL);
    let suggestions = synthesizer
        .synthesize(DecisionCategory::Finance, "Pay off the mortgage early?")
        .await;

    let ids: Vec<&str> = suggestions.parameters.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["cost", "risk"]);
    assert_eq!(suggestions.suggested_priorities.len(), 4);
}

#[tokio::test]
async fn comparator_parses_fenced_json_from_the_wire() {
    let server = MockServer::start().await;
    let fenced = "```json\n{\"options\": [{\"name\": \"Rent\", \"scores\": {\"cost\": \"70%\"}}], \"summary\": \"s\", \"recommendation\": \"r\"}\n```";
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response(fenced)))
        .mount(&server)
        .await;

    let preferences = UserPreferences::new(
        "Rent or buy?",
        DecisionCategory::Finance,
        vec![DynamicParameter::toggle("kids", "Have kids", true)],
        vec!["Flexibility".to_string()],
    )
    .unwrap();
    let comparator = LlmOptionComparator::new(Arc::new(provider(&server)), MODEL);

    let result = comparator.compare(&preferences).await.unwrap();

    assert_eq!(result.options[0].name, "Rent");
    assert_eq!(result.options[0].scores.cost, 70);
    assert_eq!(result.options[0].scores.risk, 50);
    assert_eq!(result.summary, "s");
}
