//! Gemini Provider - Implementation of AIProvider for Google's Gemini API.
//!
//! Uses the `generateContent` endpoint. JSON output is requested through
//! `responseMimeType` plus a `responseSchema` in the generation config.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-3-flash-preview")
//!     .with_base_url("https://generativelanguage.googleapis.com");
//!
//! let provider = GeminiProvider::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{header::RETRY_AFTER, Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, MessageRole,
    ResponseFormat, TokenUsage,
};

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model when a request does not name one.
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Model used for comparisons unless configured otherwise.
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-3-pro-preview";

/// Retry-after used when the API gives no hint.
const DEFAULT_RETRY_AFTER_SECS: u32 = 60;

/// Configuration for the Gemini provider.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model used when a request does not name one.
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(60),
            max_retries: 0,
        }
    }

    /// Sets the default model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini API provider implementation.
pub struct GeminiProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider with the given configuration.
    ///
    /// # Errors
    ///
    /// `InvalidRequest` if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn model_for<'a>(&'a self, request: &'a CompletionRequest) -> &'a str {
        request.model.as_deref().unwrap_or(&self.config.model)
    }

    /// Builds the generateContent endpoint URL.
    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    /// Converts our request to Gemini's format.
    fn to_gemini_request(request: &CompletionRequest) -> GeminiRequest {
        let contents = request
            .messages
            .iter()
            .map(|msg| GeminiContent {
                role: Some(
                    match msg.role {
                        MessageRole::User => "user",
                    }
                    .to_string(),
                ),
                parts: vec![GeminiPart {
                    text: Some(msg.content.clone()),
                }],
            })
            .collect();

        let system_instruction = request.system_prompt.as_ref().map(|prompt| GeminiContent {
            role: None,
            parts: vec![GeminiPart {
                text: Some(prompt.clone()),
            }],
        });

        let (response_mime_type, response_schema) = match &request.response_format {
            ResponseFormat::Text => (None, None),
            ResponseFormat::Json { schema } => {
                (Some("application/json".to_string()), Some(schema.clone()))
            }
        };

        GeminiRequest {
            contents,
            system_instruction,
            generation_config: GenerationConfig {
                response_mime_type,
                response_schema,
                max_output_tokens: request.max_tokens,
                temperature: request.temperature,
                thinking_config: request
                    .thinking_budget
                    .map(|thinking_budget| ThinkingConfig { thinking_budget }),
            },
        }
    }

    /// Sends a request.
    async fn send_request(&self, request: &CompletionRequest) -> Result<Response, AIError> {
        let body = Self::to_gemini_request(request);

        self.client
            .post(self.generate_url(self.model_for(request)))
            .header("x-goog-api-key", self.config.api_key())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    /// Maps non-success statuses to errors.
    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u32>().ok());
        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(AIError::AuthenticationFailed),
            429 => Err(AIError::rate_limited(
                retry_after
                    .or_else(|| parse_retry_delay(&error_body))
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            )),
            400 => Err(AIError::InvalidRequest(error_body)),
            500..=599 => Err(AIError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(AIError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    /// Parses a generateContent response.
    async fn parse_response(
        &self,
        response: Response,
        requested_model: &str,
    ) -> Result<CompletionResponse, AIError> {
        let response = self.handle_response_status(response).await?;

        let gemini_response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        into_completion(gemini_response, requested_model)
    }
}

/// Reads `retryDelay` ("30s") from a Gemini error body.
fn parse_retry_delay(error_body: &str) -> Option<u32> {
    let parsed: Value = serde_json::from_str(error_body).ok()?;
    parsed
        .pointer("/error/details")?
        .as_array()?
        .iter()
        .filter_map(|d| d.get("retryDelay").and_then(Value::as_str))
        .find_map(|delay| {
            let secs = delay.trim_end_matches('s');
            secs.parse::<f64>().ok().map(|s| s.ceil() as u32)
        })
}

fn map_finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        None | Some("STOP") => FinishReason::Stop,
        Some("MAX_TOKENS") => FinishReason::Length,
        Some("SAFETY") | Some("PROHIBITED_CONTENT") | Some("BLOCKLIST") | Some("SPII")
        | Some("RECITATION") => FinishReason::ContentFilter,
        Some(_) => FinishReason::Error,
    }
}

fn into_completion(
    response: GeminiResponse,
    requested_model: &str,
) -> Result<CompletionResponse, AIError> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates returned".to_string());
        return Err(AIError::content_filtered(reason));
    };

    let finish_reason = map_finish_reason(candidate.finish_reason.as_deref());
    let content = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    if content.is_empty() && finish_reason == FinishReason::ContentFilter {
        return Err(AIError::content_filtered(
            candidate
                .finish_reason
                .unwrap_or_else(|| "SAFETY".to_string()),
        ));
    }

    let usage = response
        .usage_metadata
        .map(|u| TokenUsage::new(u.prompt_token_count, u.candidates_token_count))
        .unwrap_or_default();

    Ok(CompletionResponse {
        content,
        usage,
        model: response
            .model_version
            .unwrap_or_else(|| requested_model.to_string()),
        finish_reason,
    })
}

/// Delay before retry `attempt` (zero-based): 1s, 2s, 4s, ... capped at 32s.
pub fn retry_backoff(attempt: u32) -> Duration {
    Duration::from_secs(1 << attempt.min(5))
}

/// Longest one `complete` call can take when every attempt times out.
pub fn worst_case_call(timeout: Duration, max_retries: u32) -> Duration {
    let attempts = timeout.saturating_mul(max_retries.saturating_add(1));
    let ramp = Duration::from_secs((1u64 << max_retries.min(5)) - 1);
    let plateau = retry_backoff(5).saturating_mul(max_retries.saturating_sub(5));
    attempts.saturating_add(ramp).saturating_add(plateau)
}

#[async_trait]
impl AIProvider for GeminiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, AIError> {
        let model = self.model_for(&request).to_string();
        let mut retry_count = 0;

        loop {
            let result = match self.send_request(&request).await {
                Ok(response) => self.parse_response(response, &model).await,
                Err(err) => Err(err),
            };

            match result {
                Ok(completion) => return Ok(completion),
                Err(err) if !err.is_retryable() || retry_count >= self.config.max_retries => {
                    return Err(err)
                }
                Err(err) => {
                    tracing::warn!(
                        error = %err,
                        retry = retry_count + 1,
                        trace_id = %request.metadata.trace_id,
                        "Gemini request failed, retrying"
                    );
                }
            }

            sleep(retry_backoff(retry_count)).await;
            retry_count += 1;
        }
    }
}

// ----- Gemini API Types -----

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RequestMetadata;
    use serde_json::json;

    fn request() -> CompletionRequest {
        CompletionRequest::new(RequestMetadata::new("trace-1"))
            .with_message(MessageRole::User, "Compare options")
    }

    #[test]
    fn backoff_doubles_then_plateaus() {
        assert_eq!(retry_backoff(0), Duration::from_secs(1));
        assert_eq!(retry_backoff(3), Duration::from_secs(8));
        assert_eq!(retry_backoff(9), Duration::from_secs(32));
    }

    #[test]
    fn worst_case_call_adds_attempts_and_backoff() {
        let timeout = Duration::from_secs(60);
        assert_eq!(worst_case_call(timeout, 0), timeout);
        assert_eq!(worst_case_call(timeout, 2), Duration::from_secs(180 + 1 + 2));
        assert_eq!(
            worst_case_call(timeout, 7),
            Duration::from_secs(480 + 1 + 2 + 4 + 8 + 16 + 32 + 32)
        );
    }

    #[test]
    fn config_builder_works() {
        let config = GeminiConfig::new("key")
            .with_model("gemini-3-pro-preview")
            .with_base_url("http://localhost:9999")
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(2);

        assert_eq!(config.model, "gemini-3-pro-preview");
        assert_eq!(config.base_url, "http://localhost:9999");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.api_key(), "key");
    }

    #[test]
    fn config_debug_hides_api_key() {
        let config = GeminiConfig::new("super-secret");
        assert!(!format!("{:?}", config).contains("super-secret"));
    }

    #[test]
    fn generate_url_uses_requested_model() {
        let provider =
            GeminiProvider::new(GeminiConfig::new("k").with_base_url("http://host/")).unwrap();
        let req = request().with_model("gemini-3-pro-preview");

        assert_eq!(
            provider.generate_url(provider.model_for(&req)),
            "http://host/v1beta/models/gemini-3-pro-preview:generateContent"
        );
    }

    #[test]
    fn text_request_has_no_json_directive() {
        let body = serde_json::to_value(GeminiProvider::to_gemini_request(&request())).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Compare options");
        assert!(body.get("systemInstruction").is_none());
        assert_eq!(body["generationConfig"], json!({}));
    }

    #[test]
    fn json_request_carries_schema_and_limits() {
        let req = request()
            .with_system_prompt("Return strictly valid JSON.")
            .with_json_schema(json!({"type": "OBJECT"}))
            .with_max_tokens(4000)
            .with_thinking_budget(1500);
        let body = serde_json::to_value(GeminiProvider::to_gemini_request(&req)).unwrap();

        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "Return strictly valid JSON."
        );
        let gen = &body["generationConfig"];
        assert_eq!(gen["responseMimeType"], "application/json");
        assert_eq!(gen["responseSchema"], json!({"type": "OBJECT"}));
        assert_eq!(gen["maxOutputTokens"], 4000);
        assert_eq!(gen["thinkingConfig"]["thinkingBudget"], 1500);
    }

    #[test]
    fn finish_reasons_map() {
        assert_eq!(map_finish_reason(Some("STOP")), FinishReason::Stop);
        assert_eq!(map_finish_reason(None), FinishReason::Stop);
        assert_eq!(map_finish_reason(Some("MAX_TOKENS")), FinishReason::Length);
        assert_eq!(map_finish_reason(Some("SAFETY")), FinishReason::ContentFilter);
        assert_eq!(
            map_finish_reason(Some("PROHIBITED_CONTENT")),
            FinishReason::ContentFilter
        );
        assert_eq!(map_finish_reason(Some("OTHER")), FinishReason::Error);
    }

    #[test]
    fn completion_joins_text_parts() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"a\":"}, {"text": "1}"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 8, "totalTokenCount": 20},
            "modelVersion": "gemini-3-flash-preview-001"
        }))
        .unwrap();

        let completion = into_completion(response, "gemini-3-flash-preview").unwrap();
        assert_eq!(completion.content, "{\"a\":1}");
        assert_eq!(completion.usage, TokenUsage::new(12, 8));
        assert_eq!(completion.model, "gemini-3-flash-preview-001");
    }

    #[test]
    fn blocked_prompt_is_content_filtered() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .unwrap();

        let err = into_completion(response, "m").unwrap_err();
        assert!(matches!(err, AIError::ContentFiltered { reason } if reason == "SAFETY"));
    }

    #[test]
    fn empty_safety_candidate_is_content_filtered() {
        let response: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();

        assert!(matches!(
            into_completion(response, "m"),
            Err(AIError::ContentFiltered { .. })
        ));
    }

    #[test]
    fn retry_delay_is_read_from_error_details() {
        let body = json!({
            "error": {
                "code": 429,
                "details": [{"@type": "type.googleapis.com/google.rpc.RetryInfo", "retryDelay": "17s"}]
            }
        })
        .to_string();
        assert_eq!(parse_retry_delay(&body), Some(17));
        assert_eq!(parse_retry_delay("not json"), None);
    }
}
