//! Injectable inference provider.
//!
//! The prompt-embedded classification rules are enforced by the hosted model,
//! not by code, so the provider sits behind a trait: handlers depend on
//! `dyn InferenceProvider` and tests substitute a deterministic stub.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::config::LlmConfig;
use crate::errors::AppError;

/// Inference call failures, classified at the call site
#[derive(Debug)]
pub enum InferenceError {
    /// Credential unconfigured - checked before any network traffic
    MissingCredential,
    /// Provider quota or rate limit (HTTP 429, or a quota-flavored message)
    Quota(String),
    /// Any other provider failure
    Provider(String),
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::MissingCredential => AppError::ServiceUnavailable(
                "inference credential not configured (set TODOPILOT_LLM_API_KEY)".to_string(),
            ),
            InferenceError::Quota(msg) => AppError::RateLimited(msg),
            InferenceError::Provider(msg) => {
                tracing::error!(error = %msg, "inference provider call failed");
                AppError::InferenceFailed
            }
        }
    }
}

/// A model that turns a prompt into raw text output
#[async_trait]
pub trait InferenceProvider: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError>;
}

// =============================================================================
// OPENAI-COMPATIBLE HTTP PROVIDER
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: i32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: String,
}

/// Hosted model client speaking the OpenAI-compatible chat completions API
pub struct HttpInference {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpInference {
    pub fn new(config: &LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn quota_flavored(message: &str) -> bool {
        let lower = message.to_lowercase();
        lower.contains("quota") || lower.contains("rate limit") || lower.contains("429")
    }
}

#[async_trait]
impl InferenceProvider for HttpInference {
    async fn generate(&self, prompt: &str) -> Result<String, InferenceError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(InferenceError::MissingCredential)?;

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: 0.1,
            max_tokens: 1024,
        };

        let url = format!("{}/v1/chat/completions", self.endpoint);

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let msg = e.to_string();
                if Self::quota_flavored(&msg) {
                    InferenceError::Quota(msg)
                } else {
                    InferenceError::Provider(format!("HTTP request failed: {msg}"))
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().await.unwrap_or_default();
            return Err(InferenceError::Quota(body));
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if Self::quota_flavored(&body) {
                return Err(InferenceError::Quota(body));
            }
            return Err(InferenceError::Provider(format!(
                "API returned status {status}: {body}"
            )));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| InferenceError::Provider(format!("Failed to parse response: {e}")))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| InferenceError::Provider("No response from API".to_string()))
    }
}

// =============================================================================
// DETERMINISTIC STUB (tests and offline development)
// =============================================================================

/// Provider returning a fixed response and counting invocations. Used to
/// assert that validation gates short-circuit before any inference call.
pub struct StaticProvider {
    response: Result<String, &'static str>,
    calls: AtomicUsize,
}

impl StaticProvider {
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: Ok(response.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(kind: &'static str) -> Self {
        Self {
            response: Err(kind),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceProvider for StaticProvider {
    async fn generate(&self, _prompt: &str) -> Result<String, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err("quota") => Err(InferenceError::Quota("quota exceeded".to_string())),
            Err("missing-credential") => Err(InferenceError::MissingCredential),
            Err(other) => Err(InferenceError::Provider((*other).to_string())),
        }
    }
}

// =============================================================================
// OUTPUT CLEANUP
// =============================================================================

/// Extract JSON from potentially messy model output (markdown fences,
/// surrounding prose)
pub fn extract_json(output: &str) -> String {
    let cleaned = output
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();

    // Find the first { and its matching }
    if let Some(start) = cleaned.find('{') {
        let mut depth = 0;
        let mut end = start;
        for (i, c) in cleaned[start..].char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        end = start + i + c.len_utf8();
                        break;
                    }
                }
                _ => {}
            }
        }
        cleaned[start..end].to_string()
    } else {
        cleaned.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_plain() {
        let output = r#"Here is the JSON: {"title": "회의", "priority": "high"} done"#;
        let json = extract_json(output);
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
        assert!(json.contains("회의"));
    }

    #[test]
    fn test_extract_json_with_markdown_fence() {
        let output = "```json\n{\"title\": \"t\"}\n```";
        assert_eq!(extract_json(output), r#"{"title": "t"}"#);
    }

    #[test]
    fn test_extract_json_nested() {
        let output = r#"{"a": {"b": 1}, "c": 2} trailing"#;
        assert_eq!(extract_json(output), r#"{"a": {"b": 1}, "c": 2}"#);
    }

    #[test]
    fn test_quota_detection_by_message() {
        assert!(HttpInference::quota_flavored("Resource exhausted: quota"));
        assert!(HttpInference::quota_flavored("Rate limit reached"));
        assert!(HttpInference::quota_flavored("status 429"));
        assert!(!HttpInference::quota_flavored("connection refused"));
    }

    #[tokio::test]
    async fn test_static_provider_counts_calls() {
        let provider = StaticProvider::with_response("{}");
        assert_eq!(provider.calls(), 0);
        provider.generate("p").await.unwrap();
        provider.generate("p").await.unwrap();
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_error_classification_into_app_error() {
        let quota = StaticProvider::failing("quota");
        let err: AppError = quota.generate("p").await.unwrap_err().into();
        assert_eq!(err.code(), "RATE_LIMITED");

        let missing = StaticProvider::failing("missing-credential");
        let err: AppError = missing.generate("p").await.unwrap_err().into();
        assert_eq!(err.code(), "SERVICE_UNAVAILABLE");

        let other = StaticProvider::failing("boom");
        let err: AppError = other.generate("p").await.unwrap_err().into();
        assert_eq!(err.code(), "INFERENCE_FAILED");
    }
}
