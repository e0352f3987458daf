//! OpenAI-compatible chat completion backend.
//!
//! Works against OpenAI's API or any service exposing the same
//! `/chat/completions` surface. Failures are folded into opaque
//! [`CompletionProvider`](crate::LlmError::CompletionProvider) errors; retry
//! policy is the caller's concern, not this adapter's.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, header};

use crate::backend::ChatBackend;
use crate::error::{LlmError, Result};
use crate::types::{ChatRequest, ChatResponse};

/// Default OpenAI API base URL.
const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";

/// Default timeout for completion requests.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for the OpenAI-compatible backend.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for authentication.
    pub api_key: String,

    /// Base URL for the API.
    pub base_url: String,

    /// Request timeout.
    pub timeout: Duration,

    /// Name for this backend instance.
    pub name: String,
}

impl OpenAiConfig {
    /// Create a config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_OPENAI_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            name: "openai".to_string(),
        }
    }

    /// Create a config from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
            LlmError::Config("OPENAI_API_KEY environment variable not set".to_string())
        })?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for compatible services or test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the backend name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// OpenAI Backend
// ─────────────────────────────────────────────────────────────────────────────

/// OpenAI-compatible chat completion backend.
pub struct OpenAiChatBackend {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiChatBackend {
    /// Create a backend with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create a backend from environment configuration.
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAiConfig::from_env()?)
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    async fn handle_error_response(response: Response) -> LlmError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let detail = serde_json::from_str::<OpenAiErrorResponse>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);

        let kind = match status.as_u16() {
            401 | 403 => "authentication failed",
            429 => "rate limit exceeded",
            500..=599 => "server error",
            _ => "request failed",
        };

        LlmError::CompletionProvider(format!("{kind} (HTTP {status}): {detail}"))
    }
}

#[async_trait]
impl ChatBackend for OpenAiChatBackend {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        tracing::debug!(
            backend = %self.config.name,
            model = %request.model,
            messages = request.messages.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .header(header::CONTENT_TYPE, "application/json")
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.config.api_key),
            )
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::CompletionProvider(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::handle_error_response(response).await);
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| LlmError::CompletionProvider(format!("unparseable response: {e}")))
    }

    fn name(&self) -> &str {
        &self.config.name
    }
}

#[derive(Debug, serde::Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, serde::Deserialize)]
struct OpenAiErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = OpenAiConfig::new("sk-test");
        assert_eq!(config.base_url, DEFAULT_OPENAI_BASE);
        assert_eq!(config.name, "openai");
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[test]
    fn test_config_builders() {
        let config = OpenAiConfig::new("sk-test")
            .with_base_url("http://localhost:8080/v1")
            .with_timeout(Duration::from_secs(5))
            .with_name("local");

        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.name, "local");
    }

    #[test]
    fn test_completions_url() {
        let backend =
            OpenAiChatBackend::new(OpenAiConfig::new("sk-test").with_base_url("http://api/v1"))
                .unwrap();
        assert_eq!(backend.completions_url(), "http://api/v1/chat/completions");
        assert_eq!(backend.name(), "openai");
    }

    #[test]
    fn test_error_body_parsing() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        let parsed: OpenAiErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.error.message, "Incorrect API key provided");
    }
}
