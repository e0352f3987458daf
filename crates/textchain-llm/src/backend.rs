//! Chat backend trait and the scripted mock implementation.
//!
//! [`ChatBackend`] is the seam between the generation result model and the
//! completion provider: the core depends on this contract only, so providers
//! can be swapped (or mocked) without touching aggregation logic.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::{LlmError, Result};
use crate::types::{ChatRequest, ChatResponse, ChatUsage};

// ─────────────────────────────────────────────────────────────────────────────
// Chat Backend Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for chat completion providers.
///
/// Implementations own transport concerns (timeouts, authentication, retries);
/// the core treats their failures as opaque
/// [`CompletionProvider`](LlmError::CompletionProvider) errors.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Execute one completion request and return the raw provider response.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Get the name of this backend.
    fn name(&self) -> &str;
}

/// A backend that can be shared across threads.
pub type SharedChatBackend = Arc<dyn ChatBackend>;

// ─────────────────────────────────────────────────────────────────────────────
// Mock Backend
// ─────────────────────────────────────────────────────────────────────────────

/// A mock backend for testing.
///
/// Returns pre-scripted responses in order and records every request it
/// receives, so tests can assert on the exact payload the core produced.
#[derive(Debug, Default)]
pub struct MockChatBackend {
    responses: Mutex<Vec<ChatResponse>>,
    request_log: Mutex<Vec<ChatRequest>>,
}

impl MockChatBackend {
    /// Create a mock that plays back `responses` in order.
    ///
    /// A request made after the script is exhausted fails with a
    /// [`CompletionProvider`](LlmError::CompletionProvider) error.
    pub fn new(responses: Vec<ChatResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            request_log: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock scripted with a single assistant reply.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::new(vec![ChatResponse::new(
            vec![crate::types::ChatChoice::assistant(text, Some("stop"))],
            ChatUsage::new(10, 4, 14),
        )])
    }

    /// All requests made so far, in order.
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.request_log.lock().unwrap().clone()
    }

    /// Number of requests made so far.
    pub fn request_count(&self) -> usize {
        self.request_log.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse> {
        self.request_log.lock().unwrap().push(request);

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(LlmError::CompletionProvider(
                "mock backend: no scripted responses left".to_string(),
            ));
        }
        Ok(responses.remove(0))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
