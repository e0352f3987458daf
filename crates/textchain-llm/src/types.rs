//! Wire-shaped types for chat completion requests and responses.
//!
//! The raw [`ChatResponse`] mirrors the provider's JSON shape with optional
//! fields; the accessors on it validate presence at the aggregation boundary
//! so a missing field surfaces as [`LlmError::UpstreamProtocol`] instead of a
//! silent default.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{LlmError, Result};

// ─────────────────────────────────────────────────────────────────────────────
// Messages
// ─────────────────────────────────────────────────────────────────────────────

/// The role of a chat message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single message in a chat conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message author.
    pub role: Role,
    /// The message text.
    pub content: String,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Create a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat Request
// ─────────────────────────────────────────────────────────────────────────────

/// A chat completion request.
///
/// Serializes directly into the provider's `/chat/completions` payload:
/// `extra` keys are flattened into the top level, so free-form model options
/// (temperature, max_tokens, ...) pass through verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Canonical model identifier.
    pub model: String,

    /// Conversation messages, oldest first.
    pub messages: Vec<ChatMessage>,

    /// Stop sequences, omitted from the payload when empty.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,

    /// Additional provider options, flattened into the payload.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ChatRequest {
    /// Create a request for the given model and messages.
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            stop: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Set stop sequences.
    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = stop;
        self
    }

    /// Merge additional provider options into the request.
    pub fn with_extra(mut self, extra: BTreeMap<String, serde_json::Value>) -> Self {
        self.extra.extend(extra);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat Response (raw provider shape)
// ─────────────────────────────────────────────────────────────────────────────

/// A raw chat completion response as returned by the provider.
///
/// Every field the aggregation model depends on is optional here; use
/// [`ChatResponse::choices`] and [`ChatResponse::token_usage`] to get
/// validated views.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Provider-assigned response id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// The model that produced the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Candidate completions, in provider rank order.
    #[serde(default)]
    pub choices: Option<Vec<ChatChoice>>,

    /// Token accounting for this call.
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

impl ChatResponse {
    /// Create a response from choices and usage, for adapters and tests.
    pub fn new(choices: Vec<ChatChoice>, usage: ChatUsage) -> Self {
        Self {
            id: None,
            model: None,
            choices: Some(choices),
            usage: Some(usage),
        }
    }

    /// The choice list, or [`LlmError::UpstreamProtocol`] if absent.
    ///
    /// An empty list is valid: it means the provider returned zero choices.
    pub fn choices(&self) -> Result<&[ChatChoice]> {
        self.choices
            .as_deref()
            .ok_or_else(|| LlmError::missing_field("choices"))
    }

    /// The validated usage record, or [`LlmError::UpstreamProtocol`] if the
    /// record or any of its fields is absent.
    pub fn token_usage(&self) -> Result<TokenUsage> {
        self.usage
            .as_ref()
            .ok_or_else(|| LlmError::missing_field("usage"))?
            .validate()
    }
}

/// One candidate completion within a response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatChoice {
    /// Provider rank of this choice.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,

    /// Chat-style payload (`message.content`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<ChoiceMessage>,

    /// Legacy completions-style payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Why the model stopped, when the provider reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

impl ChatChoice {
    /// Create an assistant chat choice, for adapters and tests.
    pub fn assistant(content: impl Into<String>, finish_reason: Option<&str>) -> Self {
        Self {
            index: Some(0),
            message: Some(ChoiceMessage {
                role: Some("assistant".to_string()),
                content: Some(content.into()),
            }),
            text: None,
            finish_reason: finish_reason.map(str::to_string),
        }
    }

    /// The generated text: `message.content` when present, falling back to
    /// the legacy `text` field. Neither present is a protocol violation.
    pub fn content(&self) -> Result<&str> {
        if let Some(message) = &self.message
            && let Some(content) = &message.content
        {
            return Ok(content);
        }
        if let Some(text) = &self.text {
            return Ok(text);
        }
        Err(LlmError::UpstreamProtocol(
            "choice carries neither message content nor text".to_string(),
        ))
    }
}

/// The message payload of a chat-style choice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChoiceMessage {
    /// Author role as reported by the provider.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Generated text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Usage
// ─────────────────────────────────────────────────────────────────────────────

/// Raw usage record as reported by the provider.
///
/// Fields are optional because presence is the provider's obligation, not a
/// parsing guarantee; [`ChatUsage::validate`] enforces it.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ChatUsage {
    #[serde(default)]
    pub prompt_tokens: Option<u32>,
    #[serde(default)]
    pub completion_tokens: Option<u32>,
    #[serde(default)]
    pub total_tokens: Option<u32>,
}

impl ChatUsage {
    /// Create a fully-populated usage record.
    pub fn new(prompt_tokens: u32, completion_tokens: u32, total_tokens: u32) -> Self {
        Self {
            prompt_tokens: Some(prompt_tokens),
            completion_tokens: Some(completion_tokens),
            total_tokens: Some(total_tokens),
        }
    }

    /// Check all fields are present and convert into a [`TokenUsage`].
    pub fn validate(&self) -> Result<TokenUsage> {
        Ok(TokenUsage {
            prompt_tokens: self
                .prompt_tokens
                .ok_or_else(|| LlmError::missing_field("usage.prompt_tokens"))?,
            completion_tokens: self
                .completion_tokens
                .ok_or_else(|| LlmError::missing_field("usage.completion_tokens"))?,
            total_tokens: self
                .total_tokens
                .ok_or_else(|| LlmError::missing_field("usage.total_tokens"))?,
        })
    }
}

/// Validated, aggregated token accounting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompts.
    pub prompt_tokens: u32,
    /// Tokens in the generated completions.
    pub completion_tokens: u32,
    /// Total tokens billed.
    pub total_tokens: u32,
}

impl TokenUsage {
    /// Create a usage record.
    pub fn new(prompt_tokens: u32, completion_tokens: u32, total_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }

    /// Add another call's usage into this running total.
    pub fn accumulate(&mut self, other: TokenUsage) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
    }
}
