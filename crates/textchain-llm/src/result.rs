//! Aggregated generation results.
//!
//! [`LlmResult`] is the uniform value every completion call normalizes into:
//! one ordered generation batch per input prompt, plus token accounting
//! summed over every provider call made to satisfy the request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{LlmError, Result};
use crate::types::{ChatChoice, TokenUsage};

/// One candidate answer for a prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    /// The generated text.
    pub text: String,

    /// Provider extras such as the finish reason, when reported.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_info: Option<BTreeMap<String, serde_json::Value>>,
}

impl Generation {
    /// Create a bare generation.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            generation_info: None,
        }
    }

    /// Build a generation from one raw response choice, carrying the finish
    /// reason through as generation info when the provider reports one.
    pub fn from_choice(choice: &ChatChoice) -> Result<Self> {
        let mut generation = Self::new(choice.content()?);
        if let Some(reason) = &choice.finish_reason {
            let mut info = BTreeMap::new();
            info.insert(
                "finish_reason".to_string(),
                serde_json::Value::String(reason.clone()),
            );
            generation.generation_info = Some(info);
        }
        Ok(generation)
    }
}

/// The normalized result of a `generate` call.
///
/// Immutable after construction. Batches are parallel to the input prompt
/// list; a batch is empty exactly when the provider returned zero choices
/// for that prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResult {
    generations: Vec<Vec<Generation>>,
    token_usage: TokenUsage,
}

impl LlmResult {
    /// Create a result from per-prompt batches and summed usage.
    pub fn new(generations: Vec<Vec<Generation>>, token_usage: TokenUsage) -> Self {
        Self {
            generations,
            token_usage,
        }
    }

    /// All generation batches, one per input prompt, order preserved.
    pub fn generations(&self) -> &[Vec<Generation>] {
        &self.generations
    }

    /// Text of the first generation in the first batch.
    ///
    /// Fails with [`LlmError::EmptyResult`] when the first batch has no
    /// generations.
    pub fn first_generation_text(&self) -> Result<&str> {
        self.generations
            .first()
            .and_then(|batch| batch.first())
            .map(|generation| generation.text.as_str())
            .ok_or(LlmError::EmptyResult)
    }

    /// Aggregated token accounting.
    pub fn token_usage(&self) -> &TokenUsage {
        &self.token_usage
    }

    /// Provider-agnostic output summary: `{"token_usage": {...}}`.
    pub fn llm_output(&self) -> serde_json::Value {
        serde_json::json!({
            "token_usage": {
                "prompt_tokens": self.token_usage.prompt_tokens,
                "completion_tokens": self.token_usage.completion_tokens,
                "total_tokens": self.token_usage.total_tokens,
            }
        })
    }
}
