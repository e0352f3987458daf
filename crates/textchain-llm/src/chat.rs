//! The chat LLM: prompt batching, response normalization, usage accounting.
//!
//! [`OpenAiChat`] resolves its model identifier at construction time and
//! talks to an injected [`ChatBackend`], so misconfiguration surfaces before
//! any provider call and tests can substitute a scripted backend.

use std::collections::BTreeMap;
use std::fmt;

use crate::backend::SharedChatBackend;
use crate::error::{LlmError, Result};
use crate::model::ChatModel;
use crate::result::{Generation, LlmResult};
use crate::types::{ChatMessage, ChatRequest, TokenUsage};

/// A chat completion LLM over an injected backend.
pub struct OpenAiChat {
    backend: SharedChatBackend,
    model: ChatModel,
    model_kwargs: BTreeMap<String, serde_json::Value>,
}

impl OpenAiChat {
    /// Create a chat LLM, resolving `model` immediately.
    ///
    /// `None` selects the standard tier; an unrecognized identifier fails
    /// with [`LlmError::UnsupportedModel`] here, before any network call.
    pub fn new(backend: SharedChatBackend, model: Option<&str>) -> Result<Self> {
        Ok(Self {
            backend,
            model: ChatModel::resolve(model)?,
            model_kwargs: BTreeMap::new(),
        })
    }

    /// Create a chat LLM from an already-resolved model.
    pub fn with_model(backend: SharedChatBackend, model: ChatModel) -> Self {
        Self {
            backend,
            model,
            model_kwargs: BTreeMap::new(),
        }
    }

    /// Set free-form provider options forwarded with every request.
    pub fn with_model_kwargs(mut self, kwargs: BTreeMap<String, serde_json::Value>) -> Self {
        self.model_kwargs = kwargs;
        self
    }

    /// The resolved model.
    pub fn model(&self) -> ChatModel {
        self.model
    }

    /// Run one completion per prompt and normalize into an [`LlmResult`].
    ///
    /// Provider calls are issued sequentially in prompt order; batches in the
    /// result are parallel to `prompts`. A response without a choice list or
    /// with an incomplete usage record fails the whole call with
    /// [`LlmError::UpstreamProtocol`]; usage is never silently defaulted.
    pub async fn generate(&self, prompts: &[&str], stop: Option<&[String]>) -> Result<LlmResult> {
        if prompts.is_empty() {
            return Err(LlmError::InvalidArgument(
                "prompts must be a non-empty sequence".to_string(),
            ));
        }

        let mut generations = Vec::with_capacity(prompts.len());
        let mut token_usage = TokenUsage::default();

        for prompt in prompts {
            let mut request =
                ChatRequest::new(self.model.as_str(), vec![ChatMessage::user(*prompt)])
                    .with_extra(self.model_kwargs.clone());
            if let Some(stop) = stop {
                request = request.with_stop(stop.to_vec());
            }

            let response = self.backend.complete(request).await?;

            let batch = response
                .choices()?
                .iter()
                .map(Generation::from_choice)
                .collect::<Result<Vec<_>>>()?;
            token_usage.accumulate(response.token_usage()?);

            tracing::debug!(
                backend = %self.backend.name(),
                model = %self.model,
                choices = batch.len(),
                "Normalized completion response"
            );

            generations.push(batch);
        }

        Ok(LlmResult::new(generations, token_usage))
    }

    /// Single-prompt shorthand: `generate([prompt])` then the first text.
    pub async fn call(&self, prompt: &str) -> Result<String> {
        let result = self.generate(&[prompt], None).await?;
        Ok(result.first_generation_text()?.to_string())
    }

    /// Deterministic serialization of the resolved configuration:
    /// `{"model_name": ..., "model_kwargs": {...}}`.
    pub fn to_array(&self) -> serde_json::Value {
        serde_json::json!({
            "model_name": self.model.as_str(),
            "model_kwargs": self.model_kwargs,
        })
    }
}

impl fmt::Debug for OpenAiChat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiChat")
            .field("backend", &self.backend.name())
            .field("model", &self.model)
            .field("model_kwargs", &self.model_kwargs)
            .finish()
    }
}
