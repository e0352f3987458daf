//! Error types for the LLM crate.

use thiserror::Error;

/// Result type alias using the LLM error type.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Error type for LLM operations.
///
/// Provider failures ([`LlmError::EmbeddingProvider`],
/// [`LlmError::CompletionProvider`]) are opaque: the adapter folds the
/// transport or API failure into the message and the core propagates it
/// without retrying. Retry and backoff policy belongs to the caller.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Caller violated a precondition (empty prompt list, bad batch shape).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Requested model identifier is outside the recognized set.
    ///
    /// Raised at configuration time, before any provider call is made.
    #[error("Unsupported model '{requested}', expected one of: {supported}")]
    UnsupportedModel {
        /// The identifier the caller asked for.
        requested: String,
        /// Comma-separated canonical identifiers.
        supported: String,
    },

    /// Embedding provider failed (network, auth, rate limit).
    #[error("Embedding provider error: {0}")]
    EmbeddingProvider(String),

    /// Completion provider failed (network, auth, rate limit).
    #[error("Completion provider error: {0}")]
    CompletionProvider(String),

    /// A provider response is missing fields the aggregation model needs.
    ///
    /// Surfaced rather than defaulted so usage accounting never silently
    /// under-reports.
    #[error("Upstream protocol violation: {0}")]
    UpstreamProtocol(String),

    /// Caller asked for the first generation of a batch that has none.
    #[error("Result contains no generations")]
    EmptyResult,

    /// Configuration error (API key missing, client construction failed).
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LlmError {
    /// Create an unsupported-model error listing the recognized identifiers.
    pub fn unsupported_model(requested: impl Into<String>, supported: &[&str]) -> Self {
        Self::UnsupportedModel {
            requested: requested.into(),
            supported: supported.join(", "),
        }
    }

    /// Create an upstream-protocol error for a missing response field.
    pub fn missing_field(field: &str) -> Self {
        Self::UpstreamProtocol(format!("response is missing required field '{field}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_model_lists_alternatives() {
        let err = LlmError::unsupported_model("davinci", &["gpt-3.5-turbo", "gpt-4"]);
        let msg = err.to_string();
        assert!(msg.contains("davinci"));
        assert!(msg.contains("gpt-3.5-turbo, gpt-4"));
    }

    #[test]
    fn test_missing_field_names_the_field() {
        let err = LlmError::missing_field("usage");
        assert!(err.to_string().contains("'usage'"));
        assert!(matches!(err, LlmError::UpstreamProtocol(_)));
    }

    #[test]
    fn test_empty_result_display() {
        assert_eq!(
            LlmError::EmptyResult.to_string(),
            "Result contains no generations"
        );
    }
}
