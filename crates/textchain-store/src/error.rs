//! Error types for the store crate.

use thiserror::Error;

use textchain_llm::LlmError;

/// Errors that can occur in vector store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Caller violated a precondition (`k == 0`, batch length mismatch).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An embedding's dimensionality disagrees with the stored entries.
    #[error("Embedding dimension mismatch: store holds {expected}-dim vectors, got {actual}")]
    DimensionMismatch {
        /// Dimensionality of every entry already in the store.
        expected: usize,
        /// Dimensionality of the offending vector.
        actual: usize,
    },

    /// The embedding provider failed; propagated unchanged.
    #[error(transparent)]
    Embedding(#[from] LlmError),
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_names_both_sizes() {
        let err = StoreError::DimensionMismatch {
            expected: 384,
            actual: 512,
        };
        let msg = err.to_string();
        assert!(msg.contains("384"));
        assert!(msg.contains("512"));
    }

    #[test]
    fn test_provider_error_passes_through_transparently() {
        let inner = LlmError::EmbeddingProvider("connection reset".to_string());
        let expected = inner.to_string();
        let err: StoreError = inner.into();
        assert_eq!(err.to_string(), expected);
    }
}
