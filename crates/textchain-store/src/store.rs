//! In-memory vector storage and similarity search.
//!
//! [`SimpleVectorStore`] is a brute-force linear scan over (document,
//! embedding) pairs. The [`VectorStore`] trait is the seam: an indexed
//! implementation can replace it later without the caller noticing.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use textchain_llm::{LlmError, SharedEmbedder, cosine_similarity};

use crate::error::{Result, StoreError};

// ─────────────────────────────────────────────────────────────────────────────
// Document
// ─────────────────────────────────────────────────────────────────────────────

/// An immutable stored text with optional metadata.
///
/// Equality is structural: same text and metadata compare equal.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Document {
    /// The stored text.
    pub text: String,

    /// Free-form metadata attached at insertion time.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Document {
    /// Create a document without metadata.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: HashMap::new(),
        }
    }

    /// Create a document with metadata.
    pub fn with_metadata(
        text: impl Into<String>,
        metadata: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

/// One stored document paired with its embedding.
///
/// Entries are appended fully formed: a reader can never observe a document
/// without its embedding.
#[derive(Debug, Clone)]
struct Entry {
    document: Document,
    embedding: Vec<f32>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Vector Store Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Trait for vector store backends.
///
/// Deliberately does not expose the underlying layout, so an ANN-indexed
/// store can be swapped in behind the same contract.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Embed `texts` and append them to the store in input order.
    ///
    /// `metadatas` must be empty or the same length as `texts`.
    async fn add_texts(
        &mut self,
        texts: Vec<String>,
        metadatas: Vec<HashMap<String, serde_json::Value>>,
    ) -> Result<()>;

    /// The `min(k, len)` stored documents most similar to `query`, most
    /// similar first.
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Simple Vector Store
// ─────────────────────────────────────────────────────────────────────────────

/// Brute-force in-memory vector store.
///
/// Mutation takes `&mut self`; the store performs no internal locking.
/// Concurrent writers must serialize externally or hold separate instances.
pub struct SimpleVectorStore {
    embedder: SharedEmbedder,
    entries: Vec<Entry>,
}

impl SimpleVectorStore {
    /// Create an empty store over the given embedder.
    pub fn new(embedder: SharedEmbedder) -> Self {
        Self {
            embedder,
            entries: Vec::new(),
        }
    }

    /// Create a store pre-populated from `texts`.
    pub async fn from_texts(
        embedder: SharedEmbedder,
        texts: Vec<String>,
        metadatas: Vec<HashMap<String, serde_json::Value>>,
    ) -> Result<Self> {
        let mut store = Self::new(embedder);
        store.add_texts(texts, metadatas).await?;
        Ok(store)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dimensionality of the stored embeddings, once any entry exists.
    fn dimensions(&self) -> Option<usize> {
        self.entries.first().map(|entry| entry.embedding.len())
    }

    /// Like [`VectorStore::similarity_search`], but keeps the cosine score
    /// attached to each document.
    pub async fn similarity_search_with_score(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<(Document, f32)>> {
        if k == 0 {
            return Err(StoreError::InvalidArgument(
                "k must be a positive integer".to_string(),
            ));
        }
        // An empty store matches nothing; skip the embedding round trip.
        if self.entries.is_empty() {
            return Ok(Vec::new());
        }

        let query_embedding = self
            .embedder
            .embed(query)
            .await
            .map_err(StoreError::Embedding)?;

        let expected = self.dimensions().unwrap_or(query_embedding.len());
        if query_embedding.len() != expected {
            return Err(StoreError::DimensionMismatch {
                expected,
                actual: query_embedding.len(),
            });
        }

        let mut ranked: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, cosine_similarity(&query_embedding, &entry.embedding)))
            .collect();

        // Stable sort: equal scores keep insertion order.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);

        debug!(
            embedder = self.embedder.name(),
            k,
            returned = ranked.len(),
            "Similarity search over {} entries",
            self.entries.len()
        );

        Ok(ranked
            .into_iter()
            .map(|(i, score)| (self.entries[i].document.clone(), score))
            .collect())
    }
}

#[async_trait]
impl VectorStore for SimpleVectorStore {
    async fn add_texts(
        &mut self,
        texts: Vec<String>,
        metadatas: Vec<HashMap<String, serde_json::Value>>,
    ) -> Result<()> {
        if !metadatas.is_empty() && metadatas.len() != texts.len() {
            return Err(StoreError::InvalidArgument(format!(
                "got {} metadatas for {} texts; pass one per text or none",
                metadatas.len(),
                texts.len()
            )));
        }
        if texts.is_empty() {
            return Ok(());
        }

        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let embeddings = self
            .embedder
            .embed_batch(&refs)
            .await
            .map_err(StoreError::Embedding)?;

        if embeddings.len() != texts.len() {
            return Err(StoreError::Embedding(LlmError::UpstreamProtocol(format!(
                "expected {} embeddings, provider returned {}",
                texts.len(),
                embeddings.len()
            ))));
        }

        let mut metadatas = metadatas.into_iter();
        for (text, embedding) in texts.into_iter().zip(embeddings) {
            if let Some(expected) = self.dimensions()
                && embedding.len() != expected
            {
                return Err(StoreError::DimensionMismatch {
                    expected,
                    actual: embedding.len(),
                });
            }

            let metadata = metadatas.next().unwrap_or_default();
            self.entries.push(Entry {
                document: Document::with_metadata(text, metadata),
                embedding,
            });
        }

        debug!(
            embedder = self.embedder.name(),
            total = self.entries.len(),
            "Stored embedded texts"
        );
        Ok(())
    }

    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>> {
        Ok(self
            .similarity_search_with_score(query, k)
            .await?
            .into_iter()
            .map(|(document, _)| document)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use textchain_llm::{Embedder, MockEmbedder};

    use super::*;

    /// Test embedder with hand-picked vectors per text.
    struct FixedEmbedder {
        vectors: HashMap<String, Vec<f32>>,
        dimensions: usize,
    }

    impl FixedEmbedder {
        fn new(pairs: &[(&str, &[f32])]) -> Self {
            let vectors: HashMap<String, Vec<f32>> = pairs
                .iter()
                .map(|(text, vector)| (text.to_string(), vector.to_vec()))
                .collect();
            let dimensions = pairs.first().map_or(0, |(_, v)| v.len());
            Self {
                vectors,
                dimensions,
            }
        }
    }

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, text: &str) -> textchain_llm::Result<Vec<f32>> {
            self.vectors.get(text).cloned().ok_or_else(|| {
                LlmError::EmbeddingProvider(format!("no fixture vector for '{text}'"))
            })
        }

        fn dimensions(&self) -> usize {
            self.dimensions
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_ranked_by_descending_similarity() {
        let embedder = Arc::new(FixedEmbedder::new(&[
            ("north", &[1.0, 0.0, 0.0]),
            ("northish", &[0.9, 0.1, 0.0]),
            ("east", &[0.0, 0.0, 1.0]),
        ]));
        let mut store = SimpleVectorStore::new(embedder);
        store
            .add_texts(texts(&["east", "northish", "north"]), vec![])
            .await
            .unwrap();

        let results = store.similarity_search("north", 3).await.unwrap();
        let ordered: Vec<&str> = results.iter().map(|d| d.text.as_str()).collect();
        assert_eq!(ordered, vec!["north", "northish", "east"]);
    }

    #[tokio::test]
    async fn test_scores_are_non_increasing() {
        let embedder = Arc::new(MockEmbedder::new(32));
        let store = SimpleVectorStore::from_texts(
            embedder,
            texts(&["alpha", "beta", "gamma", "delta"]),
            vec![],
        )
        .await
        .unwrap();

        let scored = store
            .similarity_search_with_score("alpha", 4)
            .await
            .unwrap();
        assert_eq!(scored.len(), 4);
        assert_eq!(scored[0].0.text, "alpha");
        assert!((scored[0].1 - 1.0).abs() < 1e-4);
        for window in scored.windows(2) {
            assert!(window[0].1 >= window[1].1);
        }
    }

    #[tokio::test]
    async fn test_ties_keep_insertion_order() {
        let embedder = Arc::new(FixedEmbedder::new(&[
            ("first", &[0.0, 1.0]),
            ("second", &[0.0, 1.0]),
            ("query", &[0.0, 1.0]),
        ]));
        let mut store = SimpleVectorStore::new(embedder);
        store
            .add_texts(texts(&["first", "second"]), vec![])
            .await
            .unwrap();

        let results = store.similarity_search("query", 2).await.unwrap();
        assert_eq!(results[0].text, "first");
        assert_eq!(results[1].text, "second");
    }

    #[tokio::test]
    async fn test_zero_vector_scores_zero_not_nan() {
        let embedder = Arc::new(FixedEmbedder::new(&[
            ("aligned", &[1.0, 0.0]),
            ("null", &[0.0, 0.0]),
            ("query", &[1.0, 0.0]),
        ]));
        let mut store = SimpleVectorStore::new(embedder);
        store
            .add_texts(texts(&["null", "aligned"]), vec![])
            .await
            .unwrap();

        let scored = store.similarity_search_with_score("query", 2).await.unwrap();
        assert_eq!(scored[0].0.text, "aligned");
        assert_eq!(scored[1].0.text, "null");
        assert_eq!(scored[1].1, 0.0);
    }

    #[tokio::test]
    async fn test_k_zero_is_invalid_argument() {
        let store = SimpleVectorStore::new(Arc::new(MockEmbedder::new(8)));
        let err = store.similarity_search("anything", 0).await.unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_metadata_length_mismatch_is_invalid_argument() {
        let mut store = SimpleVectorStore::new(Arc::new(MockEmbedder::new(8)));
        let err = store
            .add_texts(texts(&["a", "b"]), vec![HashMap::new()])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_query_dimension_mismatch() {
        let embedder = Arc::new(FixedEmbedder::new(&[
            ("stored", &[1.0, 0.0, 0.0]),
            ("query", &[1.0, 0.0]),
        ]));
        let mut store = SimpleVectorStore::new(embedder);
        store.add_texts(texts(&["stored"]), vec![]).await.unwrap();

        let err = store.similarity_search("query", 1).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }

    #[tokio::test]
    async fn test_metadata_round_trips_through_search() {
        let mut metadata = HashMap::new();
        metadata.insert("source".to_string(), serde_json::json!("unit-test"));

        let mut store = SimpleVectorStore::new(Arc::new(MockEmbedder::new(16)));
        store
            .add_texts(texts(&["tagged"]), vec![metadata.clone()])
            .await
            .unwrap();

        let results = store.similarity_search("tagged", 1).await.unwrap();
        assert_eq!(results[0], Document::with_metadata("tagged", metadata));
    }

    #[tokio::test]
    async fn test_embedder_failure_propagates() {
        let embedder = Arc::new(FixedEmbedder::new(&[("known", &[1.0])]));
        let mut store = SimpleVectorStore::new(embedder);
        let err = store.add_texts(texts(&["unknown"]), vec![]).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Embedding(LlmError::EmbeddingProvider(_))
        ));
    }
}
