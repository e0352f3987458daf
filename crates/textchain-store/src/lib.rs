//! In-memory semantic store for textchain.
//!
//! Pairs each stored text with its embedding and retrieves the k most
//! similar stored documents for a query via cosine similarity. The embedding
//! provider is injected through the [`Embedder`](textchain_llm::Embedder)
//! contract from `textchain-llm`.
//!
//! ```no_run
//! use std::sync::Arc;
//! use textchain_llm::MockEmbedder;
//! use textchain_store::{SimpleVectorStore, VectorStore};
//!
//! # async fn run() -> textchain_store::Result<()> {
//! let mut store = SimpleVectorStore::new(Arc::new(MockEmbedder::default()));
//! store.add_texts(vec!["foo bar baz".to_string()], vec![]).await?;
//! let hits = store.similarity_search("foo bar baz", 1).await?;
//! assert_eq!(hits[0].text, "foo bar baz");
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::{Document, SimpleVectorStore, VectorStore};
