//! Chat completion and embedding provider abstractions for textchain.
//!
//! This crate provides the two collaborator contracts the rest of textchain
//! builds on, plus the generation result model that normalizes raw provider
//! output into a uniform, rankable shape.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  OpenAiChat                                  │
//! │  - generate() -> LlmResult                   │
//! │  - call()     -> String                      │
//! └──────────────────────┬───────────────────────┘
//!                        │ ChatBackend trait
//!          ┌─────────────┴─────────────┐
//!          ▼                           ▼
//! ┌──────────────────┐       ┌──────────────────┐
//! │ OpenAiChatBackend│       │  MockChatBackend │
//! └──────────────────┘       └──────────────────┘
//! ```
//!
//! The [`Embedder`] trait is the same seam for embedding providers; the
//! vector store in `textchain-store` consumes it.

pub mod backend;
pub mod chat;
pub mod embeddings;
pub mod error;
pub mod model;
pub mod openai;
pub mod result;
pub mod types;

pub use backend::{ChatBackend, MockChatBackend, SharedChatBackend};
pub use chat::OpenAiChat;
pub use embeddings::{
    Embedder, MockEmbedder, OpenAiEmbedder, OpenAiEmbedderConfig, SharedEmbedder,
    cosine_similarity,
};
pub use error::{LlmError, Result};
pub use model::ChatModel;
pub use openai::{OpenAiChatBackend, OpenAiConfig};
pub use result::{Generation, LlmResult};
pub use types::{
    ChatChoice, ChatMessage, ChatRequest, ChatResponse, ChatUsage, ChoiceMessage, Role, TokenUsage,
};
