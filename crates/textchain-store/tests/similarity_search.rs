//! End-to-end store scenarios against the deterministic mock embedder.

use std::sync::Arc;

use textchain_llm::MockEmbedder;
use textchain_store::{Document, SimpleVectorStore, VectorStore};

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn stored_text_retrieves_itself() {
    let mut store = SimpleVectorStore::new(Arc::new(MockEmbedder::default()));
    store.add_texts(texts(&["foo bar baz"]), vec![]).await.unwrap();

    let results = store.similarity_search("foo bar baz", 1).await.unwrap();
    assert_eq!(results, vec![Document::new("foo bar baz")]);
}

#[tokio::test]
async fn first_inserted_text_wins_self_similarity() {
    let corpus = ["the quick brown fox", "a lazy dog", "lorem ipsum"];
    let mut store = SimpleVectorStore::new(Arc::new(MockEmbedder::default()));
    store.add_texts(texts(&corpus), vec![]).await.unwrap();

    let results = store.similarity_search(corpus[0], 1).await.unwrap();
    assert_eq!(results, vec![Document::new(corpus[0])]);
}

#[tokio::test]
async fn result_length_is_min_of_k_and_store_size() {
    let mut store = SimpleVectorStore::new(Arc::new(MockEmbedder::default()));
    store
        .add_texts(texts(&["one", "two", "three"]), vec![])
        .await
        .unwrap();
    assert_eq!(store.len(), 3);

    let two = store.similarity_search("one", 2).await.unwrap();
    assert_eq!(two.len(), 2);

    let all = store.similarity_search("one", 10).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn repeated_search_is_idempotent() {
    let mut store = SimpleVectorStore::new(Arc::new(MockEmbedder::default()));
    store
        .add_texts(texts(&["alpha", "beta", "gamma"]), vec![])
        .await
        .unwrap();

    let first = store.similarity_search("beta", 3).await.unwrap();
    let second = store.similarity_search("beta", 3).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn empty_store_returns_empty_never_errors() {
    let store = SimpleVectorStore::new(Arc::new(MockEmbedder::default()));
    let results = store.similarity_search("anything", 5).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn search_reflects_later_insertions() {
    let mut store = SimpleVectorStore::new(Arc::new(MockEmbedder::default()));
    store.add_texts(texts(&["early"]), vec![]).await.unwrap();
    store.add_texts(texts(&["late"]), vec![]).await.unwrap();

    let results = store.similarity_search("late", 1).await.unwrap();
    assert_eq!(results, vec![Document::new("late")]);
}
