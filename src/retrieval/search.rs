//! Fixed top-k similarity retrieval

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::storage::{ScoredChunk, VectorStore};

/// Retriever wrapping the vector store with a fixed top-k query.
///
/// Every call re-embeds the question and re-queries the store; nothing is
/// cached.
pub struct Retriever {
    store: Arc<VectorStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    top_k: usize,
}

impl Retriever {
    /// Create a new retriever
    pub fn new(store: Arc<VectorStore>, embedder: Arc<dyn EmbeddingProvider>, top_k: usize) -> Self {
        Self {
            store,
            embedder,
            top_k,
        }
    }

    /// Retrieve the chunks most similar to the question, most similar first
    pub async fn retrieve(&self, question: &str) -> Result<Vec<ScoredChunk>> {
        let embedding = self.embedder.embed(question).await?;

        let store = Arc::clone(&self.store);
        let top_k = self.top_k;
        let results = tokio::task::spawn_blocking(move || store.similarity_search(&embedding, top_k))
            .await
            .map_err(|e| Error::internal(format!("task join error: {}", e)))??;

        tracing::debug!("retrieved {} chunks for question", results.len());
        Ok(results)
    }

    /// Configured number of chunks per query
    pub fn top_k(&self) -> usize {
        self.top_k
    }
}
