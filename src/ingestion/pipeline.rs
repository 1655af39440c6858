//! Write-side pipeline: tag, chunk, embed, store

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;
use crate::storage::VectorStore;
use crate::types::document::Document;

use super::chunker::TextSplitter;

/// Ingestion pipeline persisting documents into the vector collection
pub struct IngestPipeline {
    splitter: TextSplitter,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<VectorStore>,
}

impl IngestPipeline {
    /// Create a new pipeline
    pub fn new(
        splitter: TextSplitter,
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<VectorStore>,
    ) -> Self {
        Self {
            splitter,
            embedder,
            store,
        }
    }

    /// Ingest a batch of documents under a source label, returning the total
    /// number of chunks written.
    ///
    /// Each document gets `source = source_label` only if its loader did not
    /// already tag one. The whole batch is chunked once after tagging, then
    /// embedded and stored together; the count covers every document, not
    /// just the first.
    pub async fn ingest(&self, mut documents: Vec<Document>, source_label: &str) -> Result<usize> {
        for document in &mut documents {
            document.set_default_source(source_label);
        }

        let mut chunks = self.splitter.split_documents(&documents);
        if chunks.is_empty() {
            tracing::info!("ingest of '{}' produced no chunks", source_label);
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            return Err(Error::embedding(format!(
                "provider returned {} embeddings for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }
        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        let store = Arc::clone(&self.store);
        let written = tokio::task::spawn_blocking(move || store.add(&chunks))
            .await
            .map_err(|e| Error::internal(format!("task join error: {}", e)))??;

        tracing::info!(
            "ingested {} chunks from {} documents under '{}'",
            written,
            documents.len(),
            source_label
        );
        Ok(written)
    }
}
