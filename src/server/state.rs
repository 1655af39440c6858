//! Application state for the HTTP server

use std::sync::Arc;

use crate::config::AppConfig;
use crate::error::Result;
use crate::generation::AnswerGenerator;
use crate::ingestion::{IngestPipeline, TextSplitter};
use crate::providers::AzureOpenAiClient;
use crate::qa::QueryEngine;
use crate::retrieval::Retriever;
use crate::storage::VectorStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pipeline: IngestPipeline,
    query_engine: QueryEngine,
    /// Client used to fetch pages for URL ingestion
    fetch_client: reqwest::Client,
}

impl AppState {
    /// Create new application state from validated configuration
    pub fn new(config: AppConfig) -> Result<Self> {
        tracing::info!("initializing application state");

        let store = Arc::new(VectorStore::open_or_create(
            &config.store.persist_dir,
            &config.store.collection_name,
        )?);
        tracing::info!(
            "vector store opened (collection: {}, dir: {})",
            config.store.collection_name,
            config.store.persist_dir.display()
        );

        let azure = Arc::new(AzureOpenAiClient::new(&config.azure)?);
        let splitter = TextSplitter::from_config(&config.chunking);

        let pipeline = IngestPipeline::new(splitter, azure.clone(), Arc::clone(&store));
        let retriever = Retriever::new(Arc::clone(&store), azure.clone(), config.query.top_k);
        let query_engine = QueryEngine::new(retriever, AnswerGenerator::new(azure));

        let fetch_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.azure.timeout_secs))
            .build()
            .map_err(|e| crate::error::Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pipeline,
                query_engine,
                fetch_client,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get the ingestion pipeline
    pub fn pipeline(&self) -> &IngestPipeline {
        &self.inner.pipeline
    }

    /// Get the query engine
    pub fn query_engine(&self) -> &QueryEngine {
        &self.inner.query_engine
    }

    /// Get the page-fetch client
    pub fn fetch_client(&self) -> &reqwest::Client {
        &self.inner.fetch_client
    }
}
