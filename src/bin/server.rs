//! Question-answering server binary
//!
//! Run with: cargo run --bin rag-qa-server

use rag_qa::{config::AppConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rag_qa=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    tracing::info!("configuration loaded");
    tracing::info!("  - embeddings deployment: {}", config.azure.embeddings_deployment);
    tracing::info!("  - chat deployment: {}", config.azure.chat_deployment);
    tracing::info!("  - chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - top_k: {}", config.query.top_k);
    tracing::info!("  - persist dir: {}", config.store.persist_dir.display());

    let server = RagServer::new(config)?;

    println!("RAG QA server starting on http://{}", server.address());
    println!("Endpoints:");
    println!("  POST /ingest/file - upload a PDF or text file");
    println!("  POST /ingest/url  - ingest a web page");
    println!("  POST /ask         - ask a question");
    println!("  GET  /            - liveness check");

    server.start().await?;

    Ok(())
}
