//! rag-qa: retrieval-augmented question answering with cited answers
//!
//! Documents (PDF, plain text, crawled web pages) are split into overlapping
//! chunks, embedded, and stored in a persistent vector collection. Questions
//! are answered by retrieving the most similar chunks and asking a chat model
//! for an answer grounded strictly in that context, with inline `[source]`
//! citations.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod qa;
pub mod retrieval;
pub mod server;
pub mod storage;
pub mod types;

pub use config::AppConfig;
pub use error::{Error, Result};
pub use types::document::{Chunk, Document};
