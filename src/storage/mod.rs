//! Durable storage for the vector collection

pub mod vector_store;

pub use vector_store::{ScoredChunk, VectorStore};
