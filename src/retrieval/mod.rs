//! Read-side retrieval over the vector collection

pub mod search;

pub use search::Retriever;
