//! Core types for documents, chunks, and the HTTP wire format

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, Document, FileType};
pub use query::AskRequest;
pub use response::{AskResponse, IngestResponse};
