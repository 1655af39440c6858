//! Response types for the HTTP surface

use serde::{Deserialize, Serialize};

/// Response from `POST /ingest/file` and `POST /ingest/url`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    /// Number of chunks written to the vector store
    pub ingested_chunks: usize,
    /// Source label the chunks were tagged with
    pub source: String,
}

/// Response from `POST /ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Generated answer text
    pub answer: String,
    /// Distinct source labels of the retrieved chunks, first-seen order
    pub sources: Vec<String>,
}

/// Response from `GET /`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Liveness marker
    pub status: String,
}

impl StatusResponse {
    /// The healthy liveness response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}
