//! Request types for the HTTP surface

use serde::{Deserialize, Serialize};

/// Request body for `POST /ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question to answer
    pub question: String,
}

/// Form body for `POST /ingest/url`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestUrlForm {
    /// URL to fetch and ingest
    pub url: String,
}
