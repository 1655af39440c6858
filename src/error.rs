//! Error types for the question-answering service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, Error>;

/// Service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (missing or invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed client request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Upload with an extension no loader handles
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// File could not be parsed into text
    #[error("Failed to parse file: {0}")]
    FileParse(String),

    /// Embedding provider failure
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Chat model failure during answer generation
    #[error("Answer generation failed: {0}")]
    Generation(String),

    /// Vector store persistence failure
    #[error("Vector store error: {0}")]
    Storage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Client-facing errors carry their message; server-side failures are
        // logged in full but reported with a generic body so provider
        // credentials and local paths never reach the wire.
        let (status, message) = match &self {
            Error::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::UnsupportedFileType(ext) => (
                StatusCode::BAD_REQUEST,
                format!("Unsupported file type: {}", ext),
            ),
            Error::FileParse(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Failed to parse file: {}", msg),
            ),
            Error::Embedding(msg) => {
                tracing::error!("embedding provider failure: {}", msg);
                (StatusCode::BAD_GATEWAY, "embedding provider request failed".to_string())
            }
            Error::Generation(msg) => {
                tracing::error!("generation failure: {}", msg);
                (StatusCode::BAD_GATEWAY, "answer generation failed".to_string())
            }
            Error::Http(err) => {
                tracing::error!("upstream request failure: {}", err);
                (StatusCode::BAD_GATEWAY, "upstream request failed".to_string())
            }
            Error::Storage(msg) => {
                tracing::error!("vector store failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "vector store failure".to_string())
            }
            Error::Config(msg) => {
                tracing::error!("configuration failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
            Error::Io(err) => {
                tracing::error!("io failure: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
            Error::Json(err) => {
                tracing::error!("serialization failure: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
            Error::Internal(msg) => {
                tracing::error!("internal failure: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_file_type_message_includes_extension() {
        let err = Error::UnsupportedFileType(".csv".to_string());
        assert_eq!(err.to_string(), "Unsupported file type: .csv");
    }
}
