//! Document and chunk types with source metadata for citations

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Metadata key holding the source label of a document or chunk
pub const SOURCE_KEY: &str = "source";
/// Metadata key holding a chunk's character offset into its parent document
pub const START_INDEX_KEY: &str = "start_index";

/// Supported upload file types
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Plain text file
    Txt,
    /// Markdown file
    Markdown,
    /// Log file
    Log,
    /// Unknown file type
    Unknown,
}

impl FileType {
    /// Detect file type from an extension, with or without a leading dot
    pub fn from_extension(ext: &str) -> Self {
        match ext.trim_start_matches('.').to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "txt" => Self::Txt,
            "md" => Self::Markdown,
            "log" => Self::Log,
            _ => Self::Unknown,
        }
    }

    /// Check if a loader exists for this file type
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Whether the file is decoded as plain text
    pub fn is_plain_text(&self) -> bool {
        matches!(self, Self::Txt | Self::Markdown | Self::Log)
    }
}

/// A unit of ingested content produced by a loader
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Extracted text content
    pub content: String,
    /// String-keyed metadata; at minimum a `source` label once ingested
    pub metadata: HashMap<String, serde_json::Value>,
}

impl Document {
    /// Create a document with empty metadata
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: HashMap::new(),
        }
    }

    /// Create a document with metadata
    pub fn with_metadata(
        content: impl Into<String>,
        metadata: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            content: content.into(),
            metadata,
        }
    }

    /// Read the source label, if one is set
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).and_then(|v| v.as_str())
    }

    /// Set the source label only if none is present.
    ///
    /// Loader-assigned sources (e.g. per-page URLs from a crawl) are never
    /// overwritten.
    pub fn set_default_source(&mut self, label: &str) {
        self.metadata
            .entry(SOURCE_KEY.to_string())
            .or_insert_with(|| serde_json::Value::String(label.to_string()));
    }
}

/// A bounded piece of a document, the unit stored and retrieved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Text content, at most the configured chunk size in characters
    pub content: String,
    /// Metadata copied from the parent document plus `start_index`
    pub metadata: HashMap<String, serde_json::Value>,
    /// Character offset of this chunk within the parent document's text
    pub start_index: usize,
    /// Embedding vector, attached by the ingestion pipeline
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub embedding: Vec<f32>,
}

impl Chunk {
    /// Create a chunk from a parent document's metadata
    pub fn from_parent(parent: &Document, content: String, start_index: usize) -> Self {
        let mut metadata = parent.metadata.clone();
        metadata.insert(START_INDEX_KEY.to_string(), serde_json::json!(start_index));
        Self {
            id: Uuid::new_v4(),
            content,
            metadata,
            start_index,
            embedding: Vec::new(),
        }
    }

    /// Read the source label, if one is set
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).and_then(|v| v.as_str())
    }
}
