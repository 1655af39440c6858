//! Configuration for the question-answering service
//!
//! Populated once at startup from environment variables and validated
//! eagerly, so missing provider credentials fail the process at boot instead
//! of inside the first request.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Azure OpenAI provider configuration
    pub azure: AzureOpenAiConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Vector store configuration
    pub store: StoreConfig,
    /// Query configuration
    pub query: QueryConfig,
}

impl AppConfig {
    /// Build configuration from the environment and validate it
    pub fn from_env() -> Result<Self> {
        let config = Self {
            server: ServerConfig::from_env(),
            azure: AzureOpenAiConfig::from_env(),
            chunking: ChunkingConfig::default(),
            store: StoreConfig::from_env(),
            query: QueryConfig::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that every required setting is present
    pub fn validate(&self) -> Result<()> {
        let mut missing = Vec::new();
        if self.azure.api_key.is_empty() {
            missing.push("AZURE_OPENAI_API_KEY");
        }
        if self.azure.endpoint.is_empty() {
            missing.push("AZURE_OPENAI_ENDPOINT");
        }
        if self.azure.embeddings_deployment.is_empty() {
            missing.push("AZURE_OPENAI_EMBEDDINGS_DEPLOYMENT");
        }
        if self.azure.chat_deployment.is_empty() {
            missing.push("AZURE_OPENAI_CHAT_DEPLOYMENT");
        }
        if !missing.is_empty() {
            return Err(Error::Config(format!(
                "missing required environment variables: {}",
                missing.join(", ")
            )));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::Config(
                "chunk_overlap must be smaller than chunk_size".to_string(),
            ));
        }
        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Maximum upload size in bytes
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_size: 50 * 1024 * 1024, // 50MB
        }
    }
}

impl ServerConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("RAG_HOST").unwrap_or(defaults.host),
            port: env::var("RAG_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            max_upload_size: defaults.max_upload_size,
        }
    }
}

/// Azure OpenAI configuration for both the embeddings and the chat deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AzureOpenAiConfig {
    /// API key
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,
    /// API version query parameter
    pub api_version: String,
    /// Deployment name used for embeddings
    pub embeddings_deployment: String,
    /// Deployment name used for chat completions
    pub chat_deployment: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for AzureOpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: String::new(),
            api_version: "2024-06-01".to_string(),
            embeddings_deployment: String::new(),
            chat_deployment: String::new(),
            timeout_secs: 60,
        }
    }
}

impl AzureOpenAiConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var("AZURE_OPENAI_API_KEY").unwrap_or_default(),
            endpoint: env::var("AZURE_OPENAI_ENDPOINT").unwrap_or_default(),
            api_version: env::var("AZURE_OPENAI_API_VERSION").unwrap_or(defaults.api_version),
            embeddings_deployment: env::var("AZURE_OPENAI_EMBEDDINGS_DEPLOYMENT")
                .unwrap_or_default(),
            chat_deployment: env::var("AZURE_OPENAI_CHAT_DEPLOYMENT").unwrap_or_default(),
            timeout_secs: env::var("RAG_HTTP_TIMEOUT_SECS")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.timeout_secs),
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum chunk size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1200,
            chunk_overlap: 200,
        }
    }
}

/// Vector store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the persistent collection
    pub persist_dir: PathBuf,
    /// Collection name
    pub collection_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            persist_dir: PathBuf::from("../data/chroma"),
            collection_name: "rag_collection".to_string(),
        }
    }
}

impl StoreConfig {
    fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            persist_dir: env::var("CHROMA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.persist_dir),
            collection_name: defaults.collection_name,
        }
    }
}

/// Query configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Number of chunks retrieved per question
    pub top_k: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self { top_k: 5 }
    }
}

impl QueryConfig {
    fn from_env() -> Result<Self> {
        let top_k = match env::var("TOP_K") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| Error::Config(format!("TOP_K must be an integer, got '{}'", raw)))?,
            Err(_) => Self::default().top_k,
        };
        Ok(Self { top_k })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> AppConfig {
        let mut config = AppConfig::default();
        config.azure.api_key = "key".into();
        config.azure.endpoint = "https://example.openai.azure.com".into();
        config.azure.embeddings_deployment = "embed".into();
        config.azure.chat_deployment = "chat".into();
        config
    }

    #[test]
    fn validate_rejects_missing_credentials() {
        let err = AppConfig::default().validate().unwrap_err();
        assert!(err.to_string().contains("AZURE_OPENAI_API_KEY"));
    }

    #[test]
    fn validate_accepts_populated_config() {
        assert!(populated().validate().is_ok());
    }

    #[test]
    fn validate_rejects_overlap_at_least_chunk_size() {
        let mut config = populated();
        config.chunking.chunk_overlap = config.chunking.chunk_size;
        assert!(config.validate().is_err());
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = AppConfig::default();
        assert_eq!(config.chunking.chunk_size, 1200);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.query.top_k, 5);
        assert_eq!(config.store.collection_name, "rag_collection");
    }
}
