//! Provider abstractions for embeddings and chat completion
//!
//! Trait seams keep the pipeline independent of the concrete backend; the
//! shipped implementation is Azure OpenAI, and tests substitute
//! deterministic in-process providers.

pub mod azure;
pub mod chat;
pub mod embedding;

pub use azure::AzureOpenAiClient;
pub use chat::ChatProvider;
pub use embedding::EmbeddingProvider;
