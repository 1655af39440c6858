//! Chat completion provider trait

use async_trait::async_trait;

use crate::error::Result;

/// Trait for single-turn chat completion
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Run one completion with a system and a user message, returning the
    /// assistant's text
    async fn complete(&self, system: &str, user: &str) -> Result<String>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Deployment or model identifier in use
    fn model(&self) -> &str;
}
