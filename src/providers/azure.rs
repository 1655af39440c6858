//! Azure OpenAI client implementing the embedding and chat provider traits
//!
//! One client serves both deployments. Requests are single-shot: failures
//! map to the embedding/generation error classes and propagate to the
//! caller without retries.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AzureOpenAiConfig;
use crate::error::{Error, Result};

use super::chat::ChatProvider;
use super::embedding::EmbeddingProvider;

/// Answers are deterministic-leaning: temperature pinned to zero, no
/// sampling overrides.
const GENERATION_TEMPERATURE: f32 = 0.0;

/// Azure OpenAI REST client
pub struct AzureOpenAiClient {
    client: Client,
    config: AzureOpenAiConfig,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    index: usize,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

impl AzureOpenAiClient {
    /// Create a new client from configuration
    pub fn new(config: &AzureOpenAiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn deployment_url(&self, deployment: &str, operation: &str) -> String {
        format!(
            "{}/openai/deployments/{}/{}?api-version={}",
            self.config.endpoint.trim_end_matches('/'),
            deployment,
            operation,
            self.config.api_version
        )
    }

    async fn post<B: Serialize, T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        body: &B,
        map_err: fn(String) -> Error,
    ) -> Result<T> {
        let response = self
            .client
            .post(url)
            .header("api-key", &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| map_err(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_err(format!("HTTP {} - {}", status, body)));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| map_err(format!("failed to parse response: {}", e)))
    }
}

#[async_trait]
impl EmbeddingProvider for AzureOpenAiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let input = [text.to_string()];
        let mut embeddings = self.embed_batch(&input).await?;
        embeddings
            .pop()
            .ok_or_else(|| Error::embedding("provider returned no embedding"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.deployment_url(&self.config.embeddings_deployment, "embeddings");
        let request = EmbeddingRequest { input: texts };

        let mut response: EmbeddingResponse = self.post(&url, &request, Error::Embedding).await?;

        if response.data.len() != texts.len() {
            return Err(Error::embedding(format!(
                "provider returned {} embeddings for {} inputs",
                response.data.len(),
                texts.len()
            )));
        }

        // The API does not guarantee response order; the index field does.
        response.data.sort_by_key(|d| d.index);
        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }

    fn name(&self) -> &str {
        "azure-openai"
    }
}

#[async_trait]
impl ChatProvider for AzureOpenAiClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let url = self.deployment_url(&self.config.chat_deployment, "chat/completions");
        let request = ChatRequest {
            messages: vec![
                ChatMessage { role: "system", content: system },
                ChatMessage { role: "user", content: user },
            ],
            temperature: GENERATION_TEMPERATURE,
        };

        tracing::info!("generating answer with deployment: {}", self.config.chat_deployment);

        let response: ChatResponse = self.post(&url, &request, Error::Generation).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::generation("provider response contained no message content"))
    }

    fn name(&self) -> &str {
        "azure-openai"
    }

    fn model(&self) -> &str {
        &self.config.chat_deployment
    }
}
