//! Ollama Embedding Provider
//!
//! Provides semantic embeddings via Ollama's local API using models like
//! nomic-embed-text. Ollama embeds one text per request, so batches are sent
//! as a bounded number of concurrent requests whose results keep input order.

use crate::embeddings::EmbeddingConfig;
use crate::embeddings::EmbeddingProvider;
use async_trait::async_trait;
use docqa_core::AppError;
use futures::{StreamExt, TryStreamExt};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Ollama API endpoint for embeddings
const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const EMBEDDING_ENDPOINT: &str = "/api/embeddings";

/// Ollama embedding provider using local API
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    /// HTTP client for API requests
    client: Client,
    /// Ollama API base URL
    base_url: String,
    /// Model name (e.g., "nomic-embed-text")
    model: String,
    /// Expected embedding dimensions
    dimensions: usize,
    /// Maximum in-flight requests per batch
    concurrency: usize,
}

/// Request payload for Ollama embeddings API
#[derive(Debug, Clone, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

/// Response from Ollama embeddings API
#[derive(Debug, Clone, Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

/// Error response from Ollama API
#[derive(Debug, Clone, Deserialize)]
struct ErrorResponse {
    error: String,
}

impl OllamaProvider {
    /// Create new Ollama provider with configuration.
    ///
    /// No request is made here; an unreachable server surfaces on first use.
    pub fn new(config: &EmbeddingConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::Llm(format!("Failed to create HTTP client for Ollama: {}", e))
            })?;

        let base_url = config
            .endpoint
            .clone()
            .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            dimensions: config.dimensions,
            concurrency: config.concurrency.max(1),
        })
    }

    /// Embed single text
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    async fn embed_single(&self, text: &str) -> Result<Vec<f32>, AppError> {
        // Ollama rejects empty prompts; blank text carries no signal anyway
        if text.trim().is_empty() {
            return Ok(vec![0.0; self.dimensions]);
        }

        let url = format!("{}{}", self.base_url, EMBEDDING_ENDPOINT);
        let request = EmbeddingRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to Ollama: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_text) {
                return Err(AppError::Llm(format!(
                    "Ollama API error ({}): {}",
                    status, error_response.error
                )));
            }

            return Err(AppError::Llm(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        let response_body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse Ollama response: {}", e)))?;

        if response_body.embedding.len() != self.dimensions {
            return Err(AppError::Llm(format!(
                "Ollama model '{}' returned {} dimensions, expected {}",
                self.model,
                response_body.embedding.len(),
                self.dimensions
            )));
        }

        Ok(response_body.embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaProvider {
    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    #[instrument(
        skip(self, texts),
        fields(batch_size = texts.len(), provider = "ollama", model = %self.model)
    )]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AppError> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        debug!("Embedding batch of {} texts", texts.len());

        let requests: Vec<_> = texts.iter().map(|text| self.embed_single(text)).collect();

        futures::stream::iter(requests)
            .buffered(self.concurrency)
            .try_collect()
            .await
    }
}
