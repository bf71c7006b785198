//! OpenAI embedding provider.
//!
//! Calls `/embeddings` with batches of up to `batch_size` inputs. Any
//! OpenAI-compatible server works when `endpoint` points at it.

use crate::embeddings::{EmbeddingConfig, EmbeddingProvider};
use async_trait::async_trait;
use docqa_core::AppError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

/// OpenAI embedding provider.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    dimensions: usize,
    batch_size: usize,
}

impl OpenAiProvider {
    pub fn new(config: &EmbeddingConfig, api_key: &str) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::Llm(format!("Failed to create HTTP client for OpenAI: {}", e))
            })?;

        let base_url = config.endpoint.as_deref().unwrap_or(DEFAULT_OPENAI_URL);

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: config.model.clone(),
            dimensions: config.dimensions,
            batch_size: config.batch_size.max(1),
        })
    }

    async fn embed_request(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, AppError> {
        let url = format!("{}/embeddings", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&EmbeddingsRequest {
                model: &self.model,
                input: inputs,
            })
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to OpenAI: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let body: EmbeddingsResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse OpenAI response: {}", e)))?;

        order_embeddings(body.data, inputs.len(), self.dimensions)
    }
}

/// Put response items back in request order and check their shape.
fn order_embeddings(
    mut data: Vec<EmbeddingData>,
    expected: usize,
    dimensions: usize,
) -> Result<Vec<Vec<f32>>, AppError> {
    if data.len() != expected {
        return Err(AppError::Llm(format!(
            "OpenAI returned {} embeddings for {} inputs",
            data.len(),
            expected
        )));
    }

    data.sort_by_key(|item| item.index);

    data.into_iter()
        .map(|item| {
            if item.embedding.len() == dimensions {
                Ok(item.embedding)
            } else {
                Err(AppError::Llm(format!(
                    "Unexpected embedding dimensions: got {}, expected {}",
                    item.embedding.len(),
                    dimensions
                )))
            }
        })
        .collect()
}

#[async_trait]
impl EmbeddingProvider for OpenAiProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, AppError> {
        let mut embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            tracing::debug!("Embedding batch of {} texts with OpenAI", batch.len());
            embeddings.extend(self.embed_request(batch).await?);
        }

        Ok(embeddings)
    }
}
