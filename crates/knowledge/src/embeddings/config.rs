//! Embedding configuration.

use docqa_core::config::ProviderConfig;
use docqa_core::AppConfig;
use serde::{Deserialize, Serialize};

const DEFAULT_OLLAMA_MODEL: &str = "nomic-embed-text";
const DEFAULT_OPENAI_MODEL: &str = "text-embedding-3-small";

/// Embedding configuration for one index build.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmbeddingConfig {
    /// Provider name: "trigram", "ollama", "openai"
    pub provider: String,

    /// Model identifier (provider-specific)
    pub model: String,

    /// Embedding vector dimensions
    pub dimensions: usize,

    /// Custom endpoint for remote providers
    #[serde(default)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds for remote providers
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum texts per embedding request
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Maximum concurrent requests for providers without a batch API
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_batch_size() -> usize {
    100
}

fn default_concurrency() -> usize {
    4
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "trigram".to_string(),
            model: "trigram-v1".to_string(),
            dimensions: 384,
            endpoint: None,
            timeout_secs: default_timeout_secs(),
            batch_size: default_batch_size(),
            concurrency: default_concurrency(),
        }
    }
}

impl EmbeddingConfig {
    /// Derive the embedding settings from application configuration.
    ///
    /// Remote models with a well-known output size use it; anything else
    /// falls back to `indexing.embeddingDimensions`.
    pub fn from_app_config(config: &AppConfig) -> Self {
        let provider = config.embedding_provider.clone();
        let provider_config = config.get_provider_config(&provider);
        let configured_dims = config.indexing.embedding_dimensions;

        let model = match provider.as_str() {
            "trigram" => "trigram-v1".to_string(),
            "ollama" => provider_config
                .and_then(ProviderConfig::embedding_model)
                .unwrap_or(DEFAULT_OLLAMA_MODEL)
                .to_string(),
            _ => provider_config
                .and_then(ProviderConfig::embedding_model)
                .unwrap_or(DEFAULT_OPENAI_MODEL)
                .to_string(),
        };

        let dimensions = if provider == "trigram" {
            configured_dims
        } else {
            known_dimensions(&model).unwrap_or(configured_dims)
        };

        Self {
            provider,
            model,
            dimensions,
            endpoint: provider_config.and_then(|p| p.endpoint()).map(str::to_string),
            timeout_secs: provider_config
                .and_then(ProviderConfig::timeout)
                .unwrap_or_else(default_timeout_secs),
            ..Self::default()
        }
    }
}

/// Output size of common embedding models.
fn known_dimensions(model: &str) -> Option<usize> {
    let base = model.split(':').next().unwrap_or(model);
    match base {
        "nomic-embed-text" => Some(768),
        "mxbai-embed-large" => Some(1024),
        "all-minilm" => Some(384),
        "text-embedding-3-small" | "text-embedding-ada-002" => Some(1536),
        "text-embedding-3-large" => Some(3072),
        _ => None,
    }
}
