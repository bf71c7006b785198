//! LLM provider factory.
//!
//! Resolves a provider name to a client implementation and checks that the
//! secrets it needs are present.

use crate::client::LlmClient;
use crate::providers::{OllamaClient, OpenAiClient};
use crate::types::ProviderType;
use std::sync::Arc;
use std::time::Duration;

/// Default request timeout when the configuration names none.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("openai", "ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - Optional API key (required by OpenAI)
/// * `timeout_secs` - Optional per-request timeout
///
/// # Errors
/// Returns error if the provider is unknown or a required secret is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    timeout_secs: Option<u64>,
) -> Result<Arc<dyn LlmClient>, String> {
    let provider_type =
        ProviderType::parse(provider).ok_or_else(|| format!("Unknown provider: {}", provider))?;
    let base_url = endpoint.unwrap_or(provider_type.default_endpoint());
    let timeout = Duration::from_secs(timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));

    match provider_type {
        ProviderType::Ollama => {
            let client = OllamaClient::with_base_url(base_url, timeout)?;
            Ok(Arc::new(client))
        }
        ProviderType::OpenAI => {
            let api_key = api_key.ok_or_else(|| "OpenAI provider requires API key".to_string())?;
            let client = OpenAiClient::new(base_url, api_key, timeout)?;
            Ok(Arc::new(client))
        }
    }
}
