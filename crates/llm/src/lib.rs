//! LLM integration crate for docqa.
//!
//! This crate provides a provider-agnostic abstraction for the single
//! completion call answer generation makes. Providers sit behind the
//! [`LlmClient`] trait so the generator never knows which backend it talks to.
//!
//! # Providers
//! - **Ollama**: Local LLM runtime (default)
//! - **OpenAI**: Chat completions API (or any compatible endpoint)
//!
//! # Example
//! ```no_run
//! use docqa_llm::{LlmClient, LlmRequest, providers::OllamaClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OllamaClient::new();
//! let request = LlmRequest::new("Hello, world!", "llama3.2");
//! let response = client.complete(&request).await?;
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;
pub mod types;

// Re-export main types
pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{OllamaClient, OpenAiClient};
pub use types::ProviderType;
