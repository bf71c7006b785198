//! Embedding providers for the vector index.
//!
//! The index holds one provider instance and uses it for both building and
//! searching, so chunk and query vectors always share an embedding space.

pub mod config;
pub mod provider;
pub mod providers;

pub use config::EmbeddingConfig;
pub use provider::{create_provider, EmbeddingProvider};
