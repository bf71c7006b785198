//! Error types for docqa.
//!
//! This module defines a unified error enum covering every failure the
//! question-answering core can surface. Index-construction failures are
//! fatal to the build; retrieval and generation failures are recoverable and
//! the caller may retry the same question.

use thiserror::Error;

/// Unified error type for docqa.
///
/// All fallible functions return `Result<T, AppError>`.
/// We never panic; errors must be represented and propagated.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM provider transport errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Knowledge base errors that fit no more specific category
    #[error("Knowledge error: {0}")]
    Knowledge(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Every submitted file was skipped by the loader
    #[error("No documents could be loaded: {0}")]
    NoDocumentsLoaded(String),

    /// Loaded documents produced zero chunks
    #[error("Nothing to index: the loaded documents produced no text chunks")]
    EmptyIndex,

    /// Embedding or similarity search backend failed
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    /// Answer generation backend failed or timed out
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether retrying the same call may succeed.
    ///
    /// Only backend failures during a question are recoverable; build-time
    /// failures need different input from the caller.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AppError::Retrieval(_) | AppError::Generation(_))
    }

    /// Name of the processing stage that produced this error, if any.
    pub fn stage(&self) -> Option<&'static str> {
        match self {
            AppError::NoDocumentsLoaded(_) => Some("load"),
            AppError::EmptyIndex => Some("index"),
            AppError::Retrieval(_) => Some("retrieve"),
            AppError::Generation(_) => Some("generate"),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
