//! Retrieval-augmented answering.
//!
//! Classify the question, retrieve a mode-sized context from the vector
//! index, then generate one answer from it.

pub mod generator;
pub mod pipeline;
pub mod retriever;
pub mod types;

pub use generator::{GenerationSettings, Generator, NOT_FOUND_ANSWER};
pub use pipeline::Pipeline;
pub use retriever::{retrieve, RetrievalSizes, RetrievedContext};
pub use types::{Answer, AnswerKind, SourceRef};
