//! Cross-module scenario tests.

mod pipeline_flow;

use crate::embeddings::providers::TrigramProvider;
use crate::rag::{GenerationSettings, Generator, Pipeline, RetrievalSizes};
use crate::{Chunker, DocumentQa};
use docqa_core::config::GenerationConfig;
use docqa_core::{AppError, AppResult};
use docqa_llm::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use docqa_prompt::PromptTable;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Test client that answers with the prompt it was given.
#[derive(Default)]
pub(crate) struct EchoClient {
    calls: AtomicUsize,
}

impl EchoClient {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LlmClient for EchoClient {
    fn provider_name(&self) -> &str {
        "echo"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(LlmResponse {
            content: request.prompt.clone(),
            model: request.model.clone(),
            usage: LlmUsage::new(10, 10),
        })
    }
}

/// Test client whose backend is always down.
#[derive(Default)]
pub(crate) struct FailingClient {
    calls: AtomicUsize,
}

impl FailingClient {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LlmClient for FailingClient {
    fn provider_name(&self) -> &str {
        "failing"
    }

    async fn complete(&self, _request: &LlmRequest) -> AppResult<LlmResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AppError::Llm("connection refused".to_string()))
    }
}

pub(crate) fn generator(client: Arc<dyn LlmClient>) -> Generator {
    let prompts = Arc::new(PromptTable::new().unwrap());
    let settings = GenerationSettings::new("test-model", &GenerationConfig::default());
    Generator::new(client, prompts, settings)
}

pub(crate) fn document_qa(client: Arc<dyn LlmClient>) -> DocumentQa {
    let chunker = Chunker::new(200, 20).unwrap();
    let embedder = Arc::new(TrigramProvider::new(256));
    let pipeline = Pipeline::new(generator(client), RetrievalSizes::default());
    DocumentQa::new(chunker, embedder, pipeline)
}
