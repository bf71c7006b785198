//! Document-grounded question answering.
//!
//! Build time: files are loaded into plain-text records, split into
//! overlapping chunks and embedded into an in-memory [`VectorIndex`].
//! Query time: each question is classified, answered from a mode-sized
//! context window, and returned as an [`Answer`].

pub mod chunker;
pub mod classifier;
pub mod embeddings;
pub mod loader;
pub mod rag;
pub mod types;
pub mod vector_index;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use chunker::Chunker;
pub use rag::{Answer, AnswerKind, Pipeline, SourceRef};
pub use types::{
    Chunk, DocumentFormat, DocumentRecord, IndexStats, LoadReport, LoadWarning, LoadWarningKind,
    SourceFile,
};
pub use vector_index::{ScoredChunk, SimilarityMetric, VectorIndex};

use docqa_core::{AppConfig, AppError, AppResult};
use docqa_llm::create_client;
use docqa_prompt::PromptTable;
use embeddings::{create_provider, EmbeddingConfig, EmbeddingProvider};
use rag::{GenerationSettings, Generator, RetrievalSizes};
use std::sync::Arc;
use std::time::Instant;

/// Result of a successful index build.
#[derive(Debug)]
pub struct IndexBuild {
    pub index: VectorIndex,
    /// Files skipped by the loader, in input order
    pub warnings: Vec<LoadWarning>,
    pub stats: IndexStats,
}

/// Entry point tying index construction and answering together.
pub struct DocumentQa {
    chunker: Chunker,
    embedder: Arc<dyn EmbeddingProvider>,
    metric: SimilarityMetric,
    pipeline: Pipeline,
}

impl DocumentQa {
    pub fn new(chunker: Chunker, embedder: Arc<dyn EmbeddingProvider>, pipeline: Pipeline) -> Self {
        Self {
            chunker,
            embedder,
            metric: SimilarityMetric::default(),
            pipeline,
        }
    }

    pub fn with_metric(mut self, metric: SimilarityMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Construct every component from application configuration.
    ///
    /// Prompt overrides under `<workspace>/.docqa/prompts/` are applied here,
    /// once, so answering never touches the filesystem.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;

        let chunker = Chunker::new(config.indexing.chunk_window, config.indexing.chunk_overlap)?;

        let embedding_config = EmbeddingConfig::from_app_config(config);
        let embedding_key = config.resolve_api_key(&config.embedding_provider);
        let embedder = create_provider(&embedding_config, embedding_key.as_deref())?;

        let provider_config = config.get_provider_config(&config.provider);
        let endpoint = provider_config.and_then(|p| p.endpoint());
        let timeout = provider_config.and_then(|p| p.timeout());
        let api_key = config.resolve_api_key(&config.provider);
        let client = create_client(&config.provider, endpoint, api_key.as_deref(), timeout)
            .map_err(|e| AppError::Config(format!("Failed to create LLM client: {}", e)))?;

        let overrides = docqa_prompt::load_overrides(&config.workspace)?;
        let prompts = Arc::new(PromptTable::with_overrides(overrides)?);

        let settings = GenerationSettings::new(config.model.as_str(), &config.generation);
        let generator = Generator::new(client, prompts, settings);
        let sizes = RetrievalSizes::try_from(&config.retrieval)?;

        tracing::info!(
            "Configured docqa (provider: {}, model: {}, embeddings: {}/{})",
            config.provider,
            config.model,
            embedding_config.provider,
            embedding_config.model
        );

        Ok(Self::new(chunker, embedder, Pipeline::new(generator, sizes)))
    }

    /// Load, chunk and embed `files` into a new index.
    ///
    /// Unsupported or corrupt files become warnings. Fails with
    /// `NoDocumentsLoaded` when nothing could be loaded and with
    /// `EmptyIndex` when the loaded documents hold no text.
    pub async fn build_index(&self, files: &[SourceFile]) -> AppResult<IndexBuild> {
        let start = Instant::now();
        tracing::info!("Building index from {} files", files.len());

        let report = loader::load(files)?;
        let bytes_processed: u64 = report
            .documents
            .iter()
            .map(|doc| doc.raw_text.len() as u64)
            .sum();

        let chunks = self.chunker.chunk(&report.documents);
        let chunks_indexed = chunks.len();

        let index = VectorIndex::build(chunks, Arc::clone(&self.embedder), self.metric).await?;

        let duration = start.elapsed();
        let stats = IndexStats {
            documents_loaded: report.documents.len(),
            files_skipped: report.warnings.len(),
            chunks_indexed,
            bytes_processed,
            duration_secs: duration.as_secs_f64(),
        };

        tracing::info!(
            "Index built: {} documents, {} chunks, {} bytes in {:.2}s ({} skipped)",
            stats.documents_loaded,
            stats.chunks_indexed,
            stats.bytes_processed,
            stats.duration_secs,
            stats.files_skipped
        );

        Ok(IndexBuild {
            index,
            warnings: report.warnings,
            stats,
        })
    }

    /// Answer one question against an index built by [`Self::build_index`].
    pub async fn answer(&self, index: &VectorIndex, question: &str) -> AppResult<Answer> {
        self.pipeline.answer(index, question).await
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}
