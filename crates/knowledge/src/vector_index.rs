//! In-memory vector index over embedded chunks.
//!
//! The index is built once from a chunk batch and never mutated afterwards,
//! so any number of concurrent searches may share it. It owns the embedding
//! provider it was built with and embeds queries with that same instance.

use crate::embeddings::EmbeddingProvider;
use crate::types::Chunk;
use docqa_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Similarity metric. Every variant scores so that higher means closer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMetric {
    #[default]
    Cosine,
    DotProduct,
    /// Negated Euclidean distance
    Euclidean,
}

impl SimilarityMetric {
    /// Score two vectors of equal length.
    pub fn score(&self, a: &[f32], b: &[f32]) -> f32 {
        let score = match self {
            Self::Cosine => cosine_similarity(a, b),
            Self::DotProduct => a.iter().zip(b).map(|(x, y)| x * y).sum(),
            Self::Euclidean => -a
                .iter()
                .zip(b)
                .map(|(x, y)| (x - y) * (x - y))
                .sum::<f32>()
                .sqrt(),
        };

        if score.is_nan() {
            f32::NEG_INFINITY
        } else {
            score
        }
    }
}

/// Calculate cosine similarity between two vectors.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

/// Identity of the embedding space an index was built in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingSignature {
    pub provider: String,
    pub model: String,
    pub dimensions: usize,
}

impl fmt::Display for EmbeddingSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({} dims)", self.provider, self.model, self.dimensions)
    }
}

/// A chunk returned by a search, with its similarity to the query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

#[derive(Debug)]
struct IndexedChunk {
    chunk: Chunk,
    embedding: Vec<f32>,
}

/// Append-only collection of (embedding, chunk) pairs.
#[derive(Debug)]
pub struct VectorIndex {
    provider: Arc<dyn EmbeddingProvider>,
    metric: SimilarityMetric,
    entries: Vec<IndexedChunk>,
}

impl VectorIndex {
    /// Embed every chunk and build the index.
    ///
    /// Fails with `EmptyIndex` when there is nothing to embed and with
    /// `Retrieval` when the embedding backend fails.
    pub async fn build(
        chunks: Vec<Chunk>,
        provider: Arc<dyn EmbeddingProvider>,
        metric: SimilarityMetric,
    ) -> AppResult<Self> {
        if chunks.is_empty() {
            return Err(AppError::EmptyIndex);
        }

        tracing::info!(
            "Embedding {} chunks using provider '{}' (model: {})",
            chunks.len(),
            provider.provider_name(),
            provider.model_name()
        );

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = provider
            .embed_batch(&texts)
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to embed chunks: {}", e)))?;

        if embeddings.len() != chunks.len() {
            return Err(AppError::Retrieval(format!(
                "Embedding provider returned {} vectors for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let dimensions = provider.dimensions();
        let entries = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| {
                if embedding.len() == dimensions {
                    Ok(IndexedChunk { chunk, embedding })
                } else {
                    Err(AppError::Retrieval(format!(
                        "Chunk {}#{} embedded with {} dimensions, expected {}",
                        chunk.origin,
                        chunk.sequence_index,
                        embedding.len(),
                        dimensions
                    )))
                }
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(Self {
            provider,
            metric,
            entries,
        })
    }

    /// Return the `k` chunks most similar to `query`, best first.
    pub async fn search(&self, query: &str, k: usize) -> AppResult<Vec<ScoredChunk>> {
        let query_embedding = self
            .provider
            .embed(query)
            .await
            .map_err(|e| AppError::Retrieval(format!("Failed to embed query: {}", e)))?;

        self.search_embedding(&query_embedding, k)
    }

    /// Rank stored chunks against an already-embedded query.
    ///
    /// Ties are broken by ascending sequence index, then source identifier,
    /// so results are deterministic. Fewer than `k` entries returns them all.
    pub fn search_embedding(
        &self,
        query_embedding: &[f32],
        k: usize,
    ) -> AppResult<Vec<ScoredChunk>> {
        if k == 0 {
            return Err(AppError::Config(
                "Search result count must be at least 1".to_string(),
            ));
        }

        let dimensions = self.provider.dimensions();
        if query_embedding.len() != dimensions {
            return Err(AppError::Retrieval(format!(
                "Query embedded with {} dimensions, index expects {}",
                query_embedding.len(),
                dimensions
            )));
        }

        let mut scored: Vec<(&IndexedChunk, f32)> = self
            .entries
            .iter()
            .map(|entry| (entry, self.metric.score(query_embedding, &entry.embedding)))
            .collect();

        scored.sort_by(|(a, score_a), (b, score_b)| {
            compare_scores(*score_a, *score_b)
                .then_with(|| a.chunk.sequence_index.cmp(&b.chunk.sequence_index))
                .then_with(|| a.chunk.origin.cmp(&b.chunk.origin))
        });

        let results: Vec<ScoredChunk> = scored
            .into_iter()
            .take(k)
            .map(|(entry, score)| ScoredChunk {
                chunk: entry.chunk.clone(),
                score,
            })
            .collect();

        if let (Some(first), Some(last)) = (results.first(), results.last()) {
            tracing::debug!(
                "Retrieved {} of {} chunks (top score: {:.3}, lowest: {:.3})",
                results.len(),
                self.entries.len(),
                first.score,
                last.score
            );
        }

        Ok(results)
    }

    /// Number of indexed chunks.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn metric(&self) -> SimilarityMetric {
        self.metric
    }

    pub fn embedding_signature(&self) -> EmbeddingSignature {
        EmbeddingSignature {
            provider: self.provider.provider_name().to_string(),
            model: self.provider.model_name().to_string(),
            dimensions: self.provider.dimensions(),
        }
    }

    /// Iterate over the indexed chunks in insertion order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.entries.iter().map(|entry| &entry.chunk)
    }
}

/// Order two scores best-first.
pub fn compare_scores(a: f32, b: f32) -> Ordering {
    b.total_cmp(&a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::providers::TrigramProvider;

    fn chunk(origin: &str, sequence_index: usize, text: &str) -> Chunk {
        Chunk {
            text: text.to_string(),
            origin: origin.to_string(),
            sequence_index,
        }
    }

    #[test]
    fn test_cosine_similarity() {
        let metric = SimilarityMetric::Cosine;
        assert!((metric.score(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 0.001);
        assert!(metric.score(&[1.0, 0.0], &[0.0, 1.0]).abs() < 0.001);
        assert_eq!(metric.score(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_euclidean_is_negated_distance() {
        let metric = SimilarityMetric::Euclidean;
        assert_eq!(metric.score(&[0.0, 0.0], &[3.0, 4.0]), -5.0);
        assert!(metric.score(&[1.0, 1.0], &[1.0, 1.0]) > metric.score(&[1.0, 1.0], &[2.0, 2.0]));
    }

    #[test]
    fn test_dot_product() {
        assert_eq!(SimilarityMetric::DotProduct.score(&[1.0, 2.0], &[3.0, 4.0]), 11.0);
    }

    #[test]
    fn test_compare_scores_orders_best_first() {
        let mut scores = vec![0.1, 0.9, 0.5];
        scores.sort_by(|a, b| compare_scores(*a, *b));
        assert_eq!(scores, vec![0.9, 0.5, 0.1]);
    }

    #[tokio::test]
    async fn test_build_rejects_empty_chunks() {
        let provider = Arc::new(TrigramProvider::new(64));
        let result = VectorIndex::build(Vec::new(), provider, SimilarityMetric::Cosine).await;
        assert!(matches!(result, Err(AppError::EmptyIndex)));
    }

    #[tokio::test]
    async fn test_search_returns_at_most_k() {
        let provider = Arc::new(TrigramProvider::new(128));
        let chunks = vec![
            chunk("a.txt", 0, "Rust ownership and borrowing"),
            chunk("a.txt", 1, "Pasta recipes with tomato sauce"),
        ];
        let index = VectorIndex::build(chunks, provider, SimilarityMetric::Cosine)
            .await
            .unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.search("ownership", 5).await.unwrap().len(), 2);
        assert_eq!(index.search("ownership", 1).await.unwrap().len(), 1);
        assert!(index.search("ownership", 0).await.is_err());
    }

    #[tokio::test]
    async fn test_query_dimension_mismatch() {
        let provider = Arc::new(TrigramProvider::new(16));
        let chunks = vec![chunk("a", 0, "text")];
        let index = VectorIndex::build(chunks, provider, SimilarityMetric::Cosine)
            .await
            .unwrap();

        let result = index.search_embedding(&[1.0, 0.0], 1);
        assert!(matches!(result, Err(AppError::Retrieval(_))));
    }

    #[tokio::test]
    async fn test_signature_reports_provider() {
        let provider = Arc::new(TrigramProvider::new(32));
        let chunks = vec![chunk("a", 0, "text")];
        let index = VectorIndex::build(chunks, provider, SimilarityMetric::default())
            .await
            .unwrap();

        let signature = index.embedding_signature();
        assert_eq!(signature.provider, "trigram");
        assert_eq!(signature.dimensions, 32);
        assert_eq!(signature.to_string(), "trigram/trigram-v1 (32 dims)");
        assert_eq!(index.metric(), SimilarityMetric::Cosine);
    }
}
