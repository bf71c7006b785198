//! Trigram embedding provider using character trigram-based content-aware embeddings.

use crate::embeddings::provider::EmbeddingProvider;
use docqa_core::AppResult;
use std::collections::{BTreeMap, HashSet};

const STOP_WORDS: [&str; 33] = [
    "the", "is", "at", "which", "on", "a", "an", "as", "are", "was", "were", "for", "to", "of",
    "in", "and", "or", "but", "with", "by", "from", "this", "that", "be", "have", "has", "had",
    "it", "its", "their", "they", "them", "what",
];

/// Trigram-based embedding provider for local, offline operation.
///
/// Generates deterministic embeddings based on text content using
/// character trigrams and word frequencies. While not semantically
/// accurate like neural embedding models, it produces consistent,
/// content-dependent vectors suitable for development and offline use.
#[derive(Debug)]
pub struct TrigramProvider {
    dimensions: usize,
    stop_words: HashSet<&'static str>,
}

impl TrigramProvider {
    /// Create a new trigram provider with specified dimensions.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            stop_words: STOP_WORDS.into_iter().collect(),
        }
    }

    /// Generate a trigram-based embedding for text.
    fn generate_trigram_embedding(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0; self.dimensions];
        if self.dimensions == 0 {
            return embedding;
        }

        let lower = text.to_lowercase();

        // Punctuation never contributes, so "meeting?" and "meeting." match
        let words = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() > 2 && !self.stop_words.contains(*w));

        // Ordered map: float sums must accumulate in the same order every call
        let mut word_freq: BTreeMap<&str, usize> = BTreeMap::new();
        for word in words {
            *word_freq.entry(word).or_insert(0) += 1;
        }

        for (word, freq) in &word_freq {
            let chars: Vec<char> = word.chars().collect();
            for window in chars.windows(3) {
                let trigram_hash = window
                    .iter()
                    .fold(0u64, |acc, c| acc.wrapping_mul(37).wrapping_add(*c as u64));

                let dim_idx = (trigram_hash % self.dimensions as u64) as usize;
                embedding[dim_idx] += (*freq as f32).sqrt(); // sqrt scale for better distribution
            }

            // Also encode whole word
            let word_hash = word
                .bytes()
                .fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
            let base_dim = (word_hash % self.dimensions as u64) as usize;
            embedding[base_dim] += *freq as f32;
        }

        // Normalize to unit vector
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

#[async_trait::async_trait]
impl EmbeddingProvider for TrigramProvider {
    fn provider_name(&self) -> &str {
        "trigram"
    }

    fn model_name(&self) -> &str {
        "trigram-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| self.generate_trigram_embedding(text))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[tokio::test]
    async fn test_trigram_provider_dimensions() {
        let provider = TrigramProvider::new(384);
        assert_eq!(provider.dimensions(), 384);
        assert_eq!(provider.provider_name(), "trigram");
        assert_eq!(provider.model_name(), "trigram-v1");
    }

    #[tokio::test]
    async fn test_trigram_provider_embed_single() {
        let provider = TrigramProvider::new(384);
        let embedding = provider.embed("hello world").await.unwrap();

        assert_eq!(embedding.len(), 384);

        // Verify normalization (unit vector)
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_trigram_provider_embed_batch() {
        let provider = TrigramProvider::new(384);
        let texts = vec![
            "hello world".to_string(),
            "test embedding".to_string(),
            "rust programming".to_string(),
        ];

        let embeddings = provider.embed_batch(&texts).await.unwrap();

        assert_eq!(embeddings.len(), 3);
        for embedding in &embeddings {
            assert_eq!(embedding.len(), 384);
            let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 0.001);
        }
    }

    #[tokio::test]
    async fn test_trigram_provider_deterministic() {
        let provider = TrigramProvider::new(384);
        let text = "deterministic test";

        let embedding1 = provider.embed(text).await.unwrap();
        let embedding2 = provider.embed(text).await.unwrap();

        assert_eq!(embedding1, embedding2);
    }

    #[tokio::test]
    async fn test_colliding_dimensions_are_stable() {
        // Few dimensions force many words to share a slot
        let provider = TrigramProvider::new(16);
        let text = "budget review budget forecast review quarterly budget planning \
                    forecast revenue quarterly review budget staffing revenue planning \
                    hiring budget forecast review staffing hiring quarterly revenue \
                    budget planning review forecast";

        let first = provider.embed(text).await.unwrap();
        for _ in 0..200 {
            assert_eq!(provider.embed(text).await.unwrap(), first);
        }
    }

    #[tokio::test]
    async fn test_trigram_provider_different_texts() {
        let provider = TrigramProvider::new(384);

        let embedding1 = provider.embed("hello world").await.unwrap();
        let embedding2 = provider.embed("goodbye world").await.unwrap();

        assert_ne!(embedding1, embedding2);
    }

    #[tokio::test]
    async fn test_punctuation_does_not_change_embedding() {
        let provider = TrigramProvider::new(384);

        let question = provider.embed("When is the meeting?").await.unwrap();
        let statement = provider.embed("when... MEETING!").await.unwrap();
        assert_eq!(question, statement);
    }

    #[tokio::test]
    async fn test_related_text_scores_higher() {
        let provider = TrigramProvider::new(384);

        let query = provider.embed("When is the meeting?").await.unwrap();
        let related = provider.embed("The meeting is on March 3rd.").await.unwrap();
        let unrelated = provider.embed("Quarterly revenue grew by eight percent.").await.unwrap();

        assert!(dot(&query, &related) > dot(&query, &unrelated));
    }

    #[tokio::test]
    async fn test_trigram_provider_empty_text() {
        let provider = TrigramProvider::new(384);
        let embedding = provider.embed("").await.unwrap();

        assert_eq!(embedding.len(), 384);
        // Empty text should produce zero vector
        assert!(embedding.iter().all(|&x| x == 0.0));
    }

    #[tokio::test]
    async fn test_trigram_provider_utf8_safety() {
        let provider = TrigramProvider::new(384);

        let text = "Gamedex é um aplicativo 🎮 brasileiro para gerenciar jogos!";
        let embedding = provider.embed(text).await.unwrap();

        assert_eq!(embedding.len(), 384);
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.001);
    }
}
