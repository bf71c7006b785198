//! Mode-sized retrieval.

use crate::types::Chunk;
use crate::vector_index::{ScoredChunk, VectorIndex};
use docqa_core::config::RetrievalConfig;
use docqa_core::{AppError, AppResult, Mode};

/// Context window size for each mode, ordered fact <= summary <= analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrievalSizes {
    fact: usize,
    summary: usize,
    analysis: usize,
}

impl RetrievalSizes {
    pub fn new(fact: usize, summary: usize, analysis: usize) -> AppResult<Self> {
        if fact == 0 {
            return Err(AppError::Config(
                "Context window size must be at least 1".to_string(),
            ));
        }

        if fact > summary || summary > analysis {
            return Err(AppError::Config(format!(
                "Context window sizes must satisfy fact <= summary <= analysis (got {} / {} / {})",
                fact, summary, analysis
            )));
        }

        Ok(Self {
            fact,
            summary,
            analysis,
        })
    }

    /// Number of chunks to retrieve for `mode`.
    pub fn k(&self, mode: Mode) -> usize {
        match mode {
            Mode::Fact => self.fact,
            Mode::Summary => self.summary,
            Mode::Analysis => self.analysis,
        }
    }
}

impl Default for RetrievalSizes {
    fn default() -> Self {
        Self {
            fact: 3,
            summary: 6,
            analysis: 8,
        }
    }
}

impl TryFrom<&RetrievalConfig> for RetrievalSizes {
    type Error = AppError;

    fn try_from(config: &RetrievalConfig) -> AppResult<Self> {
        Self::new(config.fact_k, config.summary_k, config.analysis_k)
    }
}

/// Ranked chunks retrieved for one question, most relevant first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetrievedContext {
    pub results: Vec<ScoredChunk>,
}

impl RetrievedContext {
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.results.iter().map(|r| &r.chunk)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Highest similarity score, if anything was retrieved.
    pub fn top_score(&self) -> Option<f32> {
        self.results.first().map(|r| r.score)
    }
}

impl From<Vec<Chunk>> for RetrievedContext {
    fn from(chunks: Vec<Chunk>) -> Self {
        Self {
            results: chunks
                .into_iter()
                .map(|chunk| ScoredChunk { chunk, score: 0.0 })
                .collect(),
        }
    }
}

/// Query the index with the context size chosen for `mode`.
pub async fn retrieve(
    index: &VectorIndex,
    question: &str,
    mode: Mode,
    sizes: &RetrievalSizes,
) -> AppResult<RetrievedContext> {
    let k = sizes.k(mode);
    tracing::debug!("Retrieving {} chunks for {} question", k, mode);

    let results = index.search(question, k).await?;

    Ok(RetrievedContext { results })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sizes_are_ordered() {
        let sizes = RetrievalSizes::default();
        assert_eq!(sizes.k(Mode::Fact), 3);
        assert_eq!(sizes.k(Mode::Summary), 6);
        assert_eq!(sizes.k(Mode::Analysis), 8);

        for pair in Mode::ALL.windows(2) {
            assert!(sizes.k(pair[0]) <= sizes.k(pair[1]));
        }
    }

    #[test]
    fn test_sizes_match_config_defaults() {
        let sizes = RetrievalSizes::try_from(&RetrievalConfig::default()).unwrap();
        assert_eq!(sizes, RetrievalSizes::default());
    }

    #[test]
    fn test_invalid_sizes_rejected() {
        assert!(RetrievalSizes::new(0, 6, 8).is_err());
        assert!(RetrievalSizes::new(4, 3, 8).is_err());
        assert!(RetrievalSizes::new(3, 9, 8).is_err());
        assert!(RetrievalSizes::new(2, 2, 2).is_ok());
    }

    #[test]
    fn test_context_from_chunks() {
        let context = RetrievedContext::from(vec![Chunk {
            text: "a".to_string(),
            origin: "x".to_string(),
            sequence_index: 0,
        }]);

        assert_eq!(context.len(), 1);
        assert_eq!(context.chunks().next().map(|c| c.origin.as_str()), Some("x"));
        assert!(RetrievedContext::default().is_empty());
    }
}
