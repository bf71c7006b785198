//! Answer types returned by the pipeline.

use crate::types::Chunk;
use docqa_core::Mode;
use serde::{Deserialize, Serialize};

/// Maximum snippet length for source references, in characters.
pub const MAX_SNIPPET_LENGTH: usize = 150;

/// How an answer was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerKind {
    /// Text produced by the generation model from retrieved context.
    Generated,
    /// Fixed response for an empty context; no model was called.
    NotFound,
}

/// A single source reference used to answer a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRef {
    /// Source file or document name
    pub source: String,

    /// Position of the chunk within its source
    pub sequence_index: usize,

    /// Short snippet showing the relevant evidence (truncated if needed)
    pub snippet: String,
}

impl SourceRef {
    pub fn from_chunk(chunk: &Chunk) -> Self {
        Self {
            source: chunk.origin.clone(),
            sequence_index: chunk.sequence_index,
            snippet: truncate_snippet(&chunk.text, MAX_SNIPPET_LENGTH),
        }
    }
}

/// Terminal result of one `answer` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub mode: Mode,
    pub kind: AnswerKind,
    pub sources: Vec<SourceRef>,
}

impl Answer {
    /// Build a generated answer, citing each retrieved chunk once in rank order.
    pub fn generated(text: String, mode: Mode, chunks: &[Chunk]) -> Self {
        let mut sources: Vec<SourceRef> = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let duplicate = sources
                .iter()
                .any(|s| s.source == chunk.origin && s.sequence_index == chunk.sequence_index);
            if !duplicate {
                sources.push(SourceRef::from_chunk(chunk));
            }
        }

        Self {
            text,
            mode,
            kind: AnswerKind::Generated,
            sources,
        }
    }

    /// The not-found response.
    pub fn not_found(text: impl Into<String>, mode: Mode) -> Self {
        Self {
            text: text.into(),
            mode,
            kind: AnswerKind::NotFound,
            sources: Vec::new(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == AnswerKind::NotFound
    }
}

/// Collapse whitespace and cut `text` to at most `max_chars` characters,
/// appending "..." when anything was removed.
pub fn truncate_snippet(text: &str, max_chars: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }

    let keep = max_chars.saturating_sub(3);
    let mut snippet: String = collapsed.chars().take(keep).collect();
    snippet.push_str("...");
    snippet
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(origin: &str, sequence_index: usize, text: &str) -> Chunk {
        Chunk {
            text: text.to_string(),
            origin: origin.to_string(),
            sequence_index,
        }
    }

    #[test]
    fn test_generated_answer_deduplicates_sources() {
        let chunks = vec![
            chunk("a.md", 0, "first"),
            chunk("b.md", 0, "second"),
            chunk("a.md", 0, "first"),
            chunk("a.md", 1, "third"),
        ];

        let answer = Answer::generated("text".to_string(), Mode::Summary, &chunks);

        assert_eq!(answer.kind, AnswerKind::Generated);
        assert_eq!(answer.sources.len(), 3);
        assert_eq!(answer.sources[0].source, "a.md");
        assert_eq!(answer.sources[1].source, "b.md");
        assert_eq!(answer.sources[2].sequence_index, 1);
    }

    #[test]
    fn test_not_found_answer() {
        let answer = Answer::not_found("nothing", Mode::Fact);

        assert!(answer.is_not_found());
        assert!(answer.sources.is_empty());
        assert_eq!(answer.mode, Mode::Fact);
    }

    #[test]
    fn test_truncate_snippet_is_char_safe() {
        let text = "é".repeat(200);
        let snippet = truncate_snippet(&text, 10);

        assert_eq!(snippet.chars().count(), 10);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn test_truncate_snippet_collapses_whitespace() {
        assert_eq!(truncate_snippet("a\n\n  b\tc", 50), "a b c");
    }

    #[test]
    fn test_answer_serialization() {
        let answer = Answer::generated(
            "It is on March 3rd.".to_string(),
            Mode::Fact,
            &[chunk("notes.txt", 0, "The meeting is on March 3rd.")],
        );

        let json = serde_json::to_value(&answer).unwrap();
        assert_eq!(json["mode"], "fact");
        assert_eq!(json["kind"], "generated");
        assert_eq!(json["sources"][0]["source"], "notes.txt");
    }
}
