//! Text chunking with configurable window and overlap.
//!
//! Windows are measured in Unicode scalar values, so a chunk never splits a
//! character and the same settings behave the same for any script. Chunk text
//! is never trimmed: dropping the first `overlap` characters of every chunk
//! after the first and concatenating reconstructs the document exactly.

use crate::types::{Chunk, DocumentRecord};
use docqa_core::{AppError, AppResult};

/// Sliding-window chunker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    window: usize,
    overlap: usize,
}

impl Chunker {
    /// Create a chunker; requires `0 <= overlap < window`.
    pub fn new(window: usize, overlap: usize) -> AppResult<Self> {
        if window == 0 {
            return Err(AppError::Config(
                "Chunk window must be greater than zero".to_string(),
            ));
        }

        if overlap >= window {
            return Err(AppError::Config(format!(
                "Chunk overlap ({}) must be smaller than the window ({})",
                overlap, window
            )));
        }

        Ok(Self { window, overlap })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }

    /// Chunk every record, preserving record order.
    pub fn chunk(&self, records: &[DocumentRecord]) -> Vec<Chunk> {
        let chunks: Vec<Chunk> = records
            .iter()
            .flat_map(|record| self.chunk_text(&record.source_identifier, &record.raw_text))
            .collect();

        tracing::debug!(
            "Chunked {} documents into {} chunks (window: {}, overlap: {})",
            records.len(),
            chunks.len(),
            self.window,
            self.overlap
        );

        chunks
    }

    /// Chunk one document's text. Empty text yields no chunks.
    pub fn chunk_text(&self, origin: &str, text: &str) -> Vec<Chunk> {
        let offsets: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
        let char_count = offsets.len();
        if char_count == 0 {
            return Vec::new();
        }

        let byte_at = |char_index: usize| offsets.get(char_index).copied().unwrap_or(text.len());
        let step = self.window - self.overlap;

        let capacity = expected_chunk_count(char_count, self.window, self.overlap);
        let mut chunks = Vec::with_capacity(capacity);
        let mut start = 0;

        loop {
            let end = (start + self.window).min(char_count);
            chunks.push(Chunk {
                text: text[byte_at(start)..byte_at(end)].to_string(),
                origin: origin.to_string(),
                sequence_index: chunks.len(),
            });

            if end >= char_count {
                break;
            }
            start += step;
        }

        chunks
    }
}

/// Split records into overlapping windows of `window` characters.
pub fn chunk(records: &[DocumentRecord], window: usize, overlap: usize) -> AppResult<Vec<Chunk>> {
    Ok(Chunker::new(window, overlap)?.chunk(records))
}

/// Number of chunks a text of `len` characters produces.
pub fn expected_chunk_count(len: usize, window: usize, overlap: usize) -> usize {
    if len == 0 {
        0
    } else if len <= window {
        1
    } else {
        (len - overlap).div_ceil(window - overlap)
    }
}
