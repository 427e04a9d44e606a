//! Boundary-aware document chunking.
//!
//! [`BoundaryChunker`] splits extracted text into overlapping segments,
//! preferring sentence and line boundaries over hard cuts so chunks read as
//! coherent passages. Never splitting mid-word is best-effort, not a
//! guarantee: when no boundary falls inside the look-back window the hard
//! cut is used unadjusted.

use crate::document::{Chunk, Document};
use crate::error::{RagError, Result};

/// Default look-back window for boundary adjustment.
pub const DEFAULT_BOUNDARY_LOOKBACK: usize = 100;

/// Splits documents into overlapping, boundary-aware segments.
///
/// Window parameters are validated once at construction, so
/// [`chunk`](BoundaryChunker::chunk) itself cannot fail.
///
/// # Example
///
/// ```rust,ignore
/// use medchat_rag::BoundaryChunker;
///
/// let chunker = BoundaryChunker::new(1000, 200)?;
/// let chunks = chunker.chunk(&document);
/// ```
#[derive(Debug, Clone)]
pub struct BoundaryChunker {
    max_chars: usize,
    overlap_chars: usize,
    boundary_lookback: usize,
}

impl BoundaryChunker {
    /// Create a chunker with the default look-back window.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfiguration`] unless
    /// `max_chars > overlap_chars` and `max_chars > 0`.
    pub fn new(max_chars: usize, overlap_chars: usize) -> Result<Self> {
        Self::with_lookback(max_chars, overlap_chars, DEFAULT_BOUNDARY_LOOKBACK)
    }

    /// Create a chunker with an explicit look-back window. A window of zero
    /// disables boundary adjustment entirely.
    pub fn with_lookback(
        max_chars: usize,
        overlap_chars: usize,
        boundary_lookback: usize,
    ) -> Result<Self> {
        if max_chars == 0 {
            return Err(RagError::InvalidConfiguration(
                "max_chars must be greater than zero".to_string(),
            ));
        }
        if overlap_chars >= max_chars {
            return Err(RagError::InvalidConfiguration(format!(
                "overlap_chars ({overlap_chars}) must be less than max_chars ({max_chars})"
            )));
        }
        Ok(Self { max_chars, overlap_chars, boundary_lookback })
    }

    /// Split a document into ordered, overlapping chunks.
    ///
    /// Empty text produces an empty `Vec`. Every chunk satisfies
    /// `text.len() <= max_chars`; each chunk after the first begins
    /// `overlap_chars` before the previous chunk's end, except where
    /// boundary adjustment shortens the overlap. Offsets are byte offsets
    /// into the source text, always on `char` boundaries.
    pub fn chunk(&self, document: &Document) -> Vec<Chunk> {
        let text = document.text.as_str();
        if text.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut start = 0;

        loop {
            let end = self.cut_point(text, start);
            chunks.push(Chunk {
                sequence_index: chunks.len(),
                text: text[start..end].to_string(),
                char_start: start,
                char_end: end,
                document_id: document.id.clone(),
                metadata: document.metadata.clone(),
            });

            if end >= text.len() {
                break;
            }

            let next = floor_char_boundary(text, end.saturating_sub(self.overlap_chars));
            // The overlap may shorten, but the window always moves forward.
            start = if next > start { next } else { end };
        }

        chunks
    }

    /// Pick the end of the segment starting at `start`: the hard cut at
    /// `start + max_chars`, adjusted backward to the nearest preceding
    /// sentence end or line break inside the look-back window.
    fn cut_point(&self, text: &str, start: usize) -> usize {
        if start.saturating_add(self.max_chars) >= text.len() {
            return text.len();
        }
        let hard_end = floor_char_boundary(text, start + self.max_chars);
        if hard_end <= start {
            // max_chars narrower than one multi-byte char; take one whole char.
            return ceil_char_boundary(text, start + 1);
        }

        // Cuts at or below this would erase the forward progress the next
        // window's overlap subtraction needs.
        let min_cut = start + self.overlap_chars + 1;
        let window_start = hard_end.saturating_sub(self.boundary_lookback).max(min_cut);

        let bytes = text.as_bytes();
        for pos in (window_start..=hard_end).rev() {
            let prev = bytes[pos - 1];
            if prev == b'\n' {
                return pos;
            }
            if matches!(prev, b'.' | b'!' | b'?')
                && bytes.get(pos).is_some_and(|b| b.is_ascii_whitespace())
            {
                return pos;
            }
        }
        hard_end
    }
}

/// Largest index `<= at` that is a char boundary of `text`.
pub(crate) fn floor_char_boundary(text: &str, at: usize) -> usize {
    let mut idx = at.min(text.len());
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

/// Smallest index `>= at` that is a char boundary of `text`.
fn ceil_char_boundary(text: &str, at: usize) -> usize {
    let mut idx = at.min(text.len());
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}
