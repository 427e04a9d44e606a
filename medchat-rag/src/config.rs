//! Configuration for the RAG pipeline.
//!
//! All numeric limits are validated once at construction; components built
//! from a [`RagConfig`] never re-validate per call.

use serde::{Deserialize, Serialize};

use crate::chunking::DEFAULT_BOUNDARY_LOOKBACK;
use crate::embedding::DEFAULT_EMBED_BATCH_SIZE;
use crate::error::{RagError, Result};
use crate::prompt::DEFAULT_SNIPPET_MAX_CHARS;
use crate::vectorindex::DEFAULT_UPSERT_BATCH_SIZE;

/// Configuration parameters for the RAG pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RagConfig {
    /// Maximum chunk size. Measured in bytes, snapped to char boundaries.
    pub chunk_max_chars: usize,
    /// Overlap between consecutive chunks.
    pub chunk_overlap_chars: usize,
    /// Look-back window for boundary-aware cut adjustment. Zero disables
    /// adjustment and every cut is a hard cut.
    pub boundary_lookback_chars: usize,
    /// Maximum texts per embedding provider call.
    pub embed_batch_size: usize,
    /// Maximum records per vector index upsert call.
    pub upsert_batch_size: usize,
    /// Default number of matches to retrieve for a query.
    pub top_k: usize,
    /// Display length for match content in assembled context.
    pub snippet_max_chars: usize,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chunk_max_chars: 1000,
            chunk_overlap_chars: 200,
            boundary_lookback_chars: DEFAULT_BOUNDARY_LOOKBACK,
            embed_batch_size: DEFAULT_EMBED_BATCH_SIZE,
            upsert_batch_size: DEFAULT_UPSERT_BATCH_SIZE,
            top_k: 3,
            snippet_max_chars: DEFAULT_SNIPPET_MAX_CHARS,
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the maximum chunk size.
    pub fn chunk_max_chars(mut self, max: usize) -> Self {
        self.config.chunk_max_chars = max;
        self
    }

    /// Set the overlap between consecutive chunks.
    pub fn chunk_overlap_chars(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap_chars = overlap;
        self
    }

    /// Set the boundary-adjustment look-back window.
    pub fn boundary_lookback_chars(mut self, lookback: usize) -> Self {
        self.config.boundary_lookback_chars = lookback;
        self
    }

    /// Set the maximum texts per embedding call.
    pub fn embed_batch_size(mut self, size: usize) -> Self {
        self.config.embed_batch_size = size;
        self
    }

    /// Set the maximum records per upsert call.
    pub fn upsert_batch_size(mut self, size: usize) -> Self {
        self.config.upsert_batch_size = size;
        self
    }

    /// Set the default number of matches to retrieve.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the display length for match content.
    pub fn snippet_max_chars(mut self, chars: usize) -> Self {
        self.config.snippet_max_chars = chars;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfiguration`] if:
    /// - `chunk_overlap_chars >= chunk_max_chars`
    /// - `embed_batch_size == 0` or `upsert_batch_size == 0`
    /// - `top_k == 0` or `snippet_max_chars == 0`
    pub fn build(self) -> Result<RagConfig> {
        let config = self.config;
        if config.chunk_overlap_chars >= config.chunk_max_chars {
            return Err(RagError::InvalidConfiguration(format!(
                "chunk_overlap_chars ({}) must be less than chunk_max_chars ({})",
                config.chunk_overlap_chars, config.chunk_max_chars
            )));
        }
        if config.embed_batch_size == 0 {
            return Err(RagError::InvalidConfiguration(
                "embed_batch_size must be greater than zero".to_string(),
            ));
        }
        if config.upsert_batch_size == 0 {
            return Err(RagError::InvalidConfiguration(
                "upsert_batch_size must be greater than zero".to_string(),
            ));
        }
        if config.top_k == 0 {
            return Err(RagError::InvalidConfiguration(
                "top_k must be greater than zero".to_string(),
            ));
        }
        if config.snippet_max_chars == 0 {
            return Err(RagError::InvalidConfiguration(
                "snippet_max_chars must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }
}
