//! Embedding provider contract and the batching gateway in front of it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::document::Embedding;
use crate::error::{RagError, Result};

/// Default number of texts per provider call. The OpenAI embeddings API
/// accepts up to 2048 inputs per request; 2000 leaves headroom.
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 2000;

/// A backend that turns text into fixed-length vectors.
///
/// One [`embed`](EmbeddingProvider::embed) invocation is one network round
/// trip; the caller keeps `texts` within the backend's per-call limit.
/// Transient failures (rate limits, timeouts) must be reported with
/// `retryable = true` so callers can apply their own backoff — this crate
/// never retries on its own.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// The provider identifier, for logging and error reporting.
    fn name(&self) -> &str;

    /// Embed a group of texts in a single call, preserving order.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Embedding>>;

    /// The dimensionality of the vectors this provider produces.
    fn dimensions(&self) -> usize;
}

/// Batches embedding work toward a rate-limited [`EmbeddingProvider`].
///
/// Partitions input into contiguous groups of at most `batch_size`, issues
/// one provider call per group sequentially, and concatenates the results in
/// the original order. A failure in one group fails the whole call with
/// [`RagError::EmbeddingFailure`] naming the group — partial success is never
/// silently swallowed; the caller decides whether to retry or abort.
#[derive(Clone)]
pub struct EmbedderGateway {
    provider: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
}

impl EmbedderGateway {
    /// Create a gateway with the given per-call group size.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfiguration`] if `batch_size` is zero.
    pub fn new(provider: Arc<dyn EmbeddingProvider>, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(RagError::InvalidConfiguration(
                "embed batch_size must be greater than zero".to_string(),
            ));
        }
        Ok(Self { provider, batch_size })
    }

    /// The dimensionality of the underlying provider.
    pub fn dimensions(&self) -> usize {
        self.provider.dimensions()
    }

    /// Embed `texts`, returning one vector per input, in input order.
    ///
    /// Empty input returns an empty `Vec` without calling the provider.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Embedding>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let group_count = texts.len().div_ceil(self.batch_size);
        let mut vectors = Vec::with_capacity(texts.len());

        for (group_index, group) in texts.chunks(self.batch_size).enumerate() {
            let refs: Vec<&str> = group.iter().map(String::as_str).collect();
            let group_vectors = self.provider.embed(&refs).await.map_err(|e| {
                RagError::EmbeddingFailure {
                    group_index,
                    retryable: e.is_retryable(),
                    source: Box::new(e),
                }
            })?;

            if group_vectors.len() != group.len() {
                return Err(RagError::EmbeddingFailure {
                    group_index,
                    retryable: false,
                    source: Box::new(RagError::Embedding {
                        provider: self.provider.name().to_string(),
                        message: format!(
                            "provider returned {} vectors for {} inputs",
                            group_vectors.len(),
                            group.len()
                        ),
                        retryable: false,
                    }),
                });
            }

            debug!(
                provider = self.provider.name(),
                group_index,
                group_count,
                group_len = group.len(),
                "embedded batch group"
            );
            vectors.extend(group_vectors);
        }

        Ok(vectors)
    }

    /// Embed a single query string.
    pub async fn embed_one(&self, text: &str) -> Result<Embedding> {
        let group_vectors =
            self.provider.embed(&[text]).await.map_err(|e| RagError::EmbeddingFailure {
                group_index: 0,
                retryable: e.is_retryable(),
                source: Box::new(e),
            })?;

        group_vectors.into_iter().next().ok_or_else(|| RagError::Embedding {
            provider: self.provider.name().to_string(),
            message: "provider returned no vector for a single-text call".to_string(),
            retryable: false,
        })
    }
}
