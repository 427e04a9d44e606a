//! Vector index contract and the batching/ranking gateway in front of it.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::document::{IndexedRecord, MetadataFilter, RetrievalMatch};
use crate::error::{RagError, Result};

/// Default number of records per upsert call. Pinecone recommends at most
/// 100 vectors per upsert request.
pub const DEFAULT_UPSERT_BATCH_SIZE: usize = 100;

/// A storage backend for vectors with similarity search.
///
/// One method invocation is one external call. Upserts are idempotent by
/// record id: writing the same id twice leaves one record. The native
/// ordering for equal scores is NOT guaranteed — the [`IndexGateway`]
/// imposes a deterministic order on results.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Upsert records in a single call.
    async fn upsert(&self, records: &[IndexedRecord]) -> Result<()>;

    /// Return the `top_k` records most similar to `vector`, optionally
    /// restricted by an equality filter over metadata.
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<RetrievalMatch>>;
}

/// Batches upserts toward a rate-limited [`VectorIndex`] and ranks query
/// results deterministically.
///
/// Upserts are partitioned into contiguous groups of at most `batch_size`
/// and issued sequentially; a group failure surfaces as
/// [`RagError::UpsertFailure`] carrying the count written before the
/// failure, so a 500-chunk ingestion is not reported all-or-nothing.
#[derive(Clone)]
pub struct IndexGateway {
    index: Arc<dyn VectorIndex>,
    batch_size: usize,
}

impl IndexGateway {
    /// Create a gateway with the given per-call group size.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfiguration`] if `batch_size` is zero.
    pub fn new(index: Arc<dyn VectorIndex>, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(RagError::InvalidConfiguration(
                "upsert batch_size must be greater than zero".to_string(),
            ));
        }
        Ok(Self { index, batch_size })
    }

    /// Upsert `records`, returning the number of records written.
    ///
    /// Empty input returns zero without calling the index.
    pub async fn upsert_batch(&self, records: &[IndexedRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let group_count = records.len().div_ceil(self.batch_size);
        let mut written = 0;

        for (group_index, group) in records.chunks(self.batch_size).enumerate() {
            self.index.upsert(group).await.map_err(|e| RagError::UpsertFailure {
                records_written: written,
                failed_group_index: group_index,
                source: Box::new(e),
            })?;
            written += group.len();
            debug!(group_index, group_count, written, "upserted batch group");
        }

        Ok(written)
    }

    /// Return the `k` most similar records, ordered by descending score with
    /// ties broken by ascending record id.
    ///
    /// The tie-break makes rankings reproducible for a fixed index snapshot
    /// regardless of the backing store's native order for equal scores.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidArgument`] if `k` is zero, or
    /// [`RagError::QueryFailure`] wrapping the index error.
    pub async fn query_top_k(
        &self,
        vector: &[f32],
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<RetrievalMatch>> {
        if k == 0 {
            return Err(RagError::InvalidArgument(
                "k must be greater than zero".to_string(),
            ));
        }

        let mut matches = self
            .index
            .query(vector, k, filter)
            .await
            .map_err(|e| RagError::QueryFailure { source: Box::new(e) })?;

        matches.sort_by(|a, b| {
            b.score.total_cmp(&a.score).then_with(|| a.record_id.cmp(&b.record_id))
        });
        matches.truncate(k);

        debug!(k, match_count = matches.len(), "ranked query results");
        Ok(matches)
    }
}
