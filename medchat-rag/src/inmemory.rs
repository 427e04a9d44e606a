//! In-memory vector index using cosine similarity.
//!
//! [`InMemoryVectorIndex`] is a zero-dependency index backed by a `HashMap`
//! behind a `tokio::sync::RwLock`. It is suitable for development, tests,
//! and small single-process deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{IndexedRecord, MetadataFilter, RetrievalMatch};
use crate::error::Result;
use crate::vectorindex::VectorIndex;

/// An in-memory [`VectorIndex`] using cosine similarity for search.
///
/// Records are keyed by id, so upserts are idempotent. Query results are
/// ordered by descending score with ties broken by ascending record id,
/// matching the ordering the gateway imposes.
#[derive(Debug, Default)]
pub struct InMemoryVectorIndex {
    records: RwLock<HashMap<String, IndexedRecord>>,
}

impl InMemoryVectorIndex {
    /// Create a new empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// Whether the index holds no records.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Whether a record satisfies an equality filter over its metadata.
fn matches_filter(record: &IndexedRecord, filter: Option<&MetadataFilter>) -> bool {
    match filter {
        Some(filter) => filter.iter().all(|(key, value)| record.metadata.get(key) == Some(value)),
        None => true,
    }
}

#[async_trait]
impl VectorIndex for InMemoryVectorIndex {
    async fn upsert(&self, records: &[IndexedRecord]) -> Result<()> {
        let mut store = self.records.write().await;
        for record in records {
            store.insert(record.id.clone(), record.clone());
        }
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<RetrievalMatch>> {
        let store = self.records.read().await;

        let mut scored: Vec<RetrievalMatch> = store
            .values()
            .filter(|record| matches_filter(record, filter))
            .map(|record| RetrievalMatch {
                record_id: record.id.clone(),
                content: record.metadata.get("content").cloned().unwrap_or_default(),
                score: cosine_similarity(&record.vector, vector),
                metadata: record.metadata.clone(),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score.total_cmp(&a.score).then_with(|| a.record_id.cmp(&b.record_id))
        });
        scored.truncate(top_k);
        Ok(scored)
    }
}
