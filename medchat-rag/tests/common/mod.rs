//! Shared scripted collaborators for gateway and pipeline tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use medchat_rag::{
    Embedding, EmbeddingProvider, IndexedRecord, MetadataFilter, RagError, RetrievalMatch,
    VectorIndex,
};

/// Embedding provider that records batch shapes and can fail on demand.
pub struct ScriptedProvider {
    dimensions: usize,
    fail_on_call: Option<usize>,
    retryable_failure: bool,
    wrong_count_on_call: Option<usize>,
    calls: AtomicUsize,
    batch_sizes: Mutex<Vec<usize>>,
}

impl ScriptedProvider {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            fail_on_call: None,
            retryable_failure: false,
            wrong_count_on_call: None,
            calls: AtomicUsize::new(0),
            batch_sizes: Mutex::new(Vec::new()),
        }
    }

    /// Fail the nth `embed` call (0-based) with the given retryability.
    pub fn failing_at(dimensions: usize, call: usize, retryable: bool) -> Self {
        Self {
            fail_on_call: Some(call),
            retryable_failure: retryable,
            ..Self::new(dimensions)
        }
    }

    /// Return one vector too few on the nth `embed` call.
    pub fn wrong_count_at(dimensions: usize, call: usize) -> Self {
        Self { wrong_count_on_call: Some(call), ..Self::new(dimensions) }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn recorded_batches(&self) -> Vec<usize> {
        self.batch_sizes.lock().unwrap().clone()
    }

    /// Deterministic content-derived vector, so tests can predict outputs.
    pub fn vector_for(text: &str, dimensions: usize) -> Embedding {
        let mut vector = vec![0.0f32; dimensions];
        for (position, byte) in text.bytes().enumerate() {
            vector[position % dimensions] += f32::from(byte);
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Embedding>, RagError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.batch_sizes.lock().unwrap().push(texts.len());

        if self.fail_on_call == Some(call) {
            return Err(RagError::Embedding {
                provider: "scripted".to_string(),
                message: "injected failure".to_string(),
                retryable: self.retryable_failure,
            });
        }

        let mut vectors: Vec<Embedding> =
            texts.iter().map(|text| Self::vector_for(text, self.dimensions)).collect();
        if self.wrong_count_on_call == Some(call) {
            vectors.pop();
        }
        Ok(vectors)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Vector index that records calls, can fail on demand, and serves canned
/// query results.
pub struct ScriptedIndex {
    fail_on_upsert_call: Option<usize>,
    fail_on_query: bool,
    canned_matches: Vec<RetrievalMatch>,
    upsert_calls: AtomicUsize,
    query_calls: AtomicUsize,
    upsert_group_sizes: Mutex<Vec<usize>>,
    upserted: Mutex<Vec<IndexedRecord>>,
}

impl ScriptedIndex {
    pub fn new() -> Self {
        Self {
            fail_on_upsert_call: None,
            fail_on_query: false,
            canned_matches: Vec::new(),
            upsert_calls: AtomicUsize::new(0),
            query_calls: AtomicUsize::new(0),
            upsert_group_sizes: Mutex::new(Vec::new()),
            upserted: Mutex::new(Vec::new()),
        }
    }

    /// Fail the nth `upsert` call (0-based).
    pub fn failing_upsert_at(call: usize) -> Self {
        Self { fail_on_upsert_call: Some(call), ..Self::new() }
    }

    pub fn failing_query() -> Self {
        Self { fail_on_query: true, ..Self::new() }
    }

    pub fn with_matches(matches: Vec<RetrievalMatch>) -> Self {
        Self { canned_matches: matches, ..Self::new() }
    }

    pub fn upsert_call_count(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    pub fn query_call_count(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    pub fn recorded_upsert_groups(&self) -> Vec<usize> {
        self.upsert_group_sizes.lock().unwrap().clone()
    }

    pub fn upserted_records(&self) -> Vec<IndexedRecord> {
        self.upserted.lock().unwrap().clone()
    }
}

#[async_trait]
impl VectorIndex for ScriptedIndex {
    async fn upsert(&self, records: &[IndexedRecord]) -> Result<(), RagError> {
        let call = self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        self.upsert_group_sizes.lock().unwrap().push(records.len());

        if self.fail_on_upsert_call == Some(call) {
            return Err(RagError::VectorStore {
                backend: "scripted".to_string(),
                message: "injected upsert failure".to_string(),
                retryable: true,
            });
        }

        self.upserted.lock().unwrap().extend(records.iter().cloned());
        Ok(())
    }

    async fn query(
        &self,
        _vector: &[f32],
        _top_k: usize,
        _filter: Option<&MetadataFilter>,
    ) -> Result<Vec<RetrievalMatch>, RagError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);

        if self.fail_on_query {
            return Err(RagError::VectorStore {
                backend: "scripted".to_string(),
                message: "injected query failure".to_string(),
                retryable: true,
            });
        }

        Ok(self.canned_matches.clone())
    }
}

/// A match with the given id and score and empty metadata.
pub fn make_match(id: &str, score: f32) -> RetrievalMatch {
    RetrievalMatch {
        record_id: id.to_string(),
        content: format!("content of {id}"),
        score,
        metadata: HashMap::new(),
    }
}

/// A record with the given id and a small fixed vector.
pub fn make_record(id: &str) -> IndexedRecord {
    IndexedRecord {
        id: id.to_string(),
        vector: vec![1.0, 0.0, 0.0],
        metadata: HashMap::new(),
    }
}
