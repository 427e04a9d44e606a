//! RAG pipeline orchestrator.
//!
//! [`RagPipeline`] coordinates the ingestion path (chunk → embed → upsert)
//! and the query path (embed → top-k query → ranked matches) by composing a
//! [`BoundaryChunker`], an [`EmbedderGateway`], and an [`IndexGateway`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use medchat_rag::{Document, InMemoryVectorIndex, MockEmbeddings, RagConfig, RagPipeline};
//!
//! let pipeline = RagPipeline::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(MockEmbeddings::default()))
//!     .vector_index(Arc::new(InMemoryVectorIndex::new()))
//!     .build()?;
//!
//! let report = pipeline.ingest(&document).await?;
//! let matches = pipeline.retrieve("current medications", 3).await?;
//! ```

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};

use crate::chunking::BoundaryChunker;
use crate::config::RagConfig;
use crate::document::{
    Chunk, Document, Embedding, IndexedRecord, IngestReport, MetadataFilter, RetrievalMatch,
};
use crate::embedding::{EmbedderGateway, EmbeddingProvider};
use crate::error::{RagError, Result};
use crate::vectorindex::{IndexGateway, VectorIndex};

/// The RAG pipeline orchestrator.
///
/// Holds no mutable state; concurrent ingestion and query calls from
/// unrelated requests are safe. Construct one via
/// [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: RagConfig,
    chunker: BoundaryChunker,
    embedder: EmbedderGateway,
    index: IndexGateway,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the embedder gateway.
    pub fn embedder(&self) -> &EmbedderGateway {
        &self.embedder
    }

    /// Return a reference to the index gateway.
    pub fn index(&self) -> &IndexGateway {
        &self.index
    }

    /// Ingest a document: chunk → embed → upsert.
    ///
    /// Fails fast with [`RagError::NoExtractableContent`] when the text is
    /// empty or whitespace, before any external call is made. Gateway
    /// failures are re-raised wrapped with the pipeline stage
    /// ([`RagError::Pipeline`]); the upsert wrapper still carries the count
    /// of records written before the failure.
    pub async fn ingest(&self, document: &Document) -> Result<IngestReport> {
        if document.text.trim().is_empty() {
            return Err(RagError::NoExtractableContent { document_id: document.id.clone() });
        }

        let chunks = self.chunker.chunk(document);
        let chunk_count = chunks.len();
        debug!(document.id = %document.id, chunk_count, "chunked document");

        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
        let vectors = self.embedder.embed_batch(&texts).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "embedding failed during ingestion");
            RagError::Pipeline { stage: "embedding", source: Box::new(e) }
        })?;

        let upload_timestamp = Utc::now().to_rfc3339();
        let records: Vec<IndexedRecord> = chunks
            .iter()
            .zip(vectors)
            .map(|(chunk, vector)| build_record(document, chunk, vector, &upload_timestamp))
            .collect();

        let records_written = self.index.upsert_batch(&records).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "upsert failed during ingestion");
            RagError::Pipeline { stage: "upsert", source: Box::new(e) }
        })?;

        info!(
            document.id = %document.id,
            chunk_count,
            records_written,
            "ingested document"
        );

        Ok(IngestReport {
            document_id: document.id.clone(),
            text_length: document.text.len(),
            chunks_created: chunk_count,
            records_written,
        })
    }

    /// Retrieve the `k` most relevant records for a query.
    ///
    /// Zero matches is a valid result, not an error; the caller proceeds
    /// with a context-free prompt.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<RetrievalMatch>> {
        self.retrieve_with_filter(query, k, None).await
    }

    /// Retrieve scoped to a single patient's records.
    pub async fn retrieve_for_patient(
        &self,
        query: &str,
        k: usize,
        patient_id: &str,
    ) -> Result<Vec<RetrievalMatch>> {
        let mut filter = MetadataFilter::new();
        filter.insert("patient_id".to_string(), patient_id.to_string());
        self.retrieve_with_filter(query, k, Some(&filter)).await
    }

    async fn retrieve_with_filter(
        &self,
        query: &str,
        k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<RetrievalMatch>> {
        let query_vector = self.embedder.embed_one(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            RagError::Pipeline { stage: "query embedding", source: Box::new(e) }
        })?;

        let matches = self.index.query_top_k(&query_vector, k, filter).await?;
        info!(k, match_count = matches.len(), "retrieval completed");
        Ok(matches)
    }
}

/// Merge document-level and chunk-level fields into the record metadata and
/// assign the deterministic record id.
fn build_record(
    document: &Document,
    chunk: &Chunk,
    vector: Embedding,
    upload_timestamp: &str,
) -> IndexedRecord {
    let mut metadata = chunk.metadata.clone();
    metadata.insert("content".to_string(), chunk.text.clone());
    metadata.insert("content_length".to_string(), chunk.text.len().to_string());
    metadata.insert("sequence_index".to_string(), chunk.sequence_index.to_string());
    metadata.insert("source_filename".to_string(), document.source_filename.clone());
    metadata.insert("upload_timestamp".to_string(), upload_timestamp.to_string());
    if let Some(patient_id) = &document.patient_id {
        metadata.insert("patient_id".to_string(), patient_id.clone());
    }

    IndexedRecord {
        id: format!("{}_{}", document.id, chunk.sequence_index),
        vector,
        metadata,
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// All fields are required. [`build()`](RagPipelineBuilder::build) validates
/// the configuration and constructs the chunker and both gateways from it.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_index: Option<Arc<dyn VectorIndex>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector index backend.
    pub fn vector_index(mut self, index: Arc<dyn VectorIndex>) -> Self {
        self.vector_index = Some(index);
        self
    }

    /// Build the [`RagPipeline`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfiguration`] if a required field is
    /// missing or a configured limit fails validation.
    pub fn build(self) -> Result<RagPipeline> {
        let config = self
            .config
            .ok_or_else(|| RagError::InvalidConfiguration("config is required".to_string()))?;
        let provider = self.embedding_provider.ok_or_else(|| {
            RagError::InvalidConfiguration("embedding_provider is required".to_string())
        })?;
        let index = self.vector_index.ok_or_else(|| {
            RagError::InvalidConfiguration("vector_index is required".to_string())
        })?;

        let chunker = BoundaryChunker::with_lookback(
            config.chunk_max_chars,
            config.chunk_overlap_chars,
            config.boundary_lookback_chars,
        )?;
        let embedder = EmbedderGateway::new(provider, config.embed_batch_size)?;
        let index = IndexGateway::new(index, config.upsert_batch_size)?;

        Ok(RagPipeline { config, chunker, embedder, index })
    }
}
