//! # medchat-rag
//!
//! Retrieval-Augmented Generation core for the MedChat patient-document
//! assistant: answer natural-language questions about a patient by
//! retrieving semantically relevant fragments of previously ingested
//! documents and feeding them as context to a generation model.
//!
//! ## Overview
//!
//! - [`BoundaryChunker`] — splits extracted text into overlapping,
//!   boundary-aware segments
//! - [`EmbedderGateway`] — batches texts toward a rate-limited
//!   [`EmbeddingProvider`] with order-preserving concatenation
//! - [`IndexGateway`] — batches upserts toward a [`VectorIndex`] and ranks
//!   query results deterministically
//! - [`RagPipeline`] — orchestrates ingestion (chunk → embed → upsert) and
//!   retrieval (embed → query → ranked matches)
//! - [`RagAssistant`] — grounds a generation model in retrieved context
//!
//! The embedding model and the vector index are external collaborators
//! behind trait contracts; [`MockEmbeddings`] and [`InMemoryVectorIndex`]
//! ship in-crate so the whole pipeline runs without any live service.
//!
//! ## Quick start
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
//! let document = Document::new("doc-1", extracted_text, "visit-notes.pdf")
//!     .with_patient_id("patient-42");
//! let report = pipeline.ingest(&document).await?;
//! let matches = pipeline.retrieve("current medications", 3).await?;
//! ```

pub mod assistant;
pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod mock;
pub mod pipeline;
pub mod prompt;
pub mod vectorindex;

pub use assistant::{AssistantOptions, AssistantReply, RagAssistant};
pub use chunking::{BoundaryChunker, DEFAULT_BOUNDARY_LOOKBACK};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{
    Chunk, Document, Embedding, IndexedRecord, IngestReport, MetadataFilter, RetrievalMatch,
};
pub use embedding::{DEFAULT_EMBED_BATCH_SIZE, EmbedderGateway, EmbeddingProvider};
pub use error::{RagError, Result};
pub use inmemory::InMemoryVectorIndex;
pub use mock::MockEmbeddings;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use prompt::{
    DEFAULT_SNIPPET_MAX_CHARS, PatientScope, PromptBuilder, assemble_context, snippet,
};
pub use vectorindex::{DEFAULT_UPSERT_BATCH_SIZE, IndexGateway, VectorIndex};
