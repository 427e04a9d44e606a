//! Data types for documents, chunks, indexed records, and retrieval matches.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A fixed-length vector embedding of a text.
pub type Embedding = Vec<f32>;

/// An equality filter over record metadata, e.g. `patient_id = "p-172"`.
pub type MetadataFilter = HashMap<String, String>;

/// A source document produced by text extraction, ready for ingestion.
///
/// Immutable once built; its lifecycle ends when it has been chunked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// The patient this document belongs to, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    /// The extracted text content.
    pub text: String,
    /// Original filename of the upload.
    pub source_filename: String,
    /// Free-form metadata supplied by the uploader.
    pub metadata: HashMap<String, String>,
}

impl Document {
    /// Create a document with a caller-supplied id.
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        source_filename: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            patient_id: None,
            text: text.into(),
            source_filename: source_filename.into(),
            metadata: HashMap::new(),
        }
    }

    /// Create a document with a generated UUIDv4 id.
    pub fn with_generated_id(
        text: impl Into<String>,
        source_filename: impl Into<String>,
    ) -> Self {
        Self::new(Uuid::new_v4().to_string(), text, source_filename)
    }

    /// Attach the owning patient id.
    pub fn with_patient_id(mut self, patient_id: impl Into<String>) -> Self {
        self.patient_id = Some(patient_id.into());
        self
    }

    /// Replace the uploader metadata.
    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// A bounded, overlapping segment of a [`Document`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// 0-based order of appearance in the source text.
    pub sequence_index: usize,
    /// The segment text, at most the configured maximum length.
    pub text: String,
    /// Byte offset of the segment start in the source text (char boundary).
    pub char_start: usize,
    /// Byte offset one past the segment end in the source text (char boundary).
    pub char_end: usize,
    /// The id of the source [`Document`]. A back-reference, not ownership.
    pub document_id: String,
    /// Metadata inherited from the source document.
    pub metadata: HashMap<String, String>,
}

/// The persisted unit in the vector index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexedRecord {
    /// Globally unique record id, `{document_id}_{sequence_index}`.
    ///
    /// Deterministic, so re-ingesting a document overwrites its records
    /// instead of duplicating them.
    pub id: String,
    /// The embedding of the record content.
    pub vector: Embedding,
    /// Content and provenance metadata persisted alongside the vector.
    pub metadata: HashMap<String, String>,
}

/// A retrieved record paired with its similarity score.
///
/// Ephemeral — exists only for the duration of one query response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalMatch {
    /// The id of the matching record.
    pub record_id: String,
    /// The stored chunk text.
    pub content: String,
    /// Cosine similarity to the query vector (higher is more relevant).
    pub score: f32,
    /// Metadata persisted with the record.
    pub metadata: HashMap<String, String>,
}

/// Summary of one ingestion run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IngestReport {
    /// The ingested document id.
    pub document_id: String,
    /// Length of the extracted text in bytes.
    pub text_length: usize,
    /// Number of chunks produced from the text.
    pub chunks_created: usize,
    /// Number of records written to the vector index.
    pub records_written: usize,
}
