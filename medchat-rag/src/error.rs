//! Error types for the `medchat-rag` crate.
//!
//! The taxonomy distinguishes caller bugs (`InvalidConfiguration`,
//! `InvalidArgument`), empty input (`NoExtractableContent`), and external
//! failures. External failures carry enough detail — which batch group,
//! how much progress was made, whether a retry is worthwhile — for callers
//! to report partial success instead of a generic error.

use thiserror::Error;

/// Errors that can occur in retrieval and ingestion operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// A configuration parameter failed validation. Fatal, caller bug.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A call argument failed validation, e.g. `k == 0`.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The document text is empty after extraction. Reported before any
    /// external call is made; not retried.
    #[error("no extractable content in document '{document_id}'")]
    NoExtractableContent {
        /// The offending document id.
        document_id: String,
    },

    /// An embedding provider call failed.
    #[error("embedding provider error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
        /// Whether the caller may retry with backoff (rate limits, timeouts).
        retryable: bool,
    },

    /// A batch group failed inside the embedder gateway.
    #[error("embedding failed for batch group {group_index}")]
    EmbeddingFailure {
        /// 0-based index of the failing group.
        group_index: usize,
        /// Whether retrying the failed group is worthwhile.
        retryable: bool,
        /// The underlying provider failure.
        #[source]
        source: Box<RagError>,
    },

    /// A vector index call failed.
    #[error("vector index error ({backend}): {message}")]
    VectorStore {
        /// The index backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
        /// Whether the caller may retry with backoff.
        retryable: bool,
    },

    /// A batch group failed inside the index gateway during upsert.
    ///
    /// `records_written` counts the records persisted by the groups that
    /// completed before the failure, so ingestion can report partial success.
    #[error("upsert failed at batch group {failed_group_index} after {records_written} records written")]
    UpsertFailure {
        /// Records persisted before the failing group.
        records_written: usize,
        /// 0-based index of the failing group.
        failed_group_index: usize,
        /// The underlying index failure.
        #[source]
        source: Box<RagError>,
    },

    /// A top-k similarity query failed. Treated as retryable by default.
    #[error("vector query failed")]
    QueryFailure {
        /// The underlying index failure.
        #[source]
        source: Box<RagError>,
    },

    /// A gateway failure re-raised with pipeline-stage context.
    #[error("pipeline failed during {stage}")]
    Pipeline {
        /// The pipeline stage that failed, e.g. `"embedding"`.
        stage: &'static str,
        /// The underlying gateway failure.
        #[source]
        source: Box<RagError>,
    },

    /// An error propagated from `medchat-core` collaborators.
    #[error(transparent)]
    Core(#[from] medchat_core::CoreError),
}

impl RagError {
    /// Whether the failure is transient and worth retrying with backoff.
    ///
    /// Folds through gateway and pipeline wrappers so the distinction
    /// survives re-raising.
    pub fn is_retryable(&self) -> bool {
        match self {
            RagError::Embedding { retryable, .. }
            | RagError::EmbeddingFailure { retryable, .. }
            | RagError::VectorStore { retryable, .. } => *retryable,
            RagError::QueryFailure { .. } => true,
            RagError::UpsertFailure { source, .. } | RagError::Pipeline { source, .. } => {
                source.is_retryable()
            }
            RagError::Core(e) => e.is_retryable(),
            RagError::InvalidConfiguration(_)
            | RagError::InvalidArgument(_)
            | RagError::NoExtractableContent { .. } => false,
        }
    }
}

/// A convenience result type for retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
