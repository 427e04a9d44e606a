//! Error types shared by the MedChat collaborator contracts.

use thiserror::Error;

/// Errors produced by the collaborator contracts in this crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Text extraction failed on corrupt, encrypted, or undecodable input.
    #[error("text extraction failed: {message}")]
    Extraction {
        /// A description of the failure.
        message: String,
    },

    /// A generation model call failed.
    #[error("generation model error ({provider}): {message}")]
    Model {
        /// The model provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
        /// Whether the caller may retry with backoff (rate limits, timeouts).
        retryable: bool,
    },
}

impl CoreError {
    /// Whether the failure is transient and worth retrying with backoff.
    pub fn is_retryable(&self) -> bool {
        match self {
            CoreError::Extraction { .. } => false,
            CoreError::Model { retryable, .. } => *retryable,
        }
    }
}

/// A convenience result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
