//! # medchat-core
//!
//! Shared collaborator contracts for the MedChat patient-document assistant.
//!
//! The retrieval core in `medchat-rag` treats three things as black boxes:
//! text extraction from uploaded files, the generation model, and the vector
//! index. This crate holds the first two contracts (the vector-index contract
//! lives next to its gateway in `medchat-rag`) plus the base error type they
//! report through:
//!
//! - [`TextExtractor`] — file bytes to raw text
//! - [`GenerationModel`] — prompt to completion
//! - [`CoreError`] — extraction and model failures, with a transient/permanent
//!   distinction callers can use for backoff decisions
//!
//! Deterministic implementations ([`PlainTextExtractor`], [`MockModel`]) ship
//! in-crate so the pipeline can be exercised without any live service.

pub mod error;
pub mod extract;
pub mod model;

pub use error::{CoreError, Result};
pub use extract::{PlainTextExtractor, TextExtractor, clean_extracted_text};
pub use model::{
    DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE, GenerationModel, GenerationRequest, MockModel,
};
