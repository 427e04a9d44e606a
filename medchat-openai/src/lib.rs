//! # medchat-openai
//!
//! OpenAI clients for the MedChat patient-document assistant:
//!
//! - [`OpenAiEmbeddings`] — implements `medchat_rag::EmbeddingProvider` over
//!   the `/embeddings` endpoint (`text-embedding-ada-002`, 1536 dimensions)
//! - [`OpenAiChat`] — implements `medchat_core::GenerationModel` over the
//!   `/chat/completions` endpoint (`gpt-3.5-turbo` by default)
//!
//! Both clients surface rate limits, timeouts, and 5xx responses as
//! retryable errors so callers can apply their own backoff, and accept a
//! base-URL override for gateways and tests.

pub mod chat;
pub mod embeddings;

pub use chat::{DEFAULT_CHAT_MODEL, OpenAiChat};
pub use embeddings::{
    DEFAULT_BASE_URL, DEFAULT_DIMENSIONS, DEFAULT_EMBEDDING_MODEL, OpenAiEmbeddings,
};
