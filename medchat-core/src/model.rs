//! Generation model contract and a deterministic mock.
//!
//! The retrieval core hands an assembled context block to a generation
//! backend through [`GenerationModel`]. Real implementations wrap a chat
//! completion API; [`MockModel`] answers deterministically for tests and
//! offline development.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

/// Default token budget for a generated answer.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// A single generation call: an optional system prompt plus the user message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationRequest {
    /// System prompt carrying guidelines and retrieved context.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// The user's question, passed through unmodified.
    pub user_message: String,
    /// Maximum number of tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
}

impl GenerationRequest {
    /// Create a request with the default token budget and temperature.
    pub fn new(user_message: impl Into<String>) -> Self {
        Self {
            system_prompt: None,
            user_message: user_message.into(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Attach a system prompt.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    /// Override the token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Override the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// A text-generation backend. One `generate` invocation is one network
/// round trip; callers own timeout and retry policy.
#[async_trait]
pub trait GenerationModel: Send + Sync {
    /// The model identifier, for logging and error reporting.
    fn name(&self) -> &str;

    /// Generate a completion for the request.
    async fn generate(&self, request: GenerationRequest) -> Result<String>;
}

/// Deterministic stand-in for a generation backend.
///
/// Echoes the user message and notes whether context was attached, so tests
/// can assert on the exact output without a live model.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockModel;

#[async_trait]
impl GenerationModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String> {
        debug!(user_message_len = request.user_message.len(), "mock generation");
        let context_note = if request.system_prompt.is_some() {
            " (grounded in provided context)"
        } else {
            ""
        };
        Ok(format!(
            "Mock response{context_note}: your query was '{}'.",
            request.user_message
        ))
    }
}
