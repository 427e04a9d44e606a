//! OpenAI chat-completion backend for the generation contract.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use medchat_core::{CoreError, GenerationModel, GenerationRequest};

use crate::embeddings::{DEFAULT_BASE_URL, ErrorResponse, status_is_retryable};

/// The default chat model.
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

/// A [`GenerationModel`] backed by the OpenAI chat completions API.
///
/// # Example
///
/// ```rust,ignore
/// use medchat_openai::OpenAiChat;
/// use medchat_core::GenerationRequest;
///
/// let model = OpenAiChat::new("sk-...")?;
/// let answer = model.generate(GenerationRequest::new("hello")).await?;
/// ```
pub struct OpenAiChat {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiChat {
    /// Create a chat client with the given API key and the default model.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Model`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self, CoreError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(CoreError::Model {
                provider: "openai".into(),
                message: "API key must not be empty".into(),
                retryable: false,
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_CHAT_MODEL.into(),
            base_url: DEFAULT_BASE_URL.into(),
        })
    }

    /// Create a chat client using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, CoreError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| CoreError::Model {
            provider: "openai".into(),
            message: "OPENAI_API_KEY environment variable not set".into(),
            retryable: false,
        })?;
        Self::new(api_key)
    }

    /// Set the model name (e.g. `gpt-4o-mini`).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL (self-hosted gateways, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set a request timeout on the underlying HTTP client.
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        self
    }
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

// ── GenerationModel implementation ─────────────────────────────────

#[async_trait]
impl GenerationModel for OpenAiChat {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, request: GenerationRequest) -> Result<String, CoreError> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system_prompt) = &request.system_prompt {
            messages.push(ChatMessage { role: "system", content: system_prompt });
        }
        messages.push(ChatMessage { role: "user", content: &request.user_message });

        debug!(
            provider = "openai",
            model = %self.model,
            max_tokens = request.max_tokens,
            "generating chat completion"
        );

        let request_body = ChatRequest {
            model: &self.model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "openai", error = %e, "chat request failed");
                CoreError::Model {
                    provider: "openai".into(),
                    message: format!("request failed: {e}"),
                    retryable: e.is_timeout() || e.is_connect(),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            error!(provider = "openai", %status, "chat API error");
            return Err(CoreError::Model {
                provider: "openai".into(),
                message: format!("API returned {status}: {detail}"),
                retryable: status_is_retryable(status),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(provider = "openai", error = %e, "failed to parse chat response");
            CoreError::Model {
                provider: "openai".into(),
                message: format!("failed to parse response: {e}"),
                retryable: false,
            }
        })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| CoreError::Model {
                provider: "openai".into(),
                message: "API returned no choices".into(),
                retryable: false,
            })?;

        Ok(content.trim().to_string())
    }
}
