//! OpenAI embedding provider using the embeddings API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use medchat_rag::{Embedding, EmbeddingProvider, RagError};

/// The default OpenAI API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// The default embedding model.
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// The dimensionality of `text-embedding-ada-002`.
pub const DEFAULT_DIMENSIONS: usize = 1536;

/// An [`EmbeddingProvider`] backed by the OpenAI embeddings API.
///
/// Uses `reqwest` to call the `/embeddings` endpoint directly. Newlines are
/// replaced with spaces before embedding, as the API guidance recommends.
///
/// # Example
///
/// ```rust,ignore
/// use medchat_openai::OpenAiEmbeddings;
///
/// let provider = OpenAiEmbeddings::new("sk-...")?;
/// let vectors = provider.embed(&["hello world"]).await?;
/// ```
pub struct OpenAiEmbeddings {
    client: reqwest::Client,
    api_key: String,
    model: String,
    dimensions: usize,
    base_url: String,
}

impl OpenAiEmbeddings {
    /// Create a provider with the given API key and the default model.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Embedding`] if the key is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self, RagError> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(RagError::Embedding {
                provider: "openai".into(),
                message: "API key must not be empty".into(),
                retryable: false,
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            model: DEFAULT_EMBEDDING_MODEL.into(),
            dimensions: DEFAULT_DIMENSIONS,
            base_url: DEFAULT_BASE_URL.into(),
        })
    }

    /// Create a provider using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self, RagError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| RagError::Embedding {
            provider: "openai".into(),
            message: "OPENAI_API_KEY environment variable not set".into(),
            retryable: false,
        })?;
        Self::new(api_key)
    }

    /// Set the model name and its dimensionality.
    pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
        self.model = model.into();
        self.dimensions = dimensions;
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
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
pub(crate) struct ErrorResponse {
    pub(crate) error: ErrorDetail,
}

#[derive(Deserialize)]
pub(crate) struct ErrorDetail {
    pub(crate) message: String,
}

/// Rate limits and server-side failures are worth retrying with backoff.
pub(crate) fn status_is_retryable(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

// ── EmbeddingProvider implementation ───────────────────────────────

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    fn name(&self) -> &str {
        "openai"
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Embedding>, RagError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(
            provider = "openai",
            batch_size = texts.len(),
            model = %self.model,
            "embedding batch"
        );

        let input: Vec<String> = texts.iter().map(|text| text.replace('\n', " ")).collect();
        let request_body = EmbeddingRequest { model: &self.model, input };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "openai", error = %e, "embedding request failed");
                RagError::Embedding {
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

            error!(provider = "openai", %status, "embedding API error");
            return Err(RagError::Embedding {
                provider: "openai".into(),
                message: format!("API returned {status}: {detail}"),
                retryable: status_is_retryable(status),
            });
        }

        let embedding_response: EmbeddingResponse =
            response.json().await.map_err(|e| {
                error!(provider = "openai", error = %e, "failed to parse embedding response");
                RagError::Embedding {
                    provider: "openai".into(),
                    message: format!("failed to parse response: {e}"),
                    retryable: false,
                }
            })?;

        // Entries are keyed by `index`; restore input order before stripping it.
        let mut data = embedding_response.data;
        data.sort_by_key(|entry| entry.index);
        Ok(data.into_iter().map(|entry| entry.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
