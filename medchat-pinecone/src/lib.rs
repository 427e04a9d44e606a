//! # medchat-pinecone
//!
//! Pinecone backend for the MedChat retrieval core. [`PineconeIndex`]
//! implements `medchat_rag::VectorIndex` against the Pinecone data-plane
//! REST API: `/vectors/upsert`, `/query` with `$eq` metadata filters, and
//! `/describe_index_stats`.
//!
//! Rate limits, timeouts, and 5xx responses surface as retryable
//! `RagError::VectorStore` errors so callers can apply their own backoff.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use medchat_pinecone::PineconeIndex;
//!
//! let index = PineconeIndex::new(
//!     "https://records-abc123.svc.us-east-1.pinecone.io",
//!     std::env::var("PINECONE_API_KEY")?,
//! )?;
//! index.upsert(&records).await?;
//! let matches = index.query(&query_vector, 3, None).await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, error};

use medchat_rag::{IndexedRecord, MetadataFilter, RagError, RetrievalMatch, VectorIndex};

/// A [`VectorIndex`] backed by a Pinecone serverless index.
///
/// `host` is the index's data-plane URL from the Pinecone console. All
/// records live in the configured namespace (the default namespace unless
/// overridden).
pub struct PineconeIndex {
    client: reqwest::Client,
    host: String,
    api_key: String,
    namespace: Option<String>,
}

impl PineconeIndex {
    /// Create a client for the given index host and API key.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::VectorStore`] if the host or key is empty.
    pub fn new(host: impl Into<String>, api_key: impl Into<String>) -> Result<Self, RagError> {
        let host = host.into().trim_end_matches('/').to_string();
        let api_key = api_key.into();
        if host.is_empty() || api_key.is_empty() {
            return Err(RagError::VectorStore {
                backend: "pinecone".into(),
                message: "index host and API key must not be empty".into(),
                retryable: false,
            });
        }

        Ok(Self { client: reqwest::Client::new(), host, api_key, namespace: None })
    }

    /// Create a client from the `PINECONE_INDEX_HOST` and
    /// `PINECONE_API_KEY` environment variables.
    pub fn from_env() -> Result<Self, RagError> {
        let host = std::env::var("PINECONE_INDEX_HOST").map_err(|_| RagError::VectorStore {
            backend: "pinecone".into(),
            message: "PINECONE_INDEX_HOST environment variable not set".into(),
            retryable: false,
        })?;
        let api_key = std::env::var("PINECONE_API_KEY").map_err(|_| RagError::VectorStore {
            backend: "pinecone".into(),
            message: "PINECONE_API_KEY environment variable not set".into(),
            retryable: false,
        })?;
        Self::new(host, api_key)
    }

    /// Scope all operations to a namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
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

    /// Fetch index statistics: vector counts, dimension, fullness.
    pub async fn describe_index_stats(&self) -> Result<IndexStats, RagError> {
        let response = self
            .client
            .post(format!("{}/describe_index_stats", self.host))
            .header("Api-Key", &self.api_key)
            .json(&json!({}))
            .send()
            .await
            .map_err(request_error)?;

        let response = check_status(response).await?;
        response.json().await.map_err(parse_error)
    }

    fn request_body_namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }
}

/// Index statistics from `/describe_index_stats`.
#[derive(Debug, Clone, Deserialize)]
pub struct IndexStats {
    /// Total vectors across all namespaces.
    #[serde(rename = "totalVectorCount", default)]
    pub total_vector_count: u64,
    /// The index dimensionality.
    #[serde(default)]
    pub dimension: usize,
    /// Fraction of index capacity in use.
    #[serde(rename = "indexFullness", default)]
    pub index_fullness: f32,
    /// Per-namespace vector counts.
    #[serde(default)]
    pub namespaces: HashMap<String, NamespaceStats>,
}

/// Per-namespace statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct NamespaceStats {
    /// Vectors stored in the namespace.
    #[serde(rename = "vectorCount", default)]
    pub vector_count: u64,
}

// ── Pinecone API request/response types ────────────────────────────

#[derive(Serialize)]
struct VectorPayload<'a> {
    id: &'a str,
    values: &'a [f32],
    metadata: &'a HashMap<String, String>,
}

#[derive(Serialize)]
struct UpsertRequest<'a> {
    vectors: Vec<VectorPayload<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    vector: &'a [f32],
    #[serde(rename = "topK")]
    top_k: usize,
    #[serde(rename = "includeMetadata")]
    include_metadata: bool,
    #[serde(rename = "includeValues")]
    include_values: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<&'a str>,
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<PineconeMatch>,
}

#[derive(Deserialize)]
struct PineconeMatch {
    id: String,
    score: f32,
    #[serde(default)]
    metadata: HashMap<String, String>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

/// Render an equality filter as Pinecone's `$eq` filter object.
fn eq_filter(filter: &MetadataFilter) -> Value {
    let fields: serde_json::Map<String, Value> = filter
        .iter()
        .map(|(key, value)| (key.clone(), json!({ "$eq": value })))
        .collect();
    Value::Object(fields)
}

fn request_error(e: reqwest::Error) -> RagError {
    error!(backend = "pinecone", error = %e, "request failed");
    RagError::VectorStore {
        backend: "pinecone".into(),
        message: format!("request failed: {e}"),
        retryable: e.is_timeout() || e.is_connect(),
    }
}

fn parse_error(e: reqwest::Error) -> RagError {
    error!(backend = "pinecone", error = %e, "failed to parse response");
    RagError::VectorStore {
        backend: "pinecone".into(),
        message: format!("failed to parse response: {e}"),
        retryable: false,
    }
}

/// Map non-success statuses to `VectorStore` errors, marking rate limits
/// and server errors retryable.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RagError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ApiError>(&body)
        .map(|e| e.message)
        .unwrap_or(body);

    error!(backend = "pinecone", %status, "API error");
    Err(RagError::VectorStore {
        backend: "pinecone".into(),
        message: format!("API returned {status}: {detail}"),
        retryable: status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error(),
    })
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn upsert(&self, records: &[IndexedRecord]) -> Result<(), RagError> {
        if records.is_empty() {
            return Ok(());
        }

        let request_body = UpsertRequest {
            vectors: records
                .iter()
                .map(|record| VectorPayload {
                    id: &record.id,
                    values: &record.vector,
                    metadata: &record.metadata,
                })
                .collect(),
            namespace: self.request_body_namespace(),
        };

        let response = self
            .client
            .post(format!("{}/vectors/upsert", self.host))
            .header("Api-Key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(request_error)?;

        check_status(response).await?;
        debug!(backend = "pinecone", count = records.len(), "upserted records");
        Ok(())
    }

    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: Option<&MetadataFilter>,
    ) -> Result<Vec<RetrievalMatch>, RagError> {
        let request_body = QueryRequest {
            vector,
            top_k,
            include_metadata: true,
            include_values: false,
            filter: filter.map(eq_filter),
            namespace: self.request_body_namespace(),
        };

        let response = self
            .client
            .post(format!("{}/query", self.host))
            .header("Api-Key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(request_error)?;

        let response = check_status(response).await?;
        let query_response: QueryResponse = response.json().await.map_err(parse_error)?;

        let matches = query_response
            .matches
            .into_iter()
            .map(|matched| RetrievalMatch {
                content: matched.metadata.get("content").cloned().unwrap_or_default(),
                record_id: matched.id,
                score: matched.score,
                metadata: matched.metadata,
            })
            .collect();

        Ok(matches)
    }
}
