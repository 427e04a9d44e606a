//! Chat assistant that grounds generation in retrieved patient context.
//!
//! [`RagAssistant`] ties the retrieval pipeline to a [`GenerationModel`]:
//! retrieve context for the query, build the system prompt, generate the
//! answer, and return the supporting records alongside it. A retrieval
//! failure degrades to a context-free answer instead of failing the chat.

use std::sync::Arc;

use medchat_core::{GenerationModel, GenerationRequest};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::document::RetrievalMatch;
use crate::error::Result;
use crate::pipeline::RagPipeline;
use crate::prompt::{PatientScope, PromptBuilder, snippet};

/// Tunables for the assistant loop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantOptions {
    /// Number of matches retrieved per query.
    pub top_k: usize,
    /// Number of supporting records echoed back in the reply.
    pub max_context_records: usize,
    /// Token budget for the generated answer.
    pub max_tokens: u32,
    /// Sampling temperature for the generated answer.
    pub temperature: f32,
}

impl Default for AssistantOptions {
    fn default() -> Self {
        Self {
            top_k: 3,
            max_context_records: 3,
            max_tokens: medchat_core::DEFAULT_MAX_TOKENS,
            temperature: medchat_core::DEFAULT_TEMPERATURE,
        }
    }
}

/// A generated answer plus the records that grounded it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantReply {
    /// The generated response text.
    pub response: String,
    /// Display copies of the supporting records, content truncated to the
    /// configured snippet length. Empty when no context was available.
    pub context: Vec<RetrievalMatch>,
}

/// Answers questions about ingested documents.
pub struct RagAssistant {
    pipeline: Arc<RagPipeline>,
    model: Arc<dyn GenerationModel>,
    prompt: PromptBuilder,
    options: AssistantOptions,
}

impl RagAssistant {
    /// Create an assistant with default options. The prompt display length
    /// is taken from the pipeline configuration.
    pub fn new(pipeline: Arc<RagPipeline>, model: Arc<dyn GenerationModel>) -> Self {
        let snippet_max_chars = pipeline.config().snippet_max_chars;
        let top_k = pipeline.config().top_k;
        Self {
            pipeline,
            model,
            prompt: PromptBuilder::new(snippet_max_chars),
            options: AssistantOptions { top_k, ..AssistantOptions::default() },
        }
    }

    /// Override the assistant options.
    pub fn with_options(mut self, options: AssistantOptions) -> Self {
        self.options = options;
        self
    }

    /// Answer a query, optionally scoped to a single patient's records.
    ///
    /// Retrieval failures are logged and degrade to a context-free prompt;
    /// zero retrieved records is the same valid path. Only generation
    /// failures surface as errors.
    pub async fn answer(
        &self,
        query: &str,
        patient: Option<&PatientScope>,
    ) -> Result<AssistantReply> {
        let matches = match self.retrieve_scoped(query, patient).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!(error = %e, "retrieval failed, answering without context");
                Vec::new()
            }
        };

        let system_prompt = self.prompt.system_prompt(&matches, patient);
        let request = GenerationRequest::new(query)
            .with_system_prompt(system_prompt)
            .with_max_tokens(self.options.max_tokens)
            .with_temperature(self.options.temperature);

        let response = self.model.generate(request).await?;
        info!(
            context_records = matches.len(),
            response_len = response.len(),
            "generated assistant reply"
        );

        let snippet_max_chars = self.prompt.snippet_max_chars();
        let context = matches
            .into_iter()
            .take(self.options.max_context_records)
            .map(|mut matched| {
                matched.content = snippet(&matched.content, snippet_max_chars);
                matched
            })
            .collect();

        Ok(AssistantReply { response, context })
    }

    async fn retrieve_scoped(
        &self,
        query: &str,
        patient: Option<&PatientScope>,
    ) -> Result<Vec<RetrievalMatch>> {
        match patient {
            Some(scope) => {
                self.pipeline
                    .retrieve_for_patient(query, self.options.top_k, &scope.patient_id)
                    .await
            }
            None => self.pipeline.retrieve(query, self.options.top_k).await,
        }
    }
}
