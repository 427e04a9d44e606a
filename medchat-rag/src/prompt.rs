//! Context assembly and prompt construction for the generation call.
//!
//! Pure formatting: ranked matches become a bounded text block, and the
//! block becomes a system prompt. Nothing here touches the stored records —
//! truncation applies to display copies only.

use serde::{Deserialize, Serialize};

use crate::chunking::floor_char_boundary;
use crate::document::RetrievalMatch;

/// Default display length for match content in assembled context.
pub const DEFAULT_SNIPPET_MAX_CHARS: usize = 200;

const BASE_GUIDELINES: &str = "You are a helpful medical assistant chatbot. You provide informative and accurate responses about medical queries based on available patient data and general medical knowledge.

Important guidelines:
- Always prioritize patient safety and privacy
- Provide helpful information but remind users to consult healthcare professionals for medical decisions
- Be clear about the limitations of AI-generated medical advice
- Maintain a professional and empathetic tone";

const PATIENT_SPECIFIC_GUIDELINES: &str = "

CRITICAL PRIVACY REQUIREMENTS:
- This is a PATIENT-SPECIFIC query requiring strict privacy protection
- ONLY use information that belongs to the specified patient
- DO NOT include or reference any other patient's data
- If no relevant patient records are found, clearly state that no records are available
- Focus responses on the specific patient's data only";

const GENERAL_MODE_GUIDELINES: &str = "

GENERAL INFORMATION MODE:
- This is a general medical/hospital information query
- You can provide broad, non-patient-specific information
- No patient privacy restrictions apply for this type of query";

const USE_ONLY_PATIENT_RECORDS: &str =
    "\n\nUse ONLY the above patient-specific records to provide responses. Do not include information from other patients.";

const USE_RECORDS_WITH_KNOWLEDGE: &str =
    "\n\nUse the above records along with general medical knowledge to provide comprehensive responses.";

const NO_RECORDS_NOTICE: &str =
    "\n\nNo patient-specific records found. Inform the user that no records are available for their query.";

/// Identifies the patient a query is scoped to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientScope {
    /// The patient identifier used for metadata filtering.
    pub patient_id: String,
    /// Display name, when known, for personalized responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
}

impl PatientScope {
    /// Scope to a patient by id.
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self { patient_id: patient_id.into(), patient_name: None }
    }

    /// Attach a display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.patient_name = Some(name.into());
        self
    }
}

/// Truncate content for display. The stored record is never modified.
///
/// Cuts on a char boundary and appends `...` when anything was dropped.
pub fn snippet(content: &str, max_chars: usize) -> String {
    if content.len() <= max_chars {
        return content.to_string();
    }
    let cut = floor_char_boundary(content, max_chars);
    format!("{}...", &content[..cut])
}

/// Assemble ranked matches into a bounded context block.
///
/// Ranking order is preserved; each content field is truncated to
/// `snippet_max_chars` for display. Returns `None` when there are no
/// matches — the caller proceeds with a context-free prompt.
pub fn assemble_context(
    matches: &[RetrievalMatch],
    snippet_max_chars: usize,
) -> Option<String> {
    if matches.is_empty() {
        return None;
    }

    let mut block = String::from("Relevant Records:\n");
    for (position, matched) in matches.iter().enumerate() {
        block.push_str(&format!(
            "\nRecord {}:\nContent: {}\n",
            position + 1,
            snippet(&matched.content, snippet_max_chars)
        ));
        if let Some(source) = matched.metadata.get("source_filename") {
            block.push_str(&format!("Source: {source}\n"));
        }
        block.push_str(&format!("Relevance Score: {:.3}\n", matched.score));
    }
    Some(block)
}

/// Builds the system prompt handed to the generation model.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    snippet_max_chars: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self { snippet_max_chars: DEFAULT_SNIPPET_MAX_CHARS }
    }
}

impl PromptBuilder {
    /// Create a builder with an explicit display length.
    pub fn new(snippet_max_chars: usize) -> Self {
        Self { snippet_max_chars }
    }

    /// The configured display length.
    pub fn snippet_max_chars(&self) -> usize {
        self.snippet_max_chars
    }

    /// Render the system prompt: base guidelines, privacy mode, and the
    /// assembled context block when matches are available.
    pub fn system_prompt(
        &self,
        matches: &[RetrievalMatch],
        patient: Option<&PatientScope>,
    ) -> String {
        let mut prompt = String::from(BASE_GUIDELINES);

        match patient {
            Some(scope) => {
                prompt.push_str(PATIENT_SPECIFIC_GUIDELINES);
                if let Some(name) = &scope.patient_name {
                    prompt.push_str(&format!(
                        "\n- The patient's name is: {name}\n- Personalize responses appropriately while maintaining professionalism"
                    ));
                }
            }
            None => prompt.push_str(GENERAL_MODE_GUIDELINES),
        }

        match assemble_context(matches, self.snippet_max_chars) {
            Some(context) => {
                prompt.push_str("\n\n");
                prompt.push_str(&context);
                prompt.push_str(if patient.is_some() {
                    USE_ONLY_PATIENT_RECORDS
                } else {
                    USE_RECORDS_WITH_KNOWLEDGE
                });
            }
            None => {
                if patient.is_some() {
                    prompt.push_str(NO_RECORDS_NOTICE);
                }
            }
        }

        prompt
    }
}
