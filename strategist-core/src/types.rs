use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::{ProviderError, Result};

/// A fixed-dimension embedding. The dimension is set by the embedding model
/// and must match the target vector collection.
pub type EmbeddingVector = Vec<f32>;

/// The user-supplied framing captured once per session and consumed by every
/// downstream stage. Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategicContext {
    business_context: String,
    challenge: String,
}

impl StrategicContext {
    /// Both fields are required; blank input is rejected up front rather than
    /// producing a prompt with empty sections.
    pub fn new(business_context: impl Into<String>, challenge: impl Into<String>) -> Result<Self> {
        let business_context = business_context.into();
        let challenge = challenge.into();
        if business_context.trim().is_empty() {
            return Err(ProviderError::Malformed("business context must not be blank".to_string()));
        }
        if challenge.trim().is_empty() {
            return Err(ProviderError::Malformed("challenge must not be blank".to_string()));
        }
        Ok(Self { business_context, challenge })
    }

    pub fn business_context(&self) -> &str {
        &self.business_context
    }

    pub fn challenge(&self) -> &str {
        &self.challenge
    }
}

/// A single request to a completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub prompt: String,
    pub system_instruction: Option<String>,
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self { prompt: prompt.into(), system_instruction: None, temperature: None }
    }

    #[must_use]
    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Checked by providers before any network traffic.
    pub fn validate(&self) -> Result<()> {
        if self.prompt.trim().is_empty() {
            return Err(ProviderError::Malformed("prompt must not be empty".to_string()));
        }
        if let Some(t) = self.temperature {
            if !(0.0..=2.0).contains(&t) {
                return Err(ProviderError::Malformed(format!(
                    "temperature {t} outside the supported range [0, 2]"
                )));
            }
        }
        Ok(())
    }
}

/// Why the model stopped generating, as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Other,
}

/// Raw text returned by a completion provider. The pipeline treats it as
/// opaque and never parses it as structured data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResult {
    pub text: String,
    pub finish_reason: Option<FinishReason>,
}

impl CompletionResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into(), finish_reason: Some(FinishReason::Stop) }
    }
}

/// An opaque record returned by similarity search.
///
/// No schema is enforced beyond "a mapping"; [`context_text`] applies a
/// minimal text-bearing-field contract when a document is folded into a
/// prompt.
///
/// [`context_text`]: RetrievedDocument::context_text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedDocument {
    pub fields: Map<String, Value>,
    /// Similarity score when the store reports one; higher is closer.
    pub similarity: Option<f32>,
}

/// Field names tried, in order, when extracting prompt text from a document.
const TEXT_FIELDS: [&str; 4] = ["text", "content", "body", "chunk"];

impl RetrievedDocument {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields, similarity: None }
    }

    #[must_use]
    pub fn with_similarity(mut self, similarity: f32) -> Self {
        self.similarity = Some(similarity);
        self
    }

    /// Text suitable for inclusion in a refinement prompt: the first
    /// conventional text-bearing field, falling back to compact JSON of the
    /// whole mapping when none is present.
    #[must_use]
    pub fn context_text(&self) -> String {
        for field in TEXT_FIELDS {
            if let Some(Value::String(s)) = self.fields.get(field) {
                if !s.trim().is_empty() {
                    return s.clone();
                }
            }
        }
        Value::Object(self.fields.clone()).to_string()
    }
}

/// Everything one pipeline run produced, handed to the caller on completion.
/// The orchestrator holds no state afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineArtifact {
    /// Correlates the artifact with this run's log records.
    pub run_id: Uuid,
    pub initial_draft: String,
    /// Absent when query derivation was skipped or failed.
    pub derived_query: Option<String>,
    /// Ordered by descending similarity, closest first.
    pub retrieved: Vec<RetrievedDocument>,
    pub refined: String,
    /// True when retrieval was skipped. The result was generated without
    /// external context and the caller must surface that.
    pub retrieval_skipped: bool,
    /// Human-readable reason retrieval was skipped, when it was.
    pub skip_cause: Option<String>,
}
