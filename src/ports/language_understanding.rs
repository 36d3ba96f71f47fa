//! Language Understanding Port - interface to the interpretation service.
//!
//! The engine delegates interpretation of free-form utterances to an
//! external language model, passing the target field's type and options as
//! structured constraints. The service is an untrusted oracle: whatever it
//! returns is shape-checked by the extractor and re-validated by the
//! validator before it can touch session state.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::extraction::ConversationContext;
use crate::domain::schema::{Field, FieldType};

/// Port for interpreting one utterance against one field's constraints.
#[async_trait]
pub trait LanguageUnderstanding: Send + Sync {
    /// Interprets an utterance, returning a candidate value shaped to the
    /// field's type where possible.
    ///
    /// Implementations must not block forever; the engine additionally
    /// applies its own deadline and treats overruns as no-match.
    async fn interpret(
        &self,
        request: InterpretationRequest,
    ) -> Result<Interpretation, InterpreterError>;

    /// Returns implementation information for logging.
    fn info(&self) -> InterpreterInfo;
}

/// Request describing the target field and the utterance to interpret.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterpretationRequest {
    /// Human-readable field label.
    pub field_label: String,
    /// Expected value type.
    pub field_type: FieldType,
    /// Allowed options for select types (empty otherwise).
    pub options: Vec<String>,
    /// Whether the field must be answered.
    pub required: bool,
    /// Accessibility hint shown alongside the question, if any.
    pub hint: Option<String>,
    /// The raw utterance.
    pub utterance: String,
    /// Prior answered exchanges, for disambiguation.
    pub context: ConversationContext,
}

impl InterpretationRequest {
    /// Builds a request for interpreting `utterance` as an answer to
    /// `field`.
    pub fn for_field(field: &Field, utterance: impl Into<String>, context: ConversationContext) -> Self {
        Self {
            field_label: field.label().to_string(),
            field_type: field.field_type(),
            options: field.options().to_vec(),
            required: field.is_required(),
            hint: field.hint().map(str::to_string),
            utterance: utterance.into(),
            context,
        }
    }
}

/// Interpretation produced by the service. Untrusted until validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    /// The candidate value, if the service found one.
    pub value: InterpretedValue,
}

impl Interpretation {
    /// An interpretation carrying no usable value.
    pub fn none() -> Self {
        Self {
            value: InterpretedValue::None,
        }
    }

    /// A single candidate value.
    pub fn single(value: impl Into<String>) -> Self {
        Self {
            value: InterpretedValue::Single(value.into()),
        }
    }

    /// Multiple candidate values (multi-select fields).
    pub fn multiple(values: Vec<String>) -> Self {
        Self {
            value: InterpretedValue::Multiple(values),
        }
    }
}

/// Shape of the value the service returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum InterpretedValue {
    /// The service found no answer in the utterance.
    None,
    /// One candidate value.
    Single(String),
    /// Several candidate values.
    Multiple(Vec<String>),
}

/// Implementation information for logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterInfo {
    /// Implementation name (e.g. "openai", "mock").
    pub name: String,
    /// Model identifier, if applicable.
    pub model: String,
}

impl InterpreterInfo {
    /// Creates interpreter info.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Language-understanding service errors.
///
/// All of these are recoverable from the conversation's point of view:
/// the extractor maps them to a no-match and the orchestrator re-prompts.
#[derive(Debug, thiserror::Error)]
pub enum InterpreterError {
    /// Service did not answer within its own deadline.
    #[error("interpretation timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    /// Rate limited by the service.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// API key or authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Service is unavailable.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Network error during the request.
    #[error("network error: {0}")]
    Network(String),

    /// The service's response could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),
}
