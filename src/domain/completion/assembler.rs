//! Assembly of a completed session into a filled form document.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{FieldId, FormId, SessionStatus};
use crate::domain::schema::FormSchema;
use crate::domain::session::{AnswerValue, Session};

/// Errors raised during assembly.
///
/// With a correctly validated schema and a session driven by the
/// orchestrator, only `SessionNotComplete` is reachable; the others guard
/// internal invariants.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("Session is {0}, not complete")]
    SessionNotComplete(SessionStatus),

    #[error("Session belongs to schema '{expected}', got '{actual}'")]
    SchemaMismatch { expected: FormId, actual: FormId },

    #[error("Field '{0}' is unresolved in a complete session")]
    UnresolvedField(FieldId),

    #[error("Required field '{0}' has no value")]
    RequiredFieldEmpty(FieldId),
}

/// The resolved value of one field in the output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilledValue {
    /// A single normalized value.
    Text(String),
    /// Selected options of a multi-select field.
    Selections(Vec<String>),
    /// Explicitly not selected (resolved group sibling).
    NotSelected,
    /// Non-required field skipped after exhausting retries.
    Skipped,
}

/// One field of the output document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilledField {
    pub id: FieldId,
    pub label: String,
    pub value: FilledValue,
}

/// The completed form: the original schema's identity plus every field's
/// resolved value, in schema (tab) order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilledForm {
    #[serde(rename = "formId")]
    pub form_id: FormId,
    #[serde(rename = "formTitle")]
    pub title: String,
    pub fields: Vec<FilledField>,
}

impl FilledForm {
    /// Returns the value recorded for a field, if present.
    pub fn value(&self, field_id: &FieldId) -> Option<&FilledValue> {
        self.fields
            .iter()
            .find(|f| &f.id == field_id)
            .map(|f| &f.value)
    }
}

/// Renders a completed session as a [`FilledForm`].
///
/// Pure function of session + schema with deterministic output: calling
/// it twice on the same session yields identical documents.
pub fn assemble(session: &Session, schema: &FormSchema) -> Result<FilledForm, AssemblyError> {
    if session.status() != SessionStatus::Complete {
        return Err(AssemblyError::SessionNotComplete(session.status()));
    }
    if session.schema_id() != schema.id() {
        return Err(AssemblyError::SchemaMismatch {
            expected: session.schema_id().clone(),
            actual: schema.id().clone(),
        });
    }

    let mut fields = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let answer = session
            .answer(field.id())
            .ok_or_else(|| AssemblyError::UnresolvedField(field.id().clone()))?;

        let value = match answer {
            AnswerValue::Unanswered => {
                return Err(AssemblyError::UnresolvedField(field.id().clone()))
            }
            AnswerValue::Skipped => {
                if field.is_required() {
                    return Err(AssemblyError::RequiredFieldEmpty(field.id().clone()));
                }
                FilledValue::Skipped
            }
            AnswerValue::NotSelected => FilledValue::NotSelected,
            AnswerValue::Text(s) => FilledValue::Text(s.clone()),
            AnswerValue::Selections(v) => FilledValue::Selections(v.clone()),
        };

        fields.push(FilledField {
            id: field.id().clone(),
            label: field.label().to_string(),
            value,
        });
    }

    Ok(FilledForm {
        form_id: schema.id().clone(),
        title: schema.title().to_string(),
        fields,
    })
}
