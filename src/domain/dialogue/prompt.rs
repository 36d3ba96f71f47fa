//! Prompt text generation.
//!
//! Prompts are built from the field's label, options, and accessibility
//! hint, phrased for spoken delivery. Clarifying prompts are specific to
//! the rejection reason so the user learns what to fix.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::FieldId;
use crate::domain::schema::{Field, FormSchema};
use crate::domain::validation::RejectReason;

/// A question for the caller to present (speak or display) to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    /// The field the question is about.
    pub field_id: FieldId,
    /// The question text.
    pub text: String,
}

/// Builds the initial question for a field.
pub fn question(field: &Field) -> Prompt {
    let mut text = format!("Please provide your {}", field.label());
    if field.is_required() {
        text.push_str(". This field is required");
    }
    if !field.options().is_empty() {
        text.push_str(&format!(". The options are: {}", field.options().join(", ")));
    }
    if let Some(hint) = field.hint() {
        text.push_str(&format!(". Hint: {}", hint));
    }
    text.push('.');
    Prompt {
        field_id: field.id().clone(),
        text,
    }
}

/// Builds a reason-specific clarifying re-prompt for the same field.
pub fn clarification(schema: &FormSchema, field: &Field, reason: &RejectReason) -> Prompt {
    let text = match reason {
        RejectReason::NotInOptionSet { options } => format!(
            "That answer isn't one of the choices. Please choose one of: {}.",
            options.join(", ")
        ),
        RejectReason::UnparseableDate => {
            "I couldn't understand that as a date. Please give the month, day, and year."
                .to_string()
        }
        RejectReason::UnparseableNumber => {
            "I couldn't understand that as a number. Please say it again using digits.".to_string()
        }
        RejectReason::InvalidEmail => {
            "That didn't sound like an email address. Please repeat it, including the at sign."
                .to_string()
        }
        RejectReason::InvalidPhone => {
            "That didn't sound like a phone number. Please say all ten digits.".to_string()
        }
        RejectReason::MissingRequiredValue => format!(
            "{} is required and can't be left blank. Please provide it.",
            field.label()
        ),
        RejectReason::GroupConflict { sibling } => {
            let sibling_label = schema
                .field(sibling)
                .map(Field::label)
                .unwrap_or(sibling.as_str());
            format!(
                "A choice has already been recorded for this group under {}. Only one option may be selected.",
                sibling_label
            )
        }
        RejectReason::NoMatch => format!(
            "Sorry, I didn't catch that. Please provide your {}.",
            field.label()
        ),
    };
    Prompt {
        field_id: field.id().clone(),
        text,
    }
}
