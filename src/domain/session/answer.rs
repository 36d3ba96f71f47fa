//! Resolved answer states for a field.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The resolution state of one field within a session.
///
/// `NotSelected` is distinct from `Unanswered`: it is an explicit marker
/// written to the siblings of a select-one group once one member holds the
/// group's value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    /// Not yet asked, or asked and still unresolved.
    #[default]
    Unanswered,

    /// A non-required field that exhausted its retry limit.
    Skipped,

    /// Explicitly resolved to "no value" because a group sibling holds
    /// the group's single allowed value.
    NotSelected,

    /// A single normalized value (text, date, number, email, phone, or
    /// one select option).
    Text(String),

    /// One or more options of a multi-select field.
    Selections(Vec<String>),
}

impl AnswerValue {
    /// Returns true if the field has not been resolved at all.
    pub fn is_unanswered(&self) -> bool {
        matches!(self, AnswerValue::Unanswered)
    }

    /// Returns true if the field is resolved (any state but `Unanswered`).
    pub fn is_resolved(&self) -> bool {
        !self.is_unanswered()
    }

    /// Returns true if the field holds an actual value.
    pub fn is_filled(&self) -> bool {
        match self {
            AnswerValue::Text(s) => !s.is_empty(),
            AnswerValue::Selections(v) => !v.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for AnswerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerValue::Unanswered => write!(f, "(unanswered)"),
            AnswerValue::Skipped => write!(f, "(skipped)"),
            AnswerValue::NotSelected => write!(f, "(not selected)"),
            AnswerValue::Text(s) => write!(f, "{}", s),
            AnswerValue::Selections(v) => write!(f, "{}", v.join(", ")),
        }
    }
}
