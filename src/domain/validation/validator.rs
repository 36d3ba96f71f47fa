//! Candidate-value validation against field constraints.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::extraction::Candidate;
use crate::domain::foundation::FieldId;
use crate::domain::schema::{Field, FieldType};
use crate::domain::session::AnswerValue;

use super::{
    capitalize_words, normalize_date, normalize_email, normalize_number, normalize_phone,
    normalize_zip,
};

/// Why a candidate value was rejected.
///
/// Every variant is recoverable: the orchestrator turns it into a
/// clarifying re-prompt for the same field.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RejectReason {
    #[error("a value is required for this field")]
    MissingRequiredValue,

    #[error("the answer must be one of the listed options")]
    NotInOptionSet { options: Vec<String> },

    #[error("the answer could not be read as a calendar date")]
    UnparseableDate,

    #[error("the answer could not be read as a number")]
    UnparseableNumber,

    #[error("the answer does not look like an email address")]
    InvalidEmail,

    #[error("the answer does not look like a phone number")]
    InvalidPhone,

    #[error("field '{sibling}' already holds this group's value")]
    GroupConflict { sibling: FieldId },

    #[error("the answer could not be understood")]
    NoMatch,
}

/// Result of validating one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// Candidate accepted; carries the normalized value to record.
    Accepted(AnswerValue),
    /// Candidate rejected with a reason.
    Rejected(RejectReason),
}

/// Group state of the target field at validation time.
///
/// For a select-one group, holds the sibling that already carries the
/// group's value, if any. Built by the caller from session state; the
/// validator itself never reads or mutates a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupContext {
    /// Sibling field already resolved to a non-empty value.
    pub resolved_sibling: Option<FieldId>,
}

impl GroupContext {
    /// Context for a field with no group, or a group nobody has answered.
    pub fn unresolved() -> Self {
        Self::default()
    }

    /// Context for a group already resolved by `sibling`.
    pub fn resolved_by(sibling: FieldId) -> Self {
        Self {
            resolved_sibling: Some(sibling),
        }
    }
}

/// Validates a candidate against the field's type, option set, and group
/// rule, returning either the normalized value or a rejection reason.
///
/// Pure function: state mutation is the caller's responsibility.
pub fn validate(field: &Field, candidate: &Candidate, group: &GroupContext) -> Validation {
    // Group rule comes first: a competing non-empty value never gets as
    // far as type checks.
    if let Some(sibling) = &group.resolved_sibling {
        if sibling != field.id() && !candidate_is_empty(candidate) {
            return Validation::Rejected(RejectReason::GroupConflict {
                sibling: sibling.clone(),
            });
        }
    }

    match candidate {
        Candidate::Single(raw) => validate_single(field, raw),
        Candidate::Multiple(values) => validate_multiple(field, values),
    }
}

fn candidate_is_empty(candidate: &Candidate) -> bool {
    match candidate {
        Candidate::Single(s) => s.trim().is_empty(),
        Candidate::Multiple(v) => v.is_empty(),
    }
}

fn validate_single(field: &Field, raw: &str) -> Validation {
    let text = raw.trim();
    if text.is_empty() {
        return Validation::Rejected(empty_reason(field));
    }

    match field.field_type() {
        FieldType::Text => {
            // Label-driven formatting: names and street addresses get
            // title-cased, zip codes reduce to digits.
            let label = field.label().to_ascii_lowercase();
            let value = if label.contains("name") || label.contains("address") {
                capitalize_words(text)
            } else if label.contains("zip") {
                normalize_zip(text)
            } else {
                text.to_string()
            };
            Validation::Accepted(AnswerValue::Text(value))
        }
        FieldType::Date => match normalize_date(text) {
            Some(iso) => Validation::Accepted(AnswerValue::Text(iso)),
            None => Validation::Rejected(RejectReason::UnparseableDate),
        },
        FieldType::Number => match normalize_number(text) {
            Some(digits) => Validation::Accepted(AnswerValue::Text(digits)),
            None => Validation::Rejected(RejectReason::UnparseableNumber),
        },
        FieldType::Email => match normalize_email(text) {
            Some(address) => Validation::Accepted(AnswerValue::Text(address)),
            None => Validation::Rejected(RejectReason::InvalidEmail),
        },
        FieldType::Phone => match normalize_phone(text) {
            Some(formatted) => Validation::Accepted(AnswerValue::Text(formatted)),
            None => Validation::Rejected(RejectReason::InvalidPhone),
        },
        FieldType::SingleSelect => match field.match_option(text) {
            Some(canonical) => Validation::Accepted(AnswerValue::Text(canonical.to_string())),
            None => Validation::Rejected(RejectReason::NotInOptionSet {
                options: field.options().to_vec(),
            }),
        },
        FieldType::MultiSelect => match field.match_option(text) {
            Some(canonical) => {
                Validation::Accepted(AnswerValue::Selections(vec![canonical.to_string()]))
            }
            None => Validation::Rejected(RejectReason::NotInOptionSet {
                options: field.options().to_vec(),
            }),
        },
    }
}

fn validate_multiple(field: &Field, values: &[String]) -> Validation {
    if field.field_type() != FieldType::MultiSelect {
        return Validation::Rejected(RejectReason::NoMatch);
    }
    if values.is_empty() {
        return Validation::Rejected(empty_reason(field));
    }

    let mut canonical = Vec::with_capacity(values.len());
    for value in values {
        match field.match_option(value) {
            Some(opt) if !canonical.contains(&opt.to_string()) => {
                canonical.push(opt.to_string());
            }
            Some(_) => {} // duplicate selection, keep first
            None => {
                return Validation::Rejected(RejectReason::NotInOptionSet {
                    options: field.options().to_vec(),
                })
            }
        }
    }
    Validation::Accepted(AnswerValue::Selections(canonical))
}

/// Reason used when the candidate is effectively blank.
fn empty_reason(field: &Field) -> RejectReason {
    if field.is_required() {
        RejectReason::MissingRequiredValue
    } else {
        RejectReason::NoMatch
    }
}
