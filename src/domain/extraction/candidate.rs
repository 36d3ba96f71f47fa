//! Candidate values produced by extraction.

use serde::{Deserialize, Serialize};

/// An unvalidated value interpreted from an utterance.
///
/// Candidates have been shape-checked against the field's type but not yet
/// validated; the validator decides acceptance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Candidate {
    /// One value.
    Single(String),
    /// Several values (multi-select fields only).
    Multiple(Vec<String>),
}

/// The result of one extraction attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// A candidate consistent with the field's type.
    Match(Candidate),
    /// The utterance held no usable answer.
    NoMatch,
    /// The language-understanding call exceeded the engine's deadline.
    TimedOut,
}
