//! SessionStatus enum for tracking the lifecycle of a form-filling session.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a form-filling session.
///
/// A session alternates between `InProgress` and `AwaitingClarification`
/// while the conversation runs, and ends in exactly one of the terminal
/// states `Complete`, `Failed`, or `Abandoned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Fields are being asked in order; no clarification pending.
    #[default]
    InProgress,

    /// The last utterance was rejected; the same field is being re-asked.
    AwaitingClarification,

    /// Every field is resolved and required fields are answered.
    Complete,

    /// A required field exhausted its retry limit.
    Failed,

    /// The caller ended the session before completion.
    Abandoned,
}

impl SessionStatus {
    /// Returns true if the session still accepts utterances.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::InProgress | Self::AwaitingClarification)
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        matches!(
            (self, target),
            // Rejected utterance triggers a clarifying re-prompt
            (InProgress, AwaitingClarification) |
            // Clarification answered, conversation resumes
            (AwaitingClarification, InProgress) |
            // Normal completion
            (InProgress, Complete) |
            // Required field out of retries
            (InProgress, Failed) |
            (AwaitingClarification, Failed) |
            // Caller may abandon at any live point
            (InProgress, Abandoned) |
            (AwaitingClarification, Abandoned)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStatus::*;
        match self {
            InProgress => vec![AwaitingClarification, Complete, Failed, Abandoned],
            AwaitingClarification => vec![InProgress, Failed, Abandoned],
            Complete | Failed | Abandoned => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::InProgress => "InProgress",
            SessionStatus::AwaitingClarification => "AwaitingClarification",
            SessionStatus::Complete => "Complete",
            SessionStatus::Failed => "Failed",
            SessionStatus::Abandoned => "Abandoned",
        };
        write!(f, "{}", s)
    }
}
