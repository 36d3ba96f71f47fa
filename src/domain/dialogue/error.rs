//! Orchestrator errors.

use thiserror::Error;

use crate::domain::completion::AssemblyError;
use crate::domain::foundation::{FieldId, InvalidTransition, SessionStatus};
use crate::domain::session::SessionError;

/// Errors raised while driving a dialogue.
///
/// `RequiredFieldUnreachable` is an internal invariant violation: it means
/// field selection ran out of fields while a required one was still
/// unanswered, which cannot happen with a correctly validated schema.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Session is {0} and accepts no further turns")]
    SessionClosed(SessionStatus),

    #[error("No field is in flight; obtain a prompt before sending an utterance")]
    NoFieldInFlight,

    #[error("Field '{0}' is not part of this session's schema")]
    UnknownField(FieldId),

    #[error("Required field '{0}' became unreachable during selection")]
    RequiredFieldUnreachable(FieldId),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Transition(#[from] InvalidTransition),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),
}
