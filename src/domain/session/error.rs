//! Session mutation errors.

use thiserror::Error;

use crate::domain::foundation::{FieldId, FormId, SessionStatus};

/// Errors raised by session state mutation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Field '{0}' is not part of the session's schema")]
    UnknownField(FieldId),

    #[error("Session is bound to schema '{expected}', got '{actual}'")]
    SchemaMismatch { expected: FormId, actual: FormId },

    #[error("Session is {0} and no longer accepts answers")]
    NotMutable(SessionStatus),
}
