//! Foundation module - Shared domain primitives.
//!
//! Value objects, identifiers, and lifecycle enums that form the
//! vocabulary of the form-filling domain.

mod ids;
mod session_status;
mod state_machine;
mod timestamp;

pub use ids::{FieldId, FormId, SessionId};
pub use session_status::SessionStatus;
pub use state_machine::{InvalidTransition, StateMachine};
pub use timestamp::Timestamp;
