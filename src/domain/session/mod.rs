//! Session State - mutable per-conversation record.
//!
//! One [`Session`] tracks a single user's pass through one form: which
//! fields are answered, the field currently being asked about, the turn
//! history, and the lifecycle status. The schema itself is shared
//! read-only; all mutation happens here and nowhere else.

mod aggregate;
mod answer;
mod error;
mod history;
mod snapshot;

pub use aggregate::Session;
pub use answer::AnswerValue;
pub use error::SessionError;
pub use history::{TurnRecord, TurnResolution};
pub use snapshot::SessionSnapshot;
