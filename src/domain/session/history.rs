//! Per-turn history records.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{FieldId, Timestamp};
use crate::domain::validation::RejectReason;

/// How one conversational turn was resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TurnResolution {
    /// The utterance produced a validated value.
    Accepted,

    /// The candidate value failed validation.
    Rejected { reason: RejectReason },

    /// No candidate could be extracted from the utterance.
    NoMatch,

    /// The language-understanding call exceeded its deadline.
    TimedOut,

    /// The field was marked skipped after exhausting retries.
    Skipped,
}

/// One entry of a session's turn history: which field was being asked,
/// what the user said, and how the turn resolved. Kept for re-prompt
/// context and audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// The field the turn was about.
    pub field_id: FieldId,
    /// The raw utterance, exactly as received.
    pub utterance: String,
    /// How the turn resolved.
    pub resolution: TurnResolution,
    /// When the turn was recorded.
    pub at: Timestamp,
}

impl TurnRecord {
    /// Creates a record stamped with the current time.
    pub fn new(
        field_id: FieldId,
        utterance: impl Into<String>,
        resolution: TurnResolution,
    ) -> Self {
        Self {
            field_id,
            utterance: utterance.into(),
            resolution,
            at: Timestamp::now(),
        }
    }
}
