//! Serializable session snapshot for caller-side resumability.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::{FieldId, FormId, SessionId, SessionStatus, Timestamp};

use super::{AnswerValue, TurnRecord};

/// Complete serializable state of a session.
///
/// The engine owns no persistence; a caller may snapshot a session at any
/// point, store the record wherever it likes, and restore it verbatim
/// later against the same schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub schema_id: FormId,
    pub answers: HashMap<FieldId, AnswerValue>,
    pub cursor: Option<FieldId>,
    pub history: Vec<TurnRecord>,
    pub status: SessionStatus,
    pub retries: HashMap<FieldId, u32>,
    pub started_at: Timestamp,
    pub updated_at: Timestamp,
}
