//! Session aggregate entity.

use std::collections::HashMap;

use crate::domain::foundation::{
    FieldId, FormId, InvalidTransition, SessionId, SessionStatus, StateMachine, Timestamp,
};
use crate::domain::schema::{FormSchema, GroupRule};

use super::{AnswerValue, SessionError, SessionSnapshot, TurnRecord, TurnResolution};

/// One active conversation instance, bound to exactly one schema.
///
/// # Invariants
///
/// - `answers` holds exactly one entry per schema field.
/// - `record_answer` is the only mutator of `answers`.
/// - Terminal statuses freeze the session; no further mutation succeeds.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: SessionId,
    schema_id: FormId,
    answers: HashMap<FieldId, AnswerValue>,
    cursor: Option<FieldId>,
    history: Vec<TurnRecord>,
    status: SessionStatus,
    retries: HashMap<FieldId, u32>,
    started_at: Timestamp,
    updated_at: Timestamp,
}

impl Session {
    /// Creates a fresh session: every field unanswered, no cursor,
    /// status `InProgress`.
    pub fn new(schema: &FormSchema) -> Self {
        let now = Timestamp::now();
        Self {
            id: SessionId::new(),
            schema_id: schema.id().clone(),
            answers: schema
                .fields()
                .iter()
                .map(|f| (f.id().clone(), AnswerValue::Unanswered))
                .collect(),
            cursor: None,
            history: Vec::new(),
            status: SessionStatus::InProgress,
            retries: HashMap::new(),
            started_at: now,
            updated_at: now,
        }
    }

    /// Returns the session id.
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    /// Returns the id of the schema this session fills.
    pub fn schema_id(&self) -> &FormId {
        &self.schema_id
    }

    /// Returns the lifecycle status.
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Returns the field currently being asked about, if any.
    pub fn cursor(&self) -> Option<&FieldId> {
        self.cursor.as_ref()
    }

    /// Returns the turn history in order.
    pub fn history(&self) -> &[TurnRecord] {
        &self.history
    }

    /// Returns the resolution state of a field.
    pub fn answer(&self, field_id: &FieldId) -> Option<&AnswerValue> {
        self.answers.get(field_id)
    }

    /// Returns the number of failed attempts recorded for a field.
    pub fn retry_count(&self, field_id: &FieldId) -> u32 {
        self.retries.get(field_id).copied().unwrap_or(0)
    }

    /// Points the conversation at a field (or clears the cursor between
    /// turns).
    pub fn set_cursor(&mut self, field_id: Option<FieldId>) {
        self.cursor = field_id;
        self.updated_at = Timestamp::now();
    }

    /// Records a resolved value for a field and appends to history.
    ///
    /// This is the *only* mutator of `answers`. Filling a member of a
    /// select-one group marks every still-unanswered sibling
    /// `NotSelected`, so the group counts as collectively resolved.
    pub fn record_answer(
        &mut self,
        schema: &FormSchema,
        field_id: &FieldId,
        value: AnswerValue,
        utterance: &str,
    ) -> Result<(), SessionError> {
        if !self.status.is_live() {
            return Err(SessionError::NotMutable(self.status));
        }
        if schema.id() != &self.schema_id {
            return Err(SessionError::SchemaMismatch {
                expected: self.schema_id.clone(),
                actual: schema.id().clone(),
            });
        }
        let field = schema
            .field(field_id)
            .ok_or_else(|| SessionError::UnknownField(field_id.clone()))?;

        let resolution = if value == AnswerValue::Skipped {
            TurnResolution::Skipped
        } else {
            TurnResolution::Accepted
        };
        let fills_group = value.is_filled()
            && field.group().is_some_and(|g| g.rule == GroupRule::SelectOne);

        self.answers.insert(field_id.clone(), value);
        self.history
            .push(TurnRecord::new(field_id.clone(), utterance, resolution));

        if fills_group {
            for sibling in schema.group_siblings(field) {
                let entry = self
                    .answers
                    .entry(sibling.id().clone())
                    .or_insert(AnswerValue::Unanswered);
                if entry.is_unanswered() {
                    *entry = AnswerValue::NotSelected;
                }
            }
        }

        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Appends a non-accepting turn (rejection, no-match, timeout) to the
    /// history and bumps the field's retry counter.
    ///
    /// Returns the new retry count.
    pub fn record_failed_turn(
        &mut self,
        field_id: &FieldId,
        utterance: &str,
        resolution: TurnResolution,
    ) -> u32 {
        self.history
            .push(TurnRecord::new(field_id.clone(), utterance, resolution));
        let count = self.retries.entry(field_id.clone()).or_insert(0);
        *count += 1;
        self.updated_at = Timestamp::now();
        *count
    }

    /// Transitions the session status, validating the transition.
    pub fn transition(&mut self, target: SessionStatus) -> Result<(), InvalidTransition> {
        self.status = self.status.transition_to(target)?;
        self.updated_at = Timestamp::now();
        Ok(())
    }

    /// Captures the full session state for caller-side storage.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            schema_id: self.schema_id.clone(),
            answers: self.answers.clone(),
            cursor: self.cursor.clone(),
            history: self.history.clone(),
            status: self.status,
            retries: self.retries.clone(),
            started_at: self.started_at,
            updated_at: self.updated_at,
        }
    }

    /// Restores a session verbatim from a snapshot.
    pub fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        Self {
            id: snapshot.session_id,
            schema_id: snapshot.schema_id,
            answers: snapshot.answers,
            cursor: snapshot.cursor,
            history: snapshot.history,
            status: snapshot.status,
            retries: snapshot.retries,
            started_at: snapshot.started_at,
            updated_at: snapshot.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::RejectReason;

    fn test_schema() -> FormSchema {
        FormSchema::from_json(
            &serde_json::json!({
                "formId": "form_001",
                "formTitle": "Medical Intake Form",
                "fields": [
                    {
                        "id": "name",
                        "label": "Full Name",
                        "type": "text",
                        "required": true,
                        "accessibility": {"tabOrder": 1}
                    },
                    {
                        "id": "race_asian",
                        "label": "Race: Asian",
                        "type": "radio",
                        "options": ["Yes", "No"],
                        "grouping": {"visualGroup": "race", "logicalRule": "selectOne"},
                        "accessibility": {"tabOrder": 2}
                    },
                    {
                        "id": "race_black",
                        "label": "Race: Black or African American",
                        "type": "radio",
                        "options": ["Yes", "No"],
                        "grouping": {"visualGroup": "race", "logicalRule": "selectOne"},
                        "accessibility": {"tabOrder": 3}
                    }
                ]
            })
            .to_string(),
        )
        .unwrap()
    }

    #[test]
    fn new_session_has_every_field_unanswered() {
        let schema = test_schema();
        let session = Session::new(&schema);
        assert_eq!(session.status(), SessionStatus::InProgress);
        assert_eq!(session.cursor(), None);
        for field in schema.fields() {
            assert_eq!(session.answer(field.id()), Some(&AnswerValue::Unanswered));
        }
    }

    #[test]
    fn record_answer_updates_value_and_history() {
        let schema = test_schema();
        let mut session = Session::new(&schema);
        session
            .record_answer(
                &schema,
                &FieldId::new("name"),
                AnswerValue::Text("Youdahe Asfaw".into()),
                "Youdahe Asfaw",
            )
            .unwrap();

        assert_eq!(
            session.answer(&FieldId::new("name")),
            Some(&AnswerValue::Text("Youdahe Asfaw".into()))
        );
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history()[0].resolution, TurnResolution::Accepted);
    }

    #[test]
    fn filling_a_select_one_member_marks_siblings_not_selected() {
        let schema = test_schema();
        let mut session = Session::new(&schema);
        session
            .record_answer(
                &schema,
                &FieldId::new("race_asian"),
                AnswerValue::Text("Yes".into()),
                "yes",
            )
            .unwrap();

        assert_eq!(
            session.answer(&FieldId::new("race_black")),
            Some(&AnswerValue::NotSelected)
        );
        // only the answered field generates a history entry
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn record_answer_rejects_unknown_field() {
        let schema = test_schema();
        let mut session = Session::new(&schema);
        let err = session
            .record_answer(
                &schema,
                &FieldId::new("nope"),
                AnswerValue::Text("x".into()),
                "x",
            )
            .unwrap_err();
        assert_eq!(err, SessionError::UnknownField(FieldId::new("nope")));
    }

    #[test]
    fn record_answer_rejects_terminal_session() {
        let schema = test_schema();
        let mut session = Session::new(&schema);
        session.transition(SessionStatus::Abandoned).unwrap();
        let err = session
            .record_answer(
                &schema,
                &FieldId::new("name"),
                AnswerValue::Text("x".into()),
                "x",
            )
            .unwrap_err();
        assert_eq!(err, SessionError::NotMutable(SessionStatus::Abandoned));
    }

    #[test]
    fn failed_turns_increment_retry_counter() {
        let schema = test_schema();
        let mut session = Session::new(&schema);
        let field = FieldId::new("name");
        assert_eq!(session.retry_count(&field), 0);

        let count = session.record_failed_turn(
            &field,
            "banana",
            TurnResolution::Rejected {
                reason: RejectReason::NoMatch,
            },
        );
        assert_eq!(count, 1);
        assert_eq!(session.record_failed_turn(&field, "", TurnResolution::NoMatch), 2);
        assert_eq!(session.retry_count(&field), 2);
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn snapshot_round_trips_verbatim() {
        let schema = test_schema();
        let mut session = Session::new(&schema);
        session.set_cursor(Some(FieldId::new("name")));
        session
            .record_answer(
                &schema,
                &FieldId::new("race_asian"),
                AnswerValue::Text("Yes".into()),
                "yes",
            )
            .unwrap();
        session.record_failed_turn(&FieldId::new("name"), "um", TurnResolution::NoMatch);

        let snapshot = session.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(Session::from_snapshot(restored), session);
    }
}
