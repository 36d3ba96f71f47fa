//! The dialogue orchestrator.

use std::sync::Arc;

use crate::domain::completion::{assemble, FilledForm};
use crate::domain::extraction::{AnswerExtractor, ConversationContext, Extraction};
use crate::domain::foundation::{FieldId, SessionStatus, StateMachine};
use crate::domain::schema::{Field, FormSchema};
use crate::domain::session::{AnswerValue, Session, SessionError, TurnResolution};
use crate::domain::validation::{validate, GroupContext, RejectReason, Validation};

use super::{clarification, question, DialogueState, OrchestratorError, Prompt};

/// What the caller should do after a turn resolves.
#[derive(Debug, Clone, PartialEq)]
pub enum NextStep {
    /// Present this prompt and collect one utterance.
    Ask(Prompt),
    /// The form is complete; here is the assembled document.
    Complete(FilledForm),
}

/// Outcome of processing one utterance.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// The utterance was accepted and recorded.
    Accepted {
        field_id: FieldId,
        value: AnswerValue,
        next: NextStep,
    },
    /// The utterance was rejected; re-prompt the same field.
    Clarify {
        field_id: FieldId,
        reason: RejectReason,
        prompt: Prompt,
        attempts_remaining: u32,
    },
    /// A non-required field exhausted its retries and was skipped.
    FieldSkipped { field_id: FieldId, next: NextStep },
    /// A required field exhausted its retries; the session failed.
    SessionFailed { field_id: FieldId },
}

/// Drives one session through its schema: field selection by tab order,
/// per-turn extraction and validation, clarifying re-prompts, retry
/// limits, and completion detection.
///
/// Strictly turn-based: the cursor never advances until the current
/// turn's validation result is known.
#[derive(Debug)]
pub struct DialogueOrchestrator {
    schema: Arc<FormSchema>,
    session: Session,
    extractor: AnswerExtractor,
    max_retries: u32,
    state: DialogueState,
}

impl DialogueOrchestrator {
    /// Creates an orchestrator with a fresh session for `schema`.
    pub fn new(schema: Arc<FormSchema>, extractor: AnswerExtractor, max_retries: u32) -> Self {
        let session = Session::new(&schema);
        Self {
            schema,
            session,
            extractor,
            max_retries,
            state: DialogueState::SelectingField,
        }
    }

    /// Resumes an orchestrator over a restored session.
    pub fn resume(
        schema: Arc<FormSchema>,
        session: Session,
        extractor: AnswerExtractor,
        max_retries: u32,
    ) -> Result<Self, OrchestratorError> {
        if session.schema_id() != schema.id() {
            return Err(OrchestratorError::Session(SessionError::SchemaMismatch {
                expected: session.schema_id().clone(),
                actual: schema.id().clone(),
            }));
        }
        let state = if session.status() == SessionStatus::Complete {
            DialogueState::Complete
        } else if session.cursor().is_some() {
            DialogueState::AwaitingUtterance
        } else {
            DialogueState::SelectingField
        };
        Ok(Self {
            schema,
            session,
            extractor,
            max_retries,
            state,
        })
    }

    /// Returns the session being driven.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the current dialogue state.
    pub fn state(&self) -> DialogueState {
        self.state
    }

    /// Re-assembles the completed form.
    ///
    /// Assembly is a pure function of the session, so the document can be
    /// fetched again after completion, for instance when a first delivery
    /// attempt failed.
    pub fn filled_form(&self) -> Result<FilledForm, OrchestratorError> {
        Ok(assemble(&self.session, &self.schema)?)
    }

    /// Begins (or continues) the conversation: selects the next field and
    /// returns its prompt, or the completed form if nothing remains.
    pub fn start(&mut self) -> Result<NextStep, OrchestratorError> {
        if !self.session.status().is_live() {
            return Err(OrchestratorError::SessionClosed(self.session.status()));
        }
        if self.state == DialogueState::AwaitingUtterance {
            // A prompt is already out; re-issue it.
            let field_id = self
                .session
                .cursor()
                .cloned()
                .ok_or(OrchestratorError::NoFieldInFlight)?;
            let field = self.field(&field_id)?;
            return Ok(NextStep::Ask(question(field)));
        }
        self.advance()
    }

    /// Processes one utterance for the field currently in flight.
    pub async fn process_utterance(
        &mut self,
        utterance: &str,
    ) -> Result<TurnOutcome, OrchestratorError> {
        if !self.session.status().is_live() {
            return Err(OrchestratorError::SessionClosed(self.session.status()));
        }
        let field_id = self
            .session
            .cursor()
            .cloned()
            .ok_or(OrchestratorError::NoFieldInFlight)?;
        self.process_turn(field_id, utterance).await
    }

    /// Processes an utterance for a caller-chosen field, out of tab order.
    ///
    /// This is how a user corrects or revisits an earlier field. Answering
    /// a field whose select-one group is already resolved by a sibling
    /// yields a `GroupConflict` clarification.
    pub async fn answer_field(
        &mut self,
        field_id: FieldId,
        utterance: &str,
    ) -> Result<TurnOutcome, OrchestratorError> {
        if !self.session.status().is_live() {
            return Err(OrchestratorError::SessionClosed(self.session.status()));
        }
        if self.schema.field(&field_id).is_none() {
            return Err(OrchestratorError::UnknownField(field_id));
        }
        self.session.set_cursor(Some(field_id.clone()));
        self.state = DialogueState::AwaitingUtterance;
        self.process_turn(field_id, utterance).await
    }

    /// Abandons the session. Terminal; no rollback is needed because no
    /// mutation outside `record_answer` is ever partial.
    pub fn abandon(&mut self) -> Result<(), OrchestratorError> {
        if !self.session.status().is_live() {
            return Err(OrchestratorError::SessionClosed(self.session.status()));
        }
        self.session.transition(SessionStatus::Abandoned)?;
        self.session.set_cursor(None);
        tracing::info!(session = %self.session.id(), "session abandoned");
        Ok(())
    }

    async fn process_turn(
        &mut self,
        field_id: FieldId,
        utterance: &str,
    ) -> Result<TurnOutcome, OrchestratorError> {
        if !self.session.status().is_live() {
            return Err(OrchestratorError::SessionClosed(self.session.status()));
        }
        self.state = self.state.transition_to(DialogueState::Validating)?;

        let schema = Arc::clone(&self.schema);
        let field = schema
            .field(&field_id)
            .ok_or_else(|| OrchestratorError::UnknownField(field_id.clone()))?;
        let context = self.context();

        match self.extractor.extract(field, utterance, &context).await {
            Extraction::Match(candidate) => {
                let group = self.group_context(field);
                match validate(field, &candidate, &group) {
                    Validation::Accepted(value) => self.accept(field, value, utterance),
                    Validation::Rejected(reason) => {
                        let resolution = TurnResolution::Rejected {
                            reason: reason.clone(),
                        };
                        self.reject(field, utterance, resolution, reason)
                    }
                }
            }
            Extraction::NoMatch => {
                let reason = self.unreadable_reason(field);
                self.reject(field, utterance, TurnResolution::NoMatch, reason)
            }
            Extraction::TimedOut => {
                let reason = self.unreadable_reason(field);
                self.reject(field, utterance, TurnResolution::TimedOut, reason)
            }
        }
    }

    fn accept(
        &mut self,
        field: &Field,
        value: AnswerValue,
        utterance: &str,
    ) -> Result<TurnOutcome, OrchestratorError> {
        if self.session.status() == SessionStatus::AwaitingClarification {
            self.session.transition(SessionStatus::InProgress)?;
        }
        self.session
            .record_answer(&self.schema, field.id(), value.clone(), utterance)?;
        tracing::info!(
            session = %self.session.id(),
            field = %field.id(),
            "answer accepted"
        );

        self.state = self.state.transition_to(DialogueState::SelectingField)?;
        let next = self.advance()?;
        Ok(TurnOutcome::Accepted {
            field_id: field.id().clone(),
            value,
            next,
        })
    }

    fn reject(
        &mut self,
        field: &Field,
        utterance: &str,
        resolution: TurnResolution,
        reason: RejectReason,
    ) -> Result<TurnOutcome, OrchestratorError> {
        let attempts = self
            .session
            .record_failed_turn(field.id(), utterance, resolution);
        tracing::debug!(
            session = %self.session.id(),
            field = %field.id(),
            attempts,
            reason = %reason,
            "utterance rejected"
        );

        if attempts >= self.max_retries {
            return self.exhaust(field);
        }

        if self.session.status() == SessionStatus::InProgress {
            self.session
                .transition(SessionStatus::AwaitingClarification)?;
        }
        self.state = self.state.transition_to(DialogueState::Clarifying)?;
        self.state = self.state.transition_to(DialogueState::AwaitingUtterance)?;
        Ok(TurnOutcome::Clarify {
            field_id: field.id().clone(),
            prompt: clarification(&self.schema, field, &reason),
            reason,
            attempts_remaining: self.max_retries - attempts,
        })
    }

    /// Ends the retry loop for a field: skip it when optional, fail the
    /// session when required. Never silent in either case.
    fn exhaust(&mut self, field: &Field) -> Result<TurnOutcome, OrchestratorError> {
        if field.is_required() {
            self.session.transition(SessionStatus::Failed)?;
            self.session.set_cursor(None);
            tracing::warn!(
                session = %self.session.id(),
                field = %field.id(),
                "required field exhausted retries; session failed"
            );
            return Ok(TurnOutcome::SessionFailed {
                field_id: field.id().clone(),
            });
        }

        if self.session.status() == SessionStatus::AwaitingClarification {
            self.session.transition(SessionStatus::InProgress)?;
        }
        self.session
            .record_answer(&self.schema, field.id(), AnswerValue::Skipped, "")?;
        tracing::warn!(
            session = %self.session.id(),
            field = %field.id(),
            "field exhausted retries and was skipped"
        );

        self.state = self.state.transition_to(DialogueState::SelectingField)?;
        let next = self.advance()?;
        Ok(TurnOutcome::FieldSkipped {
            field_id: field.id().clone(),
            next,
        })
    }

    /// Selects the next unanswered field by ascending tab order, or
    /// completes the session when none remain.
    fn advance(&mut self) -> Result<NextStep, OrchestratorError> {
        let schema = Arc::clone(&self.schema);
        let next_field = schema.fields().iter().find(|f| {
            self.session
                .answer(f.id())
                .is_some_and(AnswerValue::is_unanswered)
        });

        if let Some(field) = next_field {
            self.session.set_cursor(Some(field.id().clone()));
            self.state = self.state.transition_to(DialogueState::AwaitingUtterance)?;
            return Ok(NextStep::Ask(question(field)));
        }

        // Nothing left to ask: every required field must be resolved to a
        // value or an explicit group outcome, or the schema validation let
        // something through that it should not have.
        for field in schema.fields() {
            if field.is_required()
                && self
                    .session
                    .answer(field.id())
                    .is_none_or(|a| matches!(a, AnswerValue::Unanswered | AnswerValue::Skipped))
            {
                return Err(OrchestratorError::RequiredFieldUnreachable(
                    field.id().clone(),
                ));
            }
        }

        self.session.set_cursor(None);
        self.session.transition(SessionStatus::Complete)?;
        self.state = self.state.transition_to(DialogueState::Complete)?;
        let form = assemble(&self.session, &schema)?;
        tracing::info!(session = %self.session.id(), form = %form.form_id, "form complete");
        Ok(NextStep::Complete(form))
    }

    /// Context of previously accepted answers, in tab order.
    fn context(&self) -> ConversationContext {
        let mut context = ConversationContext::new();
        for field in self.schema.fields() {
            if let Some(answer) = self.session.answer(field.id()) {
                if answer.is_filled() {
                    context.record(field.label(), answer.to_string());
                }
            }
        }
        context
    }

    /// Group state of `field` as the validator needs it: the sibling that
    /// already holds the group's value, if any.
    fn group_context(&self, field: &Field) -> GroupContext {
        for sibling in self.schema.group_siblings(field) {
            if self
                .session
                .answer(sibling.id())
                .is_some_and(AnswerValue::is_filled)
            {
                return GroupContext::resolved_by(sibling.id().clone());
            }
        }
        GroupContext::unresolved()
    }

    fn field(&self, field_id: &FieldId) -> Result<&Field, OrchestratorError> {
        self.schema
            .field(field_id)
            .ok_or_else(|| OrchestratorError::UnknownField(field_id.clone()))
    }

    /// Reason reported when no candidate could be extracted at all.
    fn unreadable_reason(&self, field: &Field) -> RejectReason {
        if field.is_required() {
            RejectReason::MissingRequiredValue
        } else {
            RejectReason::NoMatch
        }
    }
}
