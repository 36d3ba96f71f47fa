//! The form-filling engine facade.
//!
//! Owns the registry of live sessions and wires each one to the
//! language-understanding adapter and the completed-form sink. One
//! orchestrator per session sits behind an async mutex, serializing turns:
//! a second utterance arriving while one is still being interpreted is
//! rejected with [`EngineError::TurnInFlight`] instead of interleaving.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::config::EngineConfig;
use crate::domain::completion::FilledForm;
use crate::domain::dialogue::{
    DialogueOrchestrator, NextStep, OrchestratorError, TurnOutcome,
};
use crate::domain::extraction::AnswerExtractor;
use crate::domain::foundation::{FieldId, SessionId};
use crate::domain::schema::{FormSchema, SchemaError};
use crate::domain::session::{Session, SessionSnapshot};
use crate::ports::{CompletedFormSink, LanguageUnderstanding, SinkError};

/// Engine-level errors.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("no live session {0}")]
    SessionNotFound(SessionId),

    #[error("session {0} already has a turn in flight")]
    TurnInFlight(SessionId),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    #[error("failed to deliver completed form: {0}")]
    Delivery(#[from] SinkError),
}

struct SessionHandle {
    orchestrator: Arc<Mutex<DialogueOrchestrator>>,
}

/// Multi-session form-filling engine.
pub struct FormFillingEngine {
    interpreter: Arc<dyn LanguageUnderstanding>,
    sink: Arc<dyn CompletedFormSink>,
    config: EngineConfig,
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
}

impl FormFillingEngine {
    /// Creates an engine over the given interpreter and sink.
    pub fn new(
        interpreter: Arc<dyn LanguageUnderstanding>,
        sink: Arc<dyn CompletedFormSink>,
        config: EngineConfig,
    ) -> Self {
        tracing::info!(
            interpreter = %interpreter.info().name,
            max_retries = config.max_retries,
            "engine created"
        );
        Self {
            interpreter,
            sink,
            config,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Starts a session over an already-validated schema and returns the
    /// first prompt.
    pub async fn start_session(
        &self,
        schema: Arc<FormSchema>,
    ) -> Result<(SessionId, NextStep), EngineError> {
        let mut orchestrator =
            DialogueOrchestrator::new(schema, self.extractor(), self.config.max_retries);
        let first = orchestrator.start()?;
        let session_id = *orchestrator.session().id();
        tracing::info!(session = %session_id, "session started");

        self.register(session_id, orchestrator).await;
        Ok((session_id, first))
    }

    /// Parses a raw schema document and starts a session over it.
    pub async fn start_session_from_json(
        &self,
        schema_json: &str,
    ) -> Result<(SessionId, NextStep), EngineError> {
        let schema = Arc::new(FormSchema::from_json(schema_json)?);
        self.start_session(schema).await
    }

    /// Processes one utterance for the field the session is waiting on.
    ///
    /// Completion is handled here: when the turn finishes the form, the
    /// document is delivered to the sink before the outcome is returned.
    pub async fn process_utterance(
        &self,
        session_id: SessionId,
        utterance: &str,
    ) -> Result<TurnOutcome, EngineError> {
        let orchestrator = self.handle(session_id).await?;
        let mut guard = orchestrator
            .try_lock()
            .map_err(|_| EngineError::TurnInFlight(session_id))?;
        let outcome = guard.process_utterance(utterance).await?;
        drop(guard);

        self.deliver_if_complete(&outcome).await?;
        Ok(outcome)
    }

    /// Processes an utterance for a caller-chosen field, out of tab order.
    pub async fn answer_field(
        &self,
        session_id: SessionId,
        field_id: FieldId,
        utterance: &str,
    ) -> Result<TurnOutcome, EngineError> {
        let orchestrator = self.handle(session_id).await?;
        let mut guard = orchestrator
            .try_lock()
            .map_err(|_| EngineError::TurnInFlight(session_id))?;
        let outcome = guard.answer_field(field_id, utterance).await?;
        drop(guard);

        self.deliver_if_complete(&outcome).await?;
        Ok(outcome)
    }

    /// Ends a session and drops it from the registry.
    ///
    /// A live session is transitioned to abandoned first. A session that
    /// already reached a terminal status (complete or failed) is evicted
    /// as-is, so registry entries never outlive their callers.
    pub async fn abandon_session(&self, session_id: SessionId) -> Result<(), EngineError> {
        let orchestrator = self.handle(session_id).await?;
        {
            let mut guard = orchestrator
                .try_lock()
                .map_err(|_| EngineError::TurnInFlight(session_id))?;
            if guard.session().status().is_live() {
                guard.abandon()?;
            }
        }
        self.sessions.write().await.remove(&session_id);
        Ok(())
    }

    /// Re-assembles the completed form for a session.
    ///
    /// The document is a pure function of the session, so callers can
    /// fetch it again after a failed sink delivery instead of losing it.
    pub async fn assemble(&self, session_id: SessionId) -> Result<FilledForm, EngineError> {
        let orchestrator = self.handle(session_id).await?;
        let guard = orchestrator
            .try_lock()
            .map_err(|_| EngineError::TurnInFlight(session_id))?;
        Ok(guard.filled_form()?)
    }

    /// Snapshots a live session for later resumption.
    pub async fn snapshot(&self, session_id: SessionId) -> Result<SessionSnapshot, EngineError> {
        let orchestrator = self.handle(session_id).await?;
        let guard = orchestrator
            .try_lock()
            .map_err(|_| EngineError::TurnInFlight(session_id))?;
        Ok(guard.session().snapshot())
    }

    /// Restores a session from a snapshot and re-registers it.
    pub async fn resume_session(
        &self,
        schema: Arc<FormSchema>,
        snapshot: SessionSnapshot,
    ) -> Result<SessionId, EngineError> {
        let session = Session::from_snapshot(snapshot);
        let orchestrator = DialogueOrchestrator::resume(
            schema,
            session,
            self.extractor(),
            self.config.max_retries,
        )?;
        let session_id = *orchestrator.session().id();
        tracing::info!(session = %session_id, "session resumed");

        self.register(session_id, orchestrator).await;
        Ok(session_id)
    }

    /// Returns the ids of all registered sessions.
    pub async fn session_ids(&self) -> Vec<SessionId> {
        self.sessions.read().await.keys().copied().collect()
    }

    fn extractor(&self) -> AnswerExtractor {
        AnswerExtractor::new(Arc::clone(&self.interpreter), self.config.interpret_timeout())
    }

    async fn register(&self, session_id: SessionId, orchestrator: DialogueOrchestrator) {
        self.sessions.write().await.insert(
            session_id,
            SessionHandle {
                orchestrator: Arc::new(Mutex::new(orchestrator)),
            },
        );
    }

    async fn handle(
        &self,
        session_id: SessionId,
    ) -> Result<Arc<Mutex<DialogueOrchestrator>>, EngineError> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .map(|h| Arc::clone(&h.orchestrator))
            .ok_or(EngineError::SessionNotFound(session_id))
    }

    async fn deliver_if_complete(&self, outcome: &TurnOutcome) -> Result<(), EngineError> {
        let form = match outcome {
            TurnOutcome::Accepted {
                next: NextStep::Complete(form),
                ..
            }
            | TurnOutcome::FieldSkipped {
                next: NextStep::Complete(form),
                ..
            } => form,
            _ => return Ok(()),
        };
        self.sink.deliver(form).await?;
        tracing::info!(form = %form.form_id, "completed form delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::lu::MockInterpreter;
    use crate::adapters::sink::InMemoryFormSink;
    use crate::domain::completion::FilledValue;
    use std::time::Duration;

    fn schema_json() -> String {
        serde_json::json!({
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
                    "id": "dob",
                    "label": "Date of Birth",
                    "type": "date",
                    "required": true,
                    "accessibility": {"tabOrder": 2}
                }
            ]
        })
        .to_string()
    }

    fn engine_with(interpreter: MockInterpreter, sink: InMemoryFormSink) -> FormFillingEngine {
        FormFillingEngine::new(
            Arc::new(interpreter),
            Arc::new(sink),
            EngineConfig {
                max_retries: 3,
                interpret_timeout_secs: 1,
            },
        )
    }

    #[tokio::test]
    async fn completed_form_reaches_the_sink() {
        let sink = InMemoryFormSink::new();
        let engine = engine_with(MockInterpreter::new(), sink.clone());

        let (session_id, first) = engine.start_session_from_json(&schema_json()).await.unwrap();
        assert!(matches!(first, NextStep::Ask(_)));

        engine
            .process_utterance(session_id, "John Smith")
            .await
            .unwrap();
        let outcome = engine
            .process_utterance(session_id, "04/29/2006")
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            TurnOutcome::Accepted {
                next: NextStep::Complete(_),
                ..
            }
        ));
        assert_eq!(sink.count(), 1);
        let delivered = sink.delivered();
        assert_eq!(
            delivered[0].value(&FieldId::new("dob")),
            Some(&FilledValue::Text("2006-04-29".into()))
        );
    }

    #[tokio::test]
    async fn unknown_session_is_rejected() {
        let engine = engine_with(MockInterpreter::new(), InMemoryFormSink::new());
        let missing = SessionId::new();

        let result = engine.process_utterance(missing, "hello").await;
        assert!(matches!(
            result,
            Err(EngineError::SessionNotFound(id)) if id == missing
        ));
    }

    #[tokio::test]
    async fn concurrent_turns_on_one_session_are_rejected() {
        let interpreter = MockInterpreter::new().with_delay(Duration::from_millis(200));
        let engine = Arc::new(engine_with(interpreter, InMemoryFormSink::new()));

        let (session_id, _) = engine.start_session_from_json(&schema_json()).await.unwrap();

        let first = {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move { engine.process_utterance(session_id, "John Smith").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let second = engine.process_utterance(session_id, "Jane Doe").await;
        assert!(matches!(second, Err(EngineError::TurnInFlight(id)) if id == session_id));

        let first = first.await.unwrap().unwrap();
        assert!(matches!(first, TurnOutcome::Accepted { .. }));
    }

    #[tokio::test]
    async fn snapshot_resume_round_trip() {
        let schema = Arc::new(FormSchema::from_json(&schema_json()).unwrap());
        let engine = engine_with(MockInterpreter::new(), InMemoryFormSink::new());

        let (session_id, _) = engine.start_session(Arc::clone(&schema)).await.unwrap();
        engine
            .process_utterance(session_id, "John Smith")
            .await
            .unwrap();

        let snapshot = engine.snapshot(session_id).await.unwrap();
        engine.abandon_session(session_id).await.unwrap();
        let resumed_id = engine
            .resume_session(Arc::clone(&schema), snapshot)
            .await
            .unwrap();
        assert_eq!(resumed_id, session_id);

        let outcome = engine
            .process_utterance(resumed_id, "04/29/2006")
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            TurnOutcome::Accepted {
                next: NextStep::Complete(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn completed_session_is_evicted_without_error() {
        let engine = engine_with(MockInterpreter::new(), InMemoryFormSink::new());
        let (session_id, _) = engine.start_session_from_json(&schema_json()).await.unwrap();

        engine
            .process_utterance(session_id, "John Smith")
            .await
            .unwrap();
        engine
            .process_utterance(session_id, "04/29/2006")
            .await
            .unwrap();

        engine.abandon_session(session_id).await.unwrap();
        assert!(engine.session_ids().await.is_empty());
    }

    #[tokio::test]
    async fn failed_delivery_does_not_lose_the_document() {
        let engine = engine_with(MockInterpreter::new(), InMemoryFormSink::failing("wire down"));
        let (session_id, _) = engine.start_session_from_json(&schema_json()).await.unwrap();

        engine
            .process_utterance(session_id, "John Smith")
            .await
            .unwrap();
        let result = engine.process_utterance(session_id, "04/29/2006").await;
        assert!(matches!(result, Err(EngineError::Delivery(_))));

        // The session completed; the document stays fetchable.
        let form = engine.assemble(session_id).await.unwrap();
        assert_eq!(
            form.value(&FieldId::new("dob")),
            Some(&FilledValue::Text("2006-04-29".into()))
        );
    }

    #[tokio::test]
    async fn abandoned_session_is_dropped_from_the_registry() {
        let engine = engine_with(MockInterpreter::new(), InMemoryFormSink::new());
        let (session_id, _) = engine.start_session_from_json(&schema_json()).await.unwrap();

        engine.abandon_session(session_id).await.unwrap();
        assert!(engine.session_ids().await.is_empty());
        assert!(matches!(
            engine.process_utterance(session_id, "hello").await,
            Err(EngineError::SessionNotFound(_))
        ));
    }
}
