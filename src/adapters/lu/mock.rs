//! Mock interpreter for testing.
//!
//! Configurable to return queued interpretations, simulate latency, or
//! inject errors, with call recording for verification. When the queue is
//! empty it echoes the utterance back as a single candidate, which keeps
//! happy-path tests short.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    Interpretation, InterpretationRequest, InterpreterError, InterpreterInfo, LanguageUnderstanding,
};

/// A configured mock reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Return this interpretation.
    Success(Interpretation),
    /// Return an error.
    Failure(MockFailure),
}

/// Mock error shapes for testing error handling.
#[derive(Debug, Clone)]
pub enum MockFailure {
    RateLimited { retry_after_secs: u32 },
    AuthenticationFailed,
    Unavailable { message: String },
    Network { message: String },
    Parse { message: String },
    Timeout { timeout_secs: u64 },
}

impl From<MockFailure> for InterpreterError {
    fn from(failure: MockFailure) -> Self {
        match failure {
            MockFailure::RateLimited { retry_after_secs } => {
                InterpreterError::RateLimited { retry_after_secs }
            }
            MockFailure::AuthenticationFailed => InterpreterError::AuthenticationFailed,
            MockFailure::Unavailable { message } => InterpreterError::Unavailable(message),
            MockFailure::Network { message } => InterpreterError::Network(message),
            MockFailure::Parse { message } => InterpreterError::Parse(message),
            MockFailure::Timeout { timeout_secs } => InterpreterError::Timeout { timeout_secs },
        }
    }
}

/// Mock language-understanding service.
#[derive(Debug, Clone)]
pub struct MockInterpreter {
    /// Queued replies, consumed in order. Empty queue means echo mode.
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    /// Simulated latency per request.
    delay: Duration,
    /// Recorded requests for verification.
    calls: Arc<Mutex<Vec<InterpretationRequest>>>,
}

impl Default for MockInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl MockInterpreter {
    /// Creates a mock in echo mode with no latency.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            delay: Duration::ZERO,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Queues an interpretation to return.
    pub fn with_reply(self, interpretation: Interpretation) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Success(interpretation));
        self
    }

    /// Queues a single-value reply.
    pub fn with_single(self, value: impl Into<String>) -> Self {
        self.with_reply(Interpretation::single(value))
    }

    /// Queues a no-answer reply.
    pub fn with_none(self) -> Self {
        self.with_reply(Interpretation::none())
    }

    /// Queues an error.
    pub fn with_failure(self, failure: MockFailure) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(MockReply::Failure(failure));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of interpretation calls made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Returns all recorded requests.
    pub fn requests(&self) -> Vec<InterpretationRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageUnderstanding for MockInterpreter {
    async fn interpret(
        &self,
        request: InterpretationRequest,
    ) -> Result<Interpretation, InterpreterError> {
        let utterance = request.utterance.clone();
        self.calls.lock().unwrap().push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        let queued = self.replies.lock().unwrap().pop_front();
        match queued {
            Some(MockReply::Success(interpretation)) => Ok(interpretation),
            Some(MockReply::Failure(failure)) => Err(failure.into()),
            None => Ok(Interpretation::single(utterance)),
        }
    }

    fn info(&self) -> InterpreterInfo {
        InterpreterInfo::new("mock", "mock-model-1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::extraction::ConversationContext;
    use crate::ports::InterpretedValue;

    fn request(utterance: &str) -> InterpretationRequest {
        InterpretationRequest {
            field_label: "Full Name".to_string(),
            field_type: crate::domain::schema::FieldType::Text,
            options: Vec::new(),
            required: true,
            hint: None,
            utterance: utterance.to_string(),
            context: ConversationContext::new(),
        }
    }

    #[tokio::test]
    async fn echoes_when_queue_is_empty() {
        let mock = MockInterpreter::new();
        let reply = mock.interpret(request("John Smith")).await.unwrap();
        assert_eq!(reply.value, InterpretedValue::Single("John Smith".into()));
    }

    #[tokio::test]
    async fn queued_replies_are_consumed_in_order() {
        let mock = MockInterpreter::new()
            .with_single("first")
            .with_none()
            .with_failure(MockFailure::AuthenticationFailed);

        let first = mock.interpret(request("a")).await.unwrap();
        assert_eq!(first.value, InterpretedValue::Single("first".into()));

        let second = mock.interpret(request("b")).await.unwrap();
        assert_eq!(second.value, InterpretedValue::None);

        let third = mock.interpret(request("c")).await;
        assert!(matches!(third, Err(InterpreterError::AuthenticationFailed)));

        // back to echo mode
        let fourth = mock.interpret(request("d")).await.unwrap();
        assert_eq!(fourth.value, InterpretedValue::Single("d".into()));
    }

    #[tokio::test]
    async fn records_calls() {
        let mock = MockInterpreter::new();
        mock.interpret(request("one")).await.unwrap();
        mock.interpret(request("two")).await.unwrap();

        assert_eq!(mock.call_count(), 2);
        assert_eq!(mock.requests()[1].utterance, "two");
    }
}
