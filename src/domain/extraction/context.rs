//! Conversation context passed to the language-understanding service.

use serde::{Deserialize, Serialize};

/// One previously answered exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextExchange {
    /// Label of the field that was answered.
    pub field_label: String,
    /// The accepted, normalized answer.
    pub answer: String,
}

/// Prior answered exchanges of a session, in acceptance order.
///
/// Scoped per session, never shared across users. Passed along with each
/// interpretation request so the service can resolve references like
/// "same as before".
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConversationContext {
    exchanges: Vec<ContextExchange>,
}

impl ConversationContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one answered exchange.
    pub fn record(&mut self, field_label: impl Into<String>, answer: impl Into<String>) {
        self.exchanges.push(ContextExchange {
            field_label: field_label.into(),
            answer: answer.into(),
        });
    }

    /// Returns the exchanges in order.
    pub fn exchanges(&self) -> &[ContextExchange] {
        &self.exchanges
    }

    /// Returns true when nothing has been answered yet.
    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}
