//! Completed Form Sink Port - where finished documents go.
//!
//! The engine does not persist submissions; it hands each completed,
//! validated document to a caller-supplied sink and forgets about it.

use async_trait::async_trait;

use crate::domain::completion::FilledForm;

/// Errors raised while delivering a completed form.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Port receiving completed form documents.
#[async_trait]
pub trait CompletedFormSink: Send + Sync {
    /// Delivers one completed form.
    async fn deliver(&self, form: &FilledForm) -> Result<(), SinkError>;
}
