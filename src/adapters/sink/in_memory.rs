//! In-memory form sink.
//!
//! Collects delivered documents for inspection. Used in tests and as a
//! placeholder in deployments that read completions straight off the
//! engine's return values.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::domain::completion::FilledForm;
use crate::ports::{CompletedFormSink, SinkError};

/// Sink that accumulates delivered forms in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFormSink {
    delivered: Arc<Mutex<Vec<FilledForm>>>,
    fail_with: Option<String>,
}

impl InMemoryFormSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every delivery fail with the given message.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            delivered: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(message.into()),
        }
    }

    /// Returns all delivered forms.
    pub fn delivered(&self) -> Vec<FilledForm> {
        self.delivered.lock().unwrap().clone()
    }

    /// Returns the number of delivered forms.
    pub fn count(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletedFormSink for InMemoryFormSink {
    async fn deliver(&self, form: &FilledForm) -> Result<(), SinkError> {
        if let Some(ref message) = self.fail_with {
            return Err(SinkError::Delivery(message.clone()));
        }
        self.delivered.lock().unwrap().push(form.clone());
        Ok(())
    }
}
