//! Language-understanding service configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Interpreter configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct InterpreterConfig {
    /// API key for the interpretation service. Absent means tests/mock
    /// only; building the OpenAI adapter without it is a validation
    /// error at wiring time.
    pub api_key: Option<String>,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl InterpreterConfig {
    /// Request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check whether an API key is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate interpreter configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        Ok(())
    }

    /// Validate that the service can actually be called, for deployments
    /// wiring the real adapter.
    pub fn validate_for_live_use(&self) -> Result<(), ValidationError> {
        self.validate()?;
        if !self.has_api_key() {
            return Err(ValidationError::MissingRequired("INTERPRETER__API_KEY"));
        }
        Ok(())
    }
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_timeout() -> u64 {
    30
}
