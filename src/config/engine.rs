//! Dialogue engine configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Rejected attempts allowed per field before it is skipped (optional
    /// fields) or the session fails (required fields).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Deadline for one interpretation call, in seconds.
    #[serde(default = "default_interpret_timeout")]
    pub interpret_timeout_secs: u64,
}

impl EngineConfig {
    /// Interpretation deadline as a Duration.
    pub fn interpret_timeout(&self) -> Duration {
        Duration::from_secs(self.interpret_timeout_secs)
    }

    /// Validate engine configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_retries == 0 {
            return Err(ValidationError::InvalidRetryLimit);
        }
        if self.interpret_timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            interpret_timeout_secs: default_interpret_timeout(),
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_interpret_timeout() -> u64 {
    10
}
