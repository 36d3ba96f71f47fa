//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `FORMGUIDE_` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use formguide::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod engine;
mod error;
mod interpreter;

pub use engine::EngineConfig;
pub use error::{ConfigError, ValidationError};
pub use interpreter::InterpreterConfig;

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Dialogue engine configuration (retries, deadlines).
    #[serde(default)]
    pub engine: EngineConfig,

    /// Language-understanding service configuration.
    #[serde(default)]
    pub interpreter: InterpreterConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file if present, then reads environment variables
    /// with the `FORMGUIDE` prefix, using `__` to separate nested values:
    ///
    /// - `FORMGUIDE__ENGINE__MAX_RETRIES=5` -> `engine.max_retries = 5`
    /// - `FORMGUIDE__INTERPRETER__API_KEY=...` -> `interpreter.api_key = ...`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("FORMGUIDE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.engine.validate()?;
        self.interpreter.validate()?;
        Ok(())
    }
}
