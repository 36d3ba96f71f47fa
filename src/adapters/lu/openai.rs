//! OpenAI-backed interpreter.
//!
//! Sends one chat-completion request per utterance, constraining the model
//! to a strict JSON reply (`{"value": ...}`) so the extractor can
//! shape-check the result. Temperature is pinned to zero; interpretation
//! should be deterministic, not creative.
//!
//! # Configuration
//!
//! ```ignore
//! let config = OpenAiConfig::new(api_key)
//!     .with_model("gpt-4o-mini")
//!     .with_base_url("https://api.openai.com/v1");
//!
//! let interpreter = OpenAiInterpreter::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::time::Duration;

use crate::ports::{
    Interpretation, InterpretationRequest, InterpreterError, InterpreterInfo, LanguageUnderstanding,
};

/// Configuration for the OpenAI interpreter.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use.
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl OpenAiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// OpenAI chat-completions interpreter.
pub struct OpenAiInterpreter {
    config: OpenAiConfig,
    client: Client,
}

impl OpenAiInterpreter {
    /// Creates an interpreter with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, InterpreterError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| InterpreterError::Network(format!("failed to build client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    /// The system prompt constraining the model to our reply contract.
    fn system_prompt(request: &InterpretationRequest) -> String {
        let mut prompt = String::from(
            "You extract form-field answers from spoken utterances. \
             Reply with strict JSON only, no prose and no code fences.\n\
             Reply {\"value\": \"<answer>\"} when the utterance contains one answer, \
             {\"value\": [\"<a>\", \"<b>\"]} when the field accepts several, and \
             {\"value\": null} when the utterance contains no answer.\n",
        );
        let _ = write!(
            prompt,
            "Field: {} (type: {})",
            request.field_label, request.field_type
        );
        if !request.options.is_empty() {
            let _ = write!(
                prompt,
                "\nAllowed options (reply with exact option text): {}",
                request.options.join(", ")
            );
        }
        if let Some(ref hint) = request.hint {
            let _ = write!(prompt, "\nHint: {}", hint);
        }
        if !request.context.is_empty() {
            prompt.push_str("\nAlready answered:");
            for exchange in request.context.exchanges() {
                let _ = write!(prompt, "\n- {}: {}", exchange.field_label, exchange.answer);
            }
        }
        prompt
    }

    async fn send(&self, request: &InterpretationRequest) -> Result<Response, InterpreterError> {
        let body = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: Self::system_prompt(request),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.utterance.clone(),
                },
            ],
            temperature: 0.0,
        };

        self.client
            .post(self.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    InterpreterError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else {
                    InterpreterError::Network(e.to_string())
                }
            })
    }

    async fn check_status(&self, response: Response) -> Result<Response, InterpreterError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        match status.as_u16() {
            401 => Err(InterpreterError::AuthenticationFailed),
            429 => Err(InterpreterError::RateLimited {
                retry_after_secs: 30,
            }),
            500..=599 => Err(InterpreterError::Unavailable(format!(
                "server error {}: {}",
                status, body
            ))),
            _ => Err(InterpreterError::Network(format!(
                "unexpected status {}: {}",
                status, body
            ))),
        }
    }

    /// Parses the model's JSON reply into an interpretation.
    fn parse_reply(content: &str) -> Result<Interpretation, InterpreterError> {
        let stripped = strip_code_fences(content);
        let reply: ModelReply = serde_json::from_str(stripped)
            .map_err(|e| InterpreterError::Parse(format!("malformed reply: {}", e)))?;
        Ok(match reply.value {
            None => Interpretation::none(),
            Some(ReplyValue::Single(value)) => Interpretation::single(value),
            Some(ReplyValue::Multiple(values)) => Interpretation::multiple(values),
        })
    }
}

#[async_trait]
impl LanguageUnderstanding for OpenAiInterpreter {
    async fn interpret(
        &self,
        request: InterpretationRequest,
    ) -> Result<Interpretation, InterpreterError> {
        let response = self.send(&request).await?;
        let response = self.check_status(response).await?;

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| InterpreterError::Parse(format!("failed to parse response: {}", e)))?;

        let choice = chat
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| InterpreterError::Parse("no choices in response".to_string()))?;

        Self::parse_reply(&choice.message.content)
    }

    fn info(&self) -> InterpreterInfo {
        InterpreterInfo::new("openai", &self.config.model)
    }
}

/// Strips a surrounding markdown code fence, which models emit despite
/// instructions not to.
fn strip_code_fences(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

// ----- OpenAI API types -----

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// The reply contract the system prompt demands.
#[derive(Debug, Deserialize)]
struct ModelReply {
    #[serde(default)]
    value: Option<ReplyValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReplyValue {
    Single(String),
    Multiple(Vec<String>),
}
