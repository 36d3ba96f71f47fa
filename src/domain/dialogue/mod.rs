//! Dialogue Orchestrator - the state machine driving the conversation.
//!
//! Selects fields in tab order, runs each utterance through the extractor
//! and validator, re-prompts on rejection, and detects completion.

mod error;
mod orchestrator;
mod prompt;
mod state;

pub use error::OrchestratorError;
pub use orchestrator::{DialogueOrchestrator, NextStep, TurnOutcome};
pub use prompt::{clarification, question, Prompt};
pub use state::DialogueState;
