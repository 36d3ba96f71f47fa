//! Ports - async trait boundaries to the engine's collaborators.
//!
//! The engine treats everything beyond these traits as external: the
//! language-understanding service, snapshot storage, and the sink that
//! receives completed documents.

mod form_sink;
mod language_understanding;
mod session_store;

pub use form_sink::{CompletedFormSink, SinkError};
pub use language_understanding::{
    Interpretation, InterpretationRequest, InterpretedValue, InterpreterError, InterpreterInfo,
    LanguageUnderstanding,
};
pub use session_store::{SessionStore, SessionStoreError};
