//! Answer Extractor - turns an utterance into a typed candidate value.
//!
//! The extractor owns the contract with the language-understanding
//! service: it pre-filters obvious non-answers, applies the engine's
//! deadline, and shape-checks whatever the service returns. Anything
//! inconsistent with the target field's type becomes a no-match instead of
//! a malformed value.

mod candidate;
mod context;
mod extractor;

pub use candidate::{Candidate, Extraction};
pub use context::{ContextExchange, ConversationContext};
pub use extractor::AnswerExtractor;
