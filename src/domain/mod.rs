//! Domain layer - the form-filling engine's core logic.
//!
//! Pure logic with no transport or storage concerns. The only outward
//! dependency is the language-understanding port used by the extractor.

pub mod completion;
pub mod dialogue;
pub mod extraction;
pub mod foundation;
pub mod schema;
pub mod session;
pub mod validation;
