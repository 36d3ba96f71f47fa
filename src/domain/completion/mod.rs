//! Completion Assembler - renders the final filled form document.

mod assembler;

pub use assembler::{assemble, AssemblyError, FilledField, FilledForm, FilledValue};
