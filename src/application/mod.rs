//! Application layer - session registry and engine facade.

mod engine;

pub use engine::{EngineError, FormFillingEngine};
