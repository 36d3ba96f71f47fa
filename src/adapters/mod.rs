//! Adapters - concrete implementations of the engine's ports.

pub mod lu;
pub mod sink;
pub mod storage;
