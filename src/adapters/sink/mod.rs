//! Completed-form sink adapters.

mod in_memory;

pub use in_memory::InMemoryFormSink;
