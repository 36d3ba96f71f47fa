//! Language-understanding adapters.

mod mock;
mod openai;

pub use mock::{MockFailure, MockInterpreter, MockReply};
pub use openai::{OpenAiConfig, OpenAiInterpreter};
