//! Answer generation: prompt templating and retrieval orchestration

mod answerer;
mod prompt;

pub use answerer::{Answerer, NOT_FOUND_ANSWER};
pub use prompt::PromptBuilder;
