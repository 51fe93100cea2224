//! Provider abstractions for embeddings and answer generation
//!
//! The remote services are reached through narrow async traits so the
//! server can be driven by stub providers in tests.

pub mod embedding;
pub mod llm;
pub mod openai;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use openai::{OpenAiEmbedder, OpenAiLlm};
