//! pdf-rag: minimal PDF question answering over an in-memory vector index
//!
//! Uploaded PDFs are extracted, chunked, embedded through an OpenAI-compatible
//! API and kept in a flat L2 index. Questions are embedded the same way, the
//! nearest chunks are retrieved and handed to a chat model as context.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod storage;
pub mod types;

#[cfg(test)]
mod testing;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use retrieval::{SearchHit, VectorIndex};
pub use types::{AskResponse, ChunksResponse, UploadResponse};
