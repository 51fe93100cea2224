//! Request and response types for the HTTP API

pub mod query;
pub mod response;

pub use query::AskQuery;
pub use response::{AskResponse, ChunksResponse, UploadResponse};
