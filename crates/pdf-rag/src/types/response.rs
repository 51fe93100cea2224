//! Response types for the HTTP API

use serde::{Deserialize, Serialize};

/// Message returned after a successful upload
pub const UPLOAD_SUCCESS_MESSAGE: &str = "PDF processed and indexed successfully";

/// Response of `POST /upload-pdf`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Human-readable status message
    pub message: String,
}

impl UploadResponse {
    /// The success response
    pub fn success() -> Self {
        Self {
            message: UPLOAD_SUCCESS_MESSAGE.to_string(),
        }
    }
}

/// Response of `POST /ask`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Model response, verbatim
    pub answer: String,
}

/// Response of `GET /chunks`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunksResponse {
    /// Number of stored chunks
    pub total_chunks: usize,
    /// All stored chunks in insertion order
    pub chunks: Vec<String>,
}

impl From<Vec<String>> for ChunksResponse {
    fn from(chunks: Vec<String>) -> Self {
        Self {
            total_chunks: chunks.len(),
            chunks,
        }
    }
}
