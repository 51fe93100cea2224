//! Error types for the RAG service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Response detail for any quota condition, from either remote service
pub const QUOTA_EXCEEDED_DETAIL: &str =
    "OpenAI quota exceeded. Please check your OpenAI account and billing details.";

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAG service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input (vector/chunk count mismatch, wrong dimensionality, bad filename)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Remote embedding/generation service ran out of quota or hit its rate limit
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Any other failure from the remote embedding/generation service
    #[error("Remote service error: {0}")]
    RemoteService(String),

    /// Text extraction failed
    #[error("Text extraction failed: {0}")]
    Extraction(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Create a remote service error
    pub fn remote(message: impl Into<String>) -> Self {
        Self::RemoteService(message.into())
    }

    /// Create a quota exceeded error
    pub fn quota(message: impl Into<String>) -> Self {
        Self::QuotaExceeded(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error is the quota/billing condition
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Error::QuotaExceeded(_))
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            Error::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "invalid_input", msg.clone()),
            Error::QuotaExceeded(_) => (
                StatusCode::TOO_MANY_REQUESTS,
                "quota_exceeded",
                QUOTA_EXCEEDED_DETAIL.to_string(),
            ),
            Error::RemoteService(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "remote_service_error", msg.clone())
            }
            Error::Extraction(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "extraction_error", msg.clone())
            }
            Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error", msg.clone()),
            Error::Io(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "io_error",
                err.to_string(),
            ),
            Error::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone())
            }
        };

        let body = Json(json!({
            "detail": message,
            "type": error_type,
        }));

        (status, body).into_response()
    }
}
