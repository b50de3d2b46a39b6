//! Error types for the chatbot service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::types::response::ApiResponse;

/// Result type alias for chatbot operations
pub type Result<T> = std::result::Result<T, Error>;

/// Chatbot service errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Knowledge base could not be read or parsed
    #[error("Failed to load knowledge base '{path}': {message}")]
    KnowledgeBase { path: String, message: String },

    /// Embedding error
    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    /// Chat model error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Request body could not be understood
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials
    #[error("Unauthorized")]
    Unauthorized,

    /// Client exceeded its request quota
    #[error("Rate limit exceeded")]
    RateLimited,

    /// Route exists but not for this method
    #[error("Invalid request method")]
    MethodNotAllowed,

    /// No such route
    #[error("Not found")]
    NotFound,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a knowledge base error
    pub fn knowledge_base(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::KnowledgeBase {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// HTTP status and the message shown to clients
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Error::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized access".to_string()),
            Error::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "Too many requests".to_string()),
            Error::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Invalid request method".to_string(),
            ),
            Error::NotFound => (StatusCode::NOT_FOUND, "Not found".to_string()),
            Error::Embedding(_) => (StatusCode::BAD_GATEWAY, "Embedding service error".to_string()),
            Error::Llm(_) => (StatusCode::BAD_GATEWAY, "Language model error".to_string()),
            Error::Http(_) => (StatusCode::BAD_GATEWAY, "Upstream request failed".to_string()),
            Error::Config(_)
            | Error::KnowledgeBase { .. }
            | Error::Io(_)
            | Error::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        (status, Json(ApiResponse::<()>::error(status, message))).into_response()
    }
}
