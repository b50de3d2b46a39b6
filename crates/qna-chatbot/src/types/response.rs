//! Response envelope shared by every JSON endpoint

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// `{"status": {...}, "data": ...}` envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    pub data: Option<T>,
}

/// Status block of the envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseStatus {
    /// Mirrors the HTTP status code
    pub code: u16,
    pub message: String,
}

/// Payload of a successful `/chat` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatData {
    pub answer: String,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            status: ResponseStatus {
                code: StatusCode::OK.as_u16(),
                message: message.into(),
            },
            data: Some(data),
        }
    }

    /// Error response with `data: null`
    pub fn error(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus {
                code: status.as_u16(),
                message: message.into(),
            },
            data: None,
        }
    }
}

impl ApiResponse<ChatData> {
    /// Envelope returned by `/chat`
    pub fn answer(answer: String) -> Self {
        Self::success("Success get the answers", ChatData { answer })
    }
}
