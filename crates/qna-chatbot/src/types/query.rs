//! Chat request types

use serde::{Deserialize, Serialize};

/// Body accepted by `/chat` and `/chat_stream`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// The user's question
    pub message: String,
}
