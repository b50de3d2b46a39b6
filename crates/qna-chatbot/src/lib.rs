//! qna-chatbot: retrieval-augmented Q&A over a CSV knowledge base
//!
//! At startup the knowledge base is loaded and embedded into an in-memory
//! index. Each `/chat` or `/chat_stream` request retrieves the most similar
//! records, renders them into a prompt and asks a hosted chat model for the
//! answer, returned whole as JSON or streamed as plain text.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use types::{
    document::{Document, ScoredDocument},
    query::ChatRequest,
    response::{ApiResponse, ChatData},
};
