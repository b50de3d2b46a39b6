//! Core data types for the chatbot

pub mod document;
pub mod query;
pub mod response;

pub use document::{Document, ScoredDocument};
pub use query::ChatRequest;
pub use response::{ApiResponse, ChatData, ResponseStatus};
