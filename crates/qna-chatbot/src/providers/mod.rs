//! Provider abstractions for embeddings and the chat model
//!
//! The index and the request handlers only see these traits, so the
//! OpenAI-backed implementation can be swapped for any compatible API.

pub mod embedding;
pub mod llm;
pub mod openai;
mod sse;

pub use embedding::EmbeddingProvider;
pub use llm::{FragmentStream, LlmProvider};
pub use openai::OpenAiClient;
