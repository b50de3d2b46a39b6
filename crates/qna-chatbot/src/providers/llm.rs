//! LLM provider trait for generating answers

use async_trait::async_trait;
use futures_util::Stream;
use std::pin::Pin;

use crate::error::Result;

/// Lazily produced answer fragments; finite and single-use
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Trait for chat-completion models
///
/// Implementations:
/// - `OpenAiClient`: OpenAI-compatible `/chat/completions` endpoint
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate the full answer for a rendered prompt
    async fn complete(&self, prompt: &str) -> Result<String>;

    /// Start generating an answer, yielding text fragments as they arrive
    ///
    /// Errors that happen before the first fragment (connection, auth) are
    /// returned directly; later failures surface as an `Err` item.
    async fn complete_stream(&self, prompt: &str) -> Result<FragmentStream>;

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}
