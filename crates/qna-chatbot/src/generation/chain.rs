//! Retrieval → prompt → model pipeline

use std::sync::Arc;

use crate::error::Result;
use crate::providers::{FragmentStream, LlmProvider};
use crate::retrieval::EmbeddingIndex;

use super::prompt::PromptComposer;

/// One question's path through retrieval, prompt rendering and generation
///
/// Holds only shared handles, so building one per request is cheap and no
/// state carries over between questions.
pub struct RagChain {
    index: Arc<EmbeddingIndex>,
    llm: Arc<dyn LlmProvider>,
    top_k: usize,
}

impl RagChain {
    pub fn new(index: Arc<EmbeddingIndex>, llm: Arc<dyn LlmProvider>, top_k: usize) -> Self {
        Self { index, llm, top_k }
    }

    /// Retrieve context for `question` and render the prompt
    pub async fn prompt(&self, question: &str) -> Result<String> {
        let context = self.index.retrieve(question, self.top_k).await?;

        tracing::debug!(
            retrieved = context.len(),
            top_score = ?context.first().map(|d| d.score),
            "context retrieved"
        );

        Ok(PromptComposer::compose(&context, question))
    }

    /// Answer `question` in one piece
    pub async fn invoke(&self, question: &str) -> Result<String> {
        let prompt = self.prompt(question).await?;
        self.llm.complete(&prompt).await
    }

    /// Answer `question` as a stream of text fragments
    pub async fn stream(&self, question: &str) -> Result<FragmentStream> {
        let prompt = self.prompt(question).await?;
        self.llm.complete_stream(&prompt).await
    }
}
