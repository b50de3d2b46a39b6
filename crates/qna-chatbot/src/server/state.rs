//! Application state for the chatbot server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::generation::RagChain;
use crate::ingestion::load_csv;
use crate::providers::{EmbeddingProvider, LlmProvider, OpenAiClient};
use crate::retrieval::EmbeddingIndex;

use super::auth::ApiTokens;
use super::rate_limit::ClientRateLimiter;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Knowledge base index, read-only after startup
    index: Arc<EmbeddingIndex>,
    /// Chat model
    llm: Arc<dyn LlmProvider>,
    /// Accepted bearer tokens
    tokens: ApiTokens,
    /// Per-client request quota
    rate_limiter: ClientRateLimiter,
}

impl AppState {
    /// Load the knowledge base, build the index and connect the model
    ///
    /// Any failure here is fatal: the server must not accept requests
    /// without a complete index.
    pub async fn initialize(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing chatbot state...");

        let documents = load_csv(&config.knowledge_base.path)?;

        let client = Arc::new(OpenAiClient::new(&config.llm, &config.embeddings)?);
        tracing::info!(
            "OpenAI client initialized (chat: {}, embeddings: {})",
            config.llm.chat_model,
            config.embeddings.model
        );

        let embedder: Arc<dyn EmbeddingProvider> = client.clone();
        let index = EmbeddingIndex::build(documents, embedder, config.embeddings.batch_size).await?;

        Ok(Self::from_parts(config, index, client))
    }

    /// Assemble state from already constructed collaborators
    pub fn from_parts(config: RagConfig, index: EmbeddingIndex, llm: Arc<dyn LlmProvider>) -> Self {
        let tokens = ApiTokens::new(&config.auth.tokens);
        let rate_limiter = ClientRateLimiter::new(&config.rate_limit);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                index: Arc::new(index),
                llm,
                tokens,
                rate_limiter,
            }),
        }
    }

    /// Fresh retrieval chain for one request
    pub fn chain(&self) -> RagChain {
        RagChain::new(
            Arc::clone(&self.inner.index),
            Arc::clone(&self.inner.llm),
            self.inner.config.retrieval.top_k,
        )
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the knowledge base index
    pub fn index(&self) -> &EmbeddingIndex {
        &self.inner.index
    }

    /// Get the chat model
    pub fn llm(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm
    }

    /// Get accepted API tokens
    pub fn tokens(&self) -> &ApiTokens {
        &self.inner.tokens
    }

    /// Get the rate limiter
    pub fn rate_limiter(&self) -> &ClientRateLimiter {
        &self.inner.rate_limiter
    }
}
