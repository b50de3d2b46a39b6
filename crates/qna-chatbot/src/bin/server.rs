//! Chatbot server binary
//!
//! Run with: cargo run -p qna-chatbot --bin qna-chatbot-server

use qna_chatbot::{config::RagConfig, server::ChatServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Environment from .env, if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qna_chatbot=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = RagConfig::from_env()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Knowledge base: {}", config.knowledge_base.path.display());
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - Chat model: {}", config.llm.chat_model);
    tracing::info!("  - Top-k: {}", config.retrieval.top_k);
    tracing::info!("  - CORS origins: {}", config.server.cors_origins.join(", "));

    // Build the index before accepting any request
    let server = ChatServer::new(config).await?;

    tracing::info!("Endpoints:");
    tracing::info!("  POST http://{}/chat        - Ask a question", server.address());
    tracing::info!("  POST http://{}/chat_stream - Ask a question, streamed answer", server.address());

    server.start().await?;

    Ok(())
}
