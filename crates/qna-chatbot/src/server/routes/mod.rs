//! HTTP routes for the chatbot server

pub mod chat;
pub mod index;

use axum::{
    routing::{get, post},
    Router,
};

use crate::error::Error;
use crate::server::state::AppState;

/// Build all routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index::index))
        .route("/health", get(index::health))
        // Non-POST methods get the JSON 405 body instead of axum's empty one
        .route("/chat", post(chat::chat).fallback(method_not_allowed))
        .route(
            "/chat_stream",
            post(chat::chat_stream).fallback(method_not_allowed),
        )
        .fallback(not_found)
}

async fn method_not_allowed() -> Error {
    Error::MethodNotAllowed
}

async fn not_found() -> Error {
    Error::NotFound
}
