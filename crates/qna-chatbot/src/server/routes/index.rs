//! Service banner and liveness endpoints

use axum::{extract::State, Json};
use serde::Serialize;

use crate::server::state::AppState;
use crate::types::ApiResponse;

/// Service description returned by `GET /`
#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub model: String,
    pub documents: usize,
}

/// GET / - Service banner
pub async fn index(State(state): State<AppState>) -> Json<ApiResponse<ServiceInfo>> {
    Json(ApiResponse::success(
        "Chatbot API is running",
        ServiceInfo {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            model: state.llm().model().to_string(),
            documents: state.index().len(),
        },
    ))
}

/// GET /health - Liveness check
pub async fn health() -> &'static str {
    "OK"
}
