//! Chat endpoints: one-shot JSON answers and streamed plain text

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use futures_util::TryStreamExt;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::auth::Authenticated;
use crate::server::state::AppState;
use crate::types::{ApiResponse, ChatData, ChatRequest};

fn parse_body(payload: std::result::Result<Json<ChatRequest>, JsonRejection>) -> Result<ChatRequest> {
    payload
        .map(|Json(request)| request)
        .map_err(|rejection| Error::BadRequest(rejection.body_text()))
}

/// POST /chat - Answer a question in one JSON response
pub async fn chat(
    State(state): State<AppState>,
    _auth: Authenticated,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ChatData>>> {
    let request = parse_body(payload)?;
    let start = Instant::now();

    tracing::info!(chars = request.message.chars().count(), "Chat request");
    tracing::debug!(message = %request.message, "Chat question");

    let answer = state.chain().invoke(&request.message).await?;

    tracing::info!(
        "Chat answered in {}ms ({} chars)",
        start.elapsed().as_millis(),
        answer.len()
    );

    Ok(Json(ApiResponse::answer(answer)))
}

/// POST /chat_stream - Stream the answer as raw text fragments
///
/// The body is held open until the model finishes. A model failure after
/// the first fragment aborts the body, which closes the connection.
pub async fn chat_stream(
    State(state): State<AppState>,
    _auth: Authenticated,
    payload: std::result::Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response> {
    let request = parse_body(payload)?;

    tracing::info!(chars = request.message.chars().count(), "Chat stream request");
    tracing::debug!(message = %request.message, "Chat stream question");

    let fragments = state
        .chain()
        .stream(&request.message)
        .await?
        .inspect_err(|e| tracing::error!(error = %e, "Answer stream aborted"));

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(fragments),
    )
        .into_response())
}
