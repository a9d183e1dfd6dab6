//! Streaming chat endpoint

use super::AppState;
use crate::WebError;
use axum::{
    body::Body,
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use futures::StreamExt;
use serde::Deserialize;
use std::convert::Infallible;

/// Request body for chat messages
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

pub fn chat_routes(state: AppState) -> Router {
    Router::new()
        .route("/chat", post(chat_handler))
        .with_state(state)
}

/// Stream the reply as plain text. A failure mid-cycle becomes a final
/// `[error: ...]` fragment so the client sees why the text stopped.
async fn chat_handler(
    State(ctx): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Response, WebError> {
    if request.message.trim().is_empty() {
        return Err(WebError::BadRequest("Message cannot be empty".to_string()));
    }

    tracing::info!(chars = request.message.chars().count(), "Chat request");

    let body = ctx
        .relay()
        .respond(request.message)
        .map(|item| {
            Ok::<_, Infallible>(match item {
                Ok(fragment) => fragment,
                Err(e) => format!("\n[error: {e}]"),
            })
        });

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(body),
    )
        .into_response())
}
