//! History inspection and position-indexed editing

use super::AppState;
use crate::Result;
use axum::{extract::State, routing::get, Json, Router};
use murmur_core::ConversationLog;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct EditRequest {
    pub index: i64,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    pub index: i64,
}

pub fn history_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/history",
            get(list_history).put(edit_entry).delete(delete_entry),
        )
        .with_state(state)
}

async fn list_history(State(ctx): State<AppState>) -> Json<ConversationLog> {
    Json(ctx.editor().list())
}

/// Out-of-range and negative indices leave the log alone; the response is
/// the current log either way.
async fn edit_entry(
    State(ctx): State<AppState>,
    Json(request): Json<EditRequest>,
) -> Result<Json<ConversationLog>> {
    let editor = ctx.editor();
    if let Ok(index) = usize::try_from(request.index) {
        editor.edit(index, request.content)?;
    }
    Ok(Json(editor.list()))
}

async fn delete_entry(
    State(ctx): State<AppState>,
    Json(request): Json<DeleteRequest>,
) -> Result<Json<ConversationLog>> {
    let editor = ctx.editor();
    if let Ok(index) = usize::try_from(request.index) {
        editor.delete(index)?;
    }
    Ok(Json(editor.list()))
}
