//! Liveness probe that also confirms the history file is readable

use super::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(state)
}

async fn health(State(ctx): State<AppState>) -> Json<Value> {
    let store = ctx.store();
    Json(json!({
        "status": "ok",
        "messages": store.load().len(),
        "max_history": store.max_history(),
    }))
}
