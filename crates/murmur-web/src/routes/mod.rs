mod chat;
mod health;
mod history;
mod index;

use axum::Router;
use murmur_core::ChatContext;
use std::sync::Arc;

pub use chat::chat_routes;
pub use health::health_routes;
pub use history::history_routes;
pub use index::index_routes;

/// Shared state for every route.
pub type AppState = Arc<ChatContext>;

/// The full application router.
pub fn router(ctx: ChatContext) -> Router {
    let state: AppState = Arc::new(ctx);
    Router::new()
        .merge(chat_routes(state.clone()))
        .merge(history_routes(state.clone()))
        .merge(health_routes(state))
        .merge(index_routes())
}
