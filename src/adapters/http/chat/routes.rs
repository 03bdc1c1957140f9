//! Route definitions for the chat endpoint.

use axum::routing::post;
use axum::Router;

use super::handlers::{orchestrate, ChatAppState};

/// Create the chat router.
///
/// # Endpoints
///
/// - `POST /api/chat/orchestrator` - Orchestrate an assistant response
pub fn chat_routes() -> Router<ChatAppState> {
    Router::new().route("/api/chat/orchestrator", post(orchestrate))
}

/// Chat router with its state attached.
pub fn chat_router(state: ChatAppState) -> Router {
    chat_routes().with_state(state)
}
