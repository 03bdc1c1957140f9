//! HTTP adapter for the assistant chat endpoint.
//!
//! - `POST /api/chat/orchestrator` - Orchestrate an assistant response

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{ChatApiError, ChatAppState};
pub use routes::{chat_router, chat_routes};
