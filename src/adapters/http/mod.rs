//! HTTP adapters - REST API implementations.
//!
//! - `chat` - `POST /api/chat/orchestrator`
//! - `admin` - `/api/admin/ai-status` family
//!
//! [`api_router`] merges both routers; [`with_middleware`] adds tracing,
//! CORS, request timeout, and panic recovery.

pub mod admin;
pub mod chat;
pub mod error;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;

pub use admin::{admin_router, AdminAppState};
pub use chat::{chat_router, ChatAppState};
pub use error::ErrorResponse;

/// All API routes with their state attached.
pub fn api_router(chat: ChatAppState, admin: AdminAppState) -> Router {
    Router::new()
        .merge(chat_router(chat))
        .merge(admin_router(admin))
}

/// Wraps a router in the standard middleware stack.
pub fn with_middleware(router: Router, server: &ServerConfig) -> Router {
    router
        .layer(TimeoutLayer::new(server.request_timeout()))
        .layer(cors_layer(server))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(error::panic_response))
}

/// Configured origins when given; permissive outside production otherwise.
fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if !origins.is_empty() {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else if server.is_production() {
        CorsLayer::new()
    } else {
        CorsLayer::permissive()
    }
}
