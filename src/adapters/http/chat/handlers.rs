//! HTTP handlers for the chat endpoint.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::dto::{OrchestrateRequest, OrchestrateResponse};
use crate::adapters::ai::FallbackOrchestrator;
use crate::adapters::http::error::ErrorResponse;
use crate::application::OrchestrateResponseHandler;

// ════════════════════════════════════════════════════════════════════════════════
// Error Types
// ════════════════════════════════════════════════════════════════════════════════

/// Chat endpoint errors.
///
/// Provider failures never show up here: the orchestrator answers with the
/// degraded result instead.
#[derive(Debug)]
pub enum ChatApiError {
    MessageRequired,
    InvalidBody(String),
}

impl IntoResponse for ChatApiError {
    fn into_response(self) -> axum::response::Response {
        let error = match self {
            ChatApiError::MessageRequired => ErrorResponse::bad_request("Message is required"),
            ChatApiError::InvalidBody(details) => {
                ErrorResponse::bad_request("Invalid request body").with_details(details)
            }
        };
        (StatusCode::BAD_REQUEST, Json(error)).into_response()
    }
}

impl From<JsonRejection> for ChatApiError {
    fn from(rejection: JsonRejection) -> Self {
        ChatApiError::InvalidBody(rejection.body_text())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared state for the chat endpoint.
#[derive(Clone)]
pub struct ChatAppState {
    pub orchestrator: Arc<FallbackOrchestrator>,
}

impl ChatAppState {
    pub fn new(orchestrator: Arc<FallbackOrchestrator>) -> Self {
        Self { orchestrator }
    }

    pub fn orchestrate_handler(&self) -> OrchestrateResponseHandler {
        OrchestrateResponseHandler::new(self.orchestrator.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// Answer a chat message.
///
/// POST /api/chat/orchestrator
pub async fn orchestrate(
    State(app_state): State<ChatAppState>,
    payload: Result<Json<OrchestrateRequest>, JsonRejection>,
) -> Result<Json<OrchestrateResponse>, ChatApiError> {
    let Json(request) = payload?;
    let cmd = request.into_command().ok_or(ChatApiError::MessageRequired)?;

    let result = app_state.orchestrate_handler().handle(cmd).await;

    Ok(Json(OrchestrateResponse::from(result)))
}
