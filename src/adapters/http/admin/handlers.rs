//! HTTP handlers for the admin failover endpoints.
//!
//! No authentication is applied here; deployments are expected to keep the
//! `/api/admin` prefix off the public ingress.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use super::dto::{AIStatusResponse, ToggleFallbackRequest};
use crate::adapters::http::error::ErrorResponse;
use crate::application::{
    GetAIStatusHandler, GetAIStatusQuery, ResetFallbackCommand, ResetFallbackHandler,
    ToggleFallbackCommand, ToggleFallbackHandler,
};
use crate::ports::ProviderHealthMonitor;

// ════════════════════════════════════════════════════════════════════════════════
// Error Types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub enum AdminApiError {
    BadRequest(String),
}

impl IntoResponse for AdminApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AdminApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::bad_request(msg))).into_response()
            }
        }
    }
}

impl From<JsonRejection> for AdminApiError {
    fn from(_: JsonRejection) -> Self {
        AdminApiError::BadRequest(FORCE_REQUIRED.to_string())
    }
}

const FORCE_REQUIRED: &str = "force must be a boolean";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct AdminAppState {
    pub monitor: Arc<dyn ProviderHealthMonitor>,
}

impl AdminAppState {
    pub fn new(monitor: Arc<dyn ProviderHealthMonitor>) -> Self {
        Self { monitor }
    }

    pub fn get_status_handler(&self) -> GetAIStatusHandler {
        GetAIStatusHandler::new(self.monitor.clone())
    }

    pub fn toggle_fallback_handler(&self) -> ToggleFallbackHandler {
        ToggleFallbackHandler::new(self.monitor.clone())
    }

    pub fn reset_fallback_handler(&self) -> ResetFallbackHandler {
        ResetFallbackHandler::new(self.monitor.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// Get the current failover status
///
/// GET /api/admin/ai-status
pub async fn get_status(State(app_state): State<AdminAppState>) -> Json<AIStatusResponse> {
    let snapshot = app_state.get_status_handler().handle(GetAIStatusQuery);
    Json(snapshot.into())
}

/// Set or clear the manual fallback override
///
/// POST /api/admin/ai-status/toggle-fallback
pub async fn toggle_fallback(
    State(app_state): State<AdminAppState>,
    payload: Result<Json<ToggleFallbackRequest>, JsonRejection>,
) -> Result<Json<AIStatusResponse>, AdminApiError> {
    let Json(request) = payload?;
    let force = request
        .force
        .ok_or_else(|| AdminApiError::BadRequest(FORCE_REQUIRED.to_string()))?;

    let snapshot = app_state
        .toggle_fallback_handler()
        .handle(ToggleFallbackCommand { force });
    Ok(Json(snapshot.into()))
}

/// Clear failure history and the manual override
///
/// POST /api/admin/ai-status/reset
pub async fn reset(State(app_state): State<AdminAppState>) -> Json<AIStatusResponse> {
    let snapshot = app_state
        .reset_fallback_handler()
        .handle(ResetFallbackCommand);
    Json(snapshot.into())
}
