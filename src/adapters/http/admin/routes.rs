//! Route definitions for the admin failover endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{get_status, reset, toggle_fallback, AdminAppState};

/// Create the admin router.
///
/// # Endpoints
///
/// - `GET /api/admin/ai-status` - Current failover status
/// - `POST /api/admin/ai-status/toggle-fallback` - Set or clear the manual override
/// - `POST /api/admin/ai-status/reset` - Clear failures and the override
pub fn admin_routes() -> Router<AdminAppState> {
    Router::new()
        .route("/api/admin/ai-status", get(get_status))
        .route("/api/admin/ai-status/toggle-fallback", post(toggle_fallback))
        .route("/api/admin/ai-status/reset", post(reset))
}

/// Admin router with its state attached.
pub fn admin_router(state: AdminAppState) -> Router {
    admin_routes().with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::adapters::health::InMemoryProviderHealthMonitor;
    use crate::domain::provider_health::{FailoverPolicy, ProviderSlot};
    use crate::ports::ProviderHealthMonitor;

    fn test_app() -> (Arc<InMemoryProviderHealthMonitor>, Router) {
        let monitor = Arc::new(InMemoryProviderHealthMonitor::new(
            "anthropic",
            "openai",
            FailoverPolicy::default(),
        ));
        let app = admin_router(AdminAppState::new(monitor.clone()));
        (monitor, app)
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn status_reports_initial_state() {
        let (_, app) = test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/admin/ai-status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["primaryProvider"], "anthropic");
        assert_eq!(json["fallbackProvider"], "openai");
        assert_eq!(json["useFallback"], false);
        assert_eq!(json["failureCount"], 0);
        assert_eq!(json["maxFailures"], 3);
        assert_eq!(json["cooldownPeriod"], 300_000);
        assert_eq!(json["timeSinceLastFailure"], Value::Null);
    }

    #[tokio::test]
    async fn toggle_fallback_forces_and_releases() {
        let (monitor, app) = test_app();

        let response = app
            .clone()
            .oneshot(post("/api/admin/ai-status/toggle-fallback", r#"{"force":true}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["useFallback"], true);
        assert!(monitor.snapshot().manual_override);

        let response = app
            .oneshot(post("/api/admin/ai-status/toggle-fallback", r#"{"force":false}"#))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["useFallback"], false);
    }

    #[tokio::test]
    async fn toggle_fallback_requires_force() {
        let (monitor, app) = test_app();

        let response = app
            .clone()
            .oneshot(post("/api/admin/ai-status/toggle-fallback", "{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error"], "force must be a boolean");

        let response = app
            .oneshot(post(
                "/api/admin/ai-status/toggle-fallback",
                r#"{"force":"yes"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!monitor.snapshot().manual_override);
    }

    #[tokio::test]
    async fn reset_clears_failures_and_override() {
        let (monitor, app) = test_app();
        monitor.force_fallback(true);
        for _ in 0..5 {
            monitor.record_failure(ProviderSlot::Primary);
        }

        let response = app
            .oneshot(post("/api/admin/ai-status/reset", ""))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["failureCount"], 0);
        assert_eq!(json["useFallback"], false);
        assert_eq!(json["timeSinceLastFailure"], Value::Null);
    }
}
