//! HTTP DTOs for the admin failover endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::provider_health::{HealthPhase, HealthSnapshot};

/// Request to set or clear the manual fallback override.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToggleFallbackRequest {
    #[serde(default)]
    pub force: Option<bool>,
}

/// Failover status as seen by operators.
///
/// `cooldownPeriod` and `timeSinceLastFailure` are milliseconds; the latter is
/// `null` until the primary has failed at least once since the last reset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AIStatusResponse {
    pub primary_provider: String,
    pub fallback_provider: String,
    pub use_fallback: bool,
    pub manual_override: bool,
    pub failure_count: u32,
    pub max_failures: u32,
    pub cooldown_period: u64,
    pub time_since_last_failure: Option<u64>,
    pub phase: HealthPhase,
}

impl From<HealthSnapshot> for AIStatusResponse {
    fn from(snapshot: HealthSnapshot) -> Self {
        Self {
            primary_provider: snapshot.primary_provider,
            fallback_provider: snapshot.fallback_provider,
            use_fallback: snapshot.use_fallback,
            manual_override: snapshot.manual_override,
            failure_count: snapshot.failure_count,
            max_failures: snapshot.max_failures,
            cooldown_period: snapshot.cooldown_period_ms,
            time_since_last_failure: snapshot.time_since_last_failure_ms,
            phase: snapshot.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_serializes_camel_case() {
        let snapshot = HealthSnapshot {
            primary_provider: "anthropic".to_string(),
            fallback_provider: "openai".to_string(),
            use_fallback: false,
            manual_override: false,
            failure_count: 0,
            max_failures: 3,
            cooldown_period_ms: 300_000,
            time_since_last_failure_ms: None,
            phase: HealthPhase::PrimaryActive,
        };

        let json = serde_json::to_value(AIStatusResponse::from(snapshot)).unwrap();

        assert_eq!(json["primaryProvider"], "anthropic");
        assert_eq!(json["fallbackProvider"], "openai");
        assert_eq!(json["useFallback"], false);
        assert_eq!(json["failureCount"], 0);
        assert_eq!(json["maxFailures"], 3);
        assert_eq!(json["cooldownPeriod"], 300_000);
        assert_eq!(json["timeSinceLastFailure"], serde_json::Value::Null);
    }

    #[test]
    fn toggle_request_force_is_optional() {
        let empty: ToggleFallbackRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.force, None);

        let on: ToggleFallbackRequest = serde_json::from_value(json!({ "force": true })).unwrap();
        assert_eq!(on.force, Some(true));
    }
}
