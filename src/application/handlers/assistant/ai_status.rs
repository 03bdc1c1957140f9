//! Admin handlers over the shared provider health monitor.
//!
//! Each handler returns the snapshot taken after its action, so the caller
//! always sees the state its request produced.

use std::sync::Arc;

use crate::domain::provider_health::HealthSnapshot;
use crate::ports::ProviderHealthMonitor;

/// Query for the current failover status.
#[derive(Debug, Clone, Copy, Default)]
pub struct GetAIStatusQuery;

/// Command to set or clear the manual fallback override.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleFallbackCommand {
    pub force: bool,
}

/// Command to clear failures and the manual override.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResetFallbackCommand;

pub struct GetAIStatusHandler {
    monitor: Arc<dyn ProviderHealthMonitor>,
}

impl GetAIStatusHandler {
    pub fn new(monitor: Arc<dyn ProviderHealthMonitor>) -> Self {
        Self { monitor }
    }

    pub fn handle(&self, _query: GetAIStatusQuery) -> HealthSnapshot {
        self.monitor.snapshot()
    }
}

pub struct ToggleFallbackHandler {
    monitor: Arc<dyn ProviderHealthMonitor>,
}

impl ToggleFallbackHandler {
    pub fn new(monitor: Arc<dyn ProviderHealthMonitor>) -> Self {
        Self { monitor }
    }

    pub fn handle(&self, cmd: ToggleFallbackCommand) -> HealthSnapshot {
        self.monitor.force_fallback(cmd.force);
        self.monitor.snapshot()
    }
}

pub struct ResetFallbackHandler {
    monitor: Arc<dyn ProviderHealthMonitor>,
}

impl ResetFallbackHandler {
    pub fn new(monitor: Arc<dyn ProviderHealthMonitor>) -> Self {
        Self { monitor }
    }

    pub fn handle(&self, _cmd: ResetFallbackCommand) -> HealthSnapshot {
        self.monitor.reset();
        self.monitor.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::health::InMemoryProviderHealthMonitor;
    use crate::domain::provider_health::{FailoverPolicy, ProviderSlot};

    fn monitor() -> Arc<dyn ProviderHealthMonitor> {
        Arc::new(InMemoryProviderHealthMonitor::new(
            "anthropic",
            "openai",
            FailoverPolicy::default(),
        ))
    }

    #[test]
    fn status_reports_snapshot() {
        let monitor = monitor();
        monitor.record_failure(ProviderSlot::Primary);

        let status = GetAIStatusHandler::new(monitor).handle(GetAIStatusQuery);

        assert_eq!(status.failure_count, 1);
        assert!(!status.use_fallback);
        assert_eq!(status.primary_provider, "anthropic");
    }

    #[test]
    fn toggle_sets_and_clears_override() {
        let monitor = monitor();
        let handler = ToggleFallbackHandler::new(monitor.clone());

        let on = handler.handle(ToggleFallbackCommand { force: true });
        assert!(on.use_fallback);
        assert!(on.manual_override);

        let off = handler.handle(ToggleFallbackCommand { force: false });
        assert!(!off.use_fallback);
        assert!(!off.manual_override);
    }

    #[test]
    fn clearing_override_keeps_threshold_driven_fallback() {
        let monitor = monitor();
        for _ in 0..3 {
            monitor.record_failure(ProviderSlot::Primary);
        }

        let status = ToggleFallbackHandler::new(monitor).handle(ToggleFallbackCommand { force: false });

        assert!(status.use_fallback);
        assert!(!status.manual_override);
    }

    #[test]
    fn reset_always_returns_rest_state() {
        let monitor = monitor();
        monitor.force_fallback(true);
        for _ in 0..4 {
            monitor.record_failure(ProviderSlot::Primary);
        }

        let status = ResetFallbackHandler::new(monitor).handle(ResetFallbackCommand);

        assert_eq!(status.failure_count, 0);
        assert!(!status.use_fallback);
        assert!(status.is_at_rest());
    }
}
