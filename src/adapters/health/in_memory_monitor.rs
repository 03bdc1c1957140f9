//! In-memory provider health monitor.
//!
//! This adapter provides the process-wide implementation of the
//! `ProviderHealthMonitor` port. State lives for the lifetime of the process
//! and is only cleared by `reset` or by a successful probe.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::domain::provider_health::{
    FailoverPolicy, HealthPhase, HealthSnapshot, ProviderHealthState, ProviderSlot,
};
use crate::ports::{Clock, ProviderHealthMonitor};

use super::clock::SystemClock;

/// Mutex-guarded implementation of the ProviderHealthMonitor port.
///
/// Every read-modify-write (failure counting, probe recovery, admin actions)
/// happens under one lock, so concurrent failures are never under-counted.
/// Provider calls are never made while the lock is held.
///
/// # Example
///
/// ```ignore
/// let monitor = Arc::new(InMemoryProviderHealthMonitor::new(
///     "anthropic",
///     "openai",
///     FailoverPolicy::default(),
/// ));
///
/// monitor.record_failure(ProviderSlot::Primary);
/// assert_eq!(monitor.snapshot().failure_count, 1);
/// ```
pub struct InMemoryProviderHealthMonitor {
    state: Mutex<ProviderHealthState>,
    clock: Arc<dyn Clock>,
}

impl InMemoryProviderHealthMonitor {
    /// Creates a monitor at rest, using the system clock.
    pub fn new(
        primary_provider_id: impl Into<String>,
        fallback_provider_id: impl Into<String>,
        policy: FailoverPolicy,
    ) -> Self {
        Self::with_clock(
            primary_provider_id,
            fallback_provider_id,
            policy,
            Arc::new(SystemClock),
        )
    }

    /// Creates a monitor at rest with an explicit clock.
    pub fn with_clock(
        primary_provider_id: impl Into<String>,
        fallback_provider_id: impl Into<String>,
        policy: FailoverPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state: Mutex::new(ProviderHealthState::new(
                primary_provider_id,
                fallback_provider_id,
                policy,
            )),
            clock,
        }
    }

    /// A poisoned lock still holds consistent state: every mutation is a
    /// handful of field writes that cannot panic midway.
    fn state(&self) -> MutexGuard<'_, ProviderHealthState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ProviderHealthMonitor for InMemoryProviderHealthMonitor {
    fn phase(&self) -> HealthPhase {
        let now = self.clock.now();
        self.state().phase(now)
    }

    fn record_success(&self, provider: ProviderSlot) {
        let now = self.clock.now();
        let mut state = self.state();
        if state.record_success(provider, now) {
            info!(
                provider = %state.primary_provider_id(),
                "Primary provider recovered after probe, failure count cleared"
            );
        }
    }

    fn record_failure(&self, provider: ProviderSlot) {
        let now = self.clock.now();
        let mut state = self.state();
        let switched = state.record_failure(provider, now);
        if switched {
            warn!(
                provider = %state.primary_provider_id(),
                fallback = %state.fallback_provider_id(),
                failure_count = state.failure_count(),
                "Primary provider failure threshold reached, routing to fallback"
            );
        } else if provider == ProviderSlot::Primary {
            debug!(
                provider = %state.primary_provider_id(),
                failure_count = state.failure_count(),
                max_failures = state.policy().max_failures,
                "Primary provider failure recorded"
            );
        }
    }

    fn force_fallback(&self, on: bool) {
        let mut state = self.state();
        if state.manual_override() != on {
            info!(force = on, "Manual fallback override changed");
        }
        state.force_fallback(on);
    }

    fn reset(&self) {
        let mut state = self.state();
        info!(
            previous_failures = state.failure_count(),
            manual_override = state.manual_override(),
            "Fallback system reset"
        );
        state.reset();
    }

    fn snapshot(&self) -> HealthSnapshot {
        let now = self.clock.now();
        self.state().snapshot(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::health::ManualClock;

    fn monitor() -> (InMemoryProviderHealthMonitor, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at_unix_millis(1_700_000_000_000));
        let monitor = InMemoryProviderHealthMonitor::with_clock(
            "anthropic",
            "openai",
            FailoverPolicy {
                max_failures: 3,
                cooldown_period_ms: 30_000,
            },
            clock.clone(),
        );
        (monitor, clock)
    }

    #[test]
    fn snapshot_reflects_configuration() {
        let (monitor, _) = monitor();
        let snapshot = monitor.snapshot();

        assert_eq!(snapshot.primary_provider, "anthropic");
        assert_eq!(snapshot.fallback_provider, "openai");
        assert_eq!(snapshot.max_failures, 3);
        assert_eq!(snapshot.cooldown_period_ms, 30_000);
        assert_eq!(snapshot.time_since_last_failure_ms, None);
        assert!(snapshot.is_at_rest());
    }

    #[test]
    fn time_since_last_failure_tracks_clock() {
        let (monitor, clock) = monitor();
        monitor.record_failure(ProviderSlot::Primary);
        clock.advance_millis(1_250);

        assert_eq!(monitor.snapshot().time_since_last_failure_ms, Some(1_250));
    }

    #[test]
    fn cooldown_is_evaluated_lazily() {
        let (monitor, clock) = monitor();
        for _ in 0..3 {
            monitor.record_failure(ProviderSlot::Primary);
        }
        assert_eq!(monitor.phase(), HealthPhase::FallbackActive);

        clock.advance_millis(30_000);
        assert_eq!(monitor.phase(), HealthPhase::Probe);

        monitor.record_success(ProviderSlot::Primary);
        assert_eq!(monitor.phase(), HealthPhase::PrimaryActive);
        assert_eq!(monitor.snapshot().failure_count, 0);
    }

    #[test]
    fn force_fallback_twice_matches_once() {
        let (monitor, _) = monitor();
        monitor.force_fallback(true);
        let once = monitor.snapshot();
        monitor.force_fallback(true);

        assert_eq!(monitor.snapshot(), once);
        assert!(once.use_fallback);
        assert!(once.manual_override);
    }

    #[test]
    fn reset_returns_to_rest() {
        let (monitor, _) = monitor();
        monitor.force_fallback(true);
        for _ in 0..5 {
            monitor.record_failure(ProviderSlot::Primary);
        }

        monitor.reset();
        let snapshot = monitor.snapshot();

        assert_eq!(snapshot.failure_count, 0);
        assert!(!snapshot.use_fallback);
        assert_eq!(snapshot.time_since_last_failure_ms, None);
        assert_eq!(snapshot.phase, HealthPhase::PrimaryActive);
    }

    #[test]
    fn concurrent_failures_are_all_counted() {
        let (monitor, _) = monitor();
        let monitor = Arc::new(monitor);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let monitor = monitor.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        monitor.record_failure(ProviderSlot::Primary);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(monitor.snapshot().failure_count, 200);
    }
}
