//! ProviderHealthMonitor port - shared failover state for the provider pair.
//!
//! One instance exists per process and is handed to both the fallback
//! orchestrator (which records outcomes) and the admin handlers (which force
//! or reset fallback). There is no ambient global; callers hold an
//! `Arc<dyn ProviderHealthMonitor>`.
//!
//! ## States
//!
//! - **PrimaryActive**: requests use the primary provider
//! - **FallbackActive**: requests skip the primary provider
//! - **Probe**: cooldown elapsed; requests may retry the primary provider
//!
//! The phase is recomputed from the current time on every call; nothing runs
//! in the background.

use crate::domain::provider_health::{HealthPhase, HealthSnapshot, ProviderSlot};

/// Port for provider health tracking.
///
/// Implementations must make `record_failure` atomic with respect to
/// concurrent callers so that simultaneous failures are all counted.
pub trait ProviderHealthMonitor: Send + Sync {
    /// Current routing phase.
    fn phase(&self) -> HealthPhase;

    /// Record a successful call to `provider`.
    ///
    /// A primary success observed while probing clears the failure count.
    fn record_success(&self, provider: ProviderSlot);

    /// Record a failed call to `provider`.
    ///
    /// Only primary failures are counted.
    fn record_failure(&self, provider: ProviderSlot);

    /// Pin routing to the fallback provider (or release the pin). Idempotent.
    fn force_fallback(&self, on: bool);

    /// Clear failures and the manual override.
    fn reset(&self);

    /// Read-only projection for status reporting.
    fn snapshot(&self) -> HealthSnapshot;
}
