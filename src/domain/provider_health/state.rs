//! Provider failover state machine.
//!
//! The state stores only raw facts (failure count, last failure, override flag).
//! Everything routing depends on is derived from those facts at the moment of
//! the request:
//!
//! ```text
//! PrimaryActive  --[failure_count reaches max_failures]--> FallbackActive
//! FallbackActive --[cooldown elapsed, no override]-------> Probe
//! Probe          --[primary success]---------------------> PrimaryActive
//! Probe          --[primary failure]---------------------> FallbackActive
//! any            --[force_fallback(true)]----------------> FallbackActive
//! any            --[reset]-------------------------------> PrimaryActive
//! ```
//!
//! There is no timer: `Probe` is reached purely by comparing the current time
//! against `last_failure_at + cooldown`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Default number of primary failures before routing switches to the fallback.
pub const DEFAULT_MAX_FAILURES: u32 = 3;

/// Default cooldown before the primary provider is probed again (5 minutes).
pub const DEFAULT_COOLDOWN_PERIOD_MS: u64 = 300_000;

/// Identifies which configured provider an outcome belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderSlot {
    Primary,
    Fallback,
}

impl std::fmt::Display for ProviderSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderSlot::Primary => write!(f, "primary"),
            ProviderSlot::Fallback => write!(f, "fallback"),
        }
    }
}

/// Logical routing state, derived from [`ProviderHealthState`] on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthPhase {
    /// Requests go to the primary provider.
    PrimaryActive,
    /// Requests go straight to the fallback provider.
    FallbackActive,
    /// Cooldown elapsed; the next request may retry the primary provider.
    Probe,
}

impl HealthPhase {
    /// Whether a request in this phase should attempt the primary provider.
    pub fn attempts_primary(&self) -> bool {
        matches!(self, HealthPhase::PrimaryActive | HealthPhase::Probe)
    }
}

/// Failure thresholds for the failover state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FailoverPolicy {
    /// Primary failures that switch routing to the fallback provider.
    pub max_failures: u32,
    /// Time after the last failure before the primary is probed again.
    pub cooldown_period_ms: u64,
}

impl Default for FailoverPolicy {
    fn default() -> Self {
        Self {
            max_failures: DEFAULT_MAX_FAILURES,
            cooldown_period_ms: DEFAULT_COOLDOWN_PERIOD_MS,
        }
    }
}

/// Process-wide provider health facts.
///
/// `use_fallback` is intentionally absent: it is always computed from
/// `manual_override` and `failure_count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderHealthState {
    primary_provider_id: String,
    fallback_provider_id: String,
    policy: FailoverPolicy,
    failure_count: u32,
    last_failure_at: Option<Timestamp>,
    manual_override: bool,
}

impl ProviderHealthState {
    /// Creates a resting state (primary active, no failures).
    pub fn new(
        primary_provider_id: impl Into<String>,
        fallback_provider_id: impl Into<String>,
        policy: FailoverPolicy,
    ) -> Self {
        Self {
            primary_provider_id: primary_provider_id.into(),
            fallback_provider_id: fallback_provider_id.into(),
            policy,
            failure_count: 0,
            last_failure_at: None,
            manual_override: false,
        }
    }

    pub fn primary_provider_id(&self) -> &str {
        &self.primary_provider_id
    }

    pub fn fallback_provider_id(&self) -> &str {
        &self.fallback_provider_id
    }

    pub fn policy(&self) -> FailoverPolicy {
        self.policy
    }

    pub fn failure_count(&self) -> u32 {
        self.failure_count
    }

    pub fn last_failure_at(&self) -> Option<Timestamp> {
        self.last_failure_at
    }

    pub fn manual_override(&self) -> bool {
        self.manual_override
    }

    /// `manual_override || failure_count >= max_failures`.
    pub fn use_fallback(&self) -> bool {
        self.manual_override || self.failure_count >= self.policy.max_failures
    }

    /// Milliseconds since the last recorded primary failure, if any.
    pub fn time_since_last_failure(&self, now: Timestamp) -> Option<u64> {
        self.last_failure_at.map(|at| now.millis_since(&at))
    }

    /// Computes the routing phase at `now`.
    pub fn phase(&self, now: Timestamp) -> HealthPhase {
        if !self.use_fallback() {
            return HealthPhase::PrimaryActive;
        }
        if self.manual_override {
            return HealthPhase::FallbackActive;
        }
        match self.time_since_last_failure(now) {
            Some(elapsed) if elapsed < self.policy.cooldown_period_ms => {
                HealthPhase::FallbackActive
            }
            // A threshold breach with no recorded failure time can only come
            // from a zero threshold; treat it as immediately probeable.
            _ => HealthPhase::Probe,
        }
    }

    /// Records a successful call. Returns true if the call closed a probe.
    ///
    /// Only a primary success observed in `Probe` clears the failure history;
    /// fallback successes are not tracked.
    pub fn record_success(&mut self, provider: ProviderSlot, now: Timestamp) -> bool {
        if provider != ProviderSlot::Primary || self.phase(now) != HealthPhase::Probe {
            return false;
        }
        self.failure_count = 0;
        self.last_failure_at = None;
        true
    }

    /// Records a failed call. Returns true if this failure switched routing to
    /// the fallback provider.
    pub fn record_failure(&mut self, provider: ProviderSlot, now: Timestamp) -> bool {
        if provider != ProviderSlot::Primary {
            return false;
        }
        let was_using_fallback = self.use_fallback();
        self.failure_count = self.failure_count.saturating_add(1);
        self.last_failure_at = Some(now);
        !was_using_fallback && self.use_fallback()
    }

    /// Pins (or unpins) routing to the fallback provider.
    pub fn force_fallback(&mut self, on: bool) {
        self.manual_override = on;
    }

    /// Returns to the resting state regardless of history.
    pub fn reset(&mut self) {
        self.failure_count = 0;
        self.manual_override = false;
        self.last_failure_at = None;
    }

    /// Read-only projection for status reporting.
    pub fn snapshot(&self, now: Timestamp) -> HealthSnapshot {
        HealthSnapshot {
            primary_provider: self.primary_provider_id.clone(),
            fallback_provider: self.fallback_provider_id.clone(),
            use_fallback: self.use_fallback(),
            manual_override: self.manual_override,
            failure_count: self.failure_count,
            max_failures: self.policy.max_failures,
            cooldown_period_ms: self.policy.cooldown_period_ms,
            time_since_last_failure_ms: self.time_since_last_failure(now),
            phase: self.phase(now),
        }
    }
}

/// Point-in-time view of provider health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthSnapshot {
    pub primary_provider: String,
    pub fallback_provider: String,
    pub use_fallback: bool,
    pub manual_override: bool,
    pub failure_count: u32,
    pub max_failures: u32,
    pub cooldown_period_ms: u64,
    pub time_since_last_failure_ms: Option<u64>,
    pub phase: HealthPhase,
}

impl HealthSnapshot {
    /// True when there is nothing for an operator to reset.
    pub fn is_at_rest(&self) -> bool {
        self.failure_count == 0 && !self.use_fallback
    }
}
