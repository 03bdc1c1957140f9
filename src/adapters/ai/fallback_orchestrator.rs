//! Fallback Orchestrator - Routes provider calls through the shared health state.
//!
//! Every provider capability goes through [`FallbackOrchestrator::call_with_fallback`]:
//!
//! 1. Ask the health monitor which phase the pair is in.
//! 2. `FallbackActive`: call the fallback provider only.
//! 3. `PrimaryActive` / `Probe`: call the primary. Success is recorded (which
//!    closes the circuit after a probe). Any error is recorded as a failure
//!    and the same operation is retried once on the fallback.
//! 4. A fallback error is returned to the caller; nothing is retried further.
//!
//! A panic inside a provider call counts as that provider failing. The
//! monitor lock is never held across a provider call.
//!
//! # Example
//!
//! ```ignore
//! let orchestrator = FallbackOrchestrator::new(primary, fallback, monitor);
//! let outcome = orchestrator
//!     .call_with_fallback(|provider| async move {
//!         provider.determine_category("How do I start a budget?").await
//!     })
//!     .await?;
//! ```

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{debug, error, warn};

use crate::domain::assistant::Message;
use crate::domain::provider_health::{HealthPhase, ProviderSlot};
use crate::ports::{AIProvider, ProviderError, ProviderHealthMonitor, Sentiment};

/// Value produced by whichever provider served the call.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderOutcome<T> {
    /// The operation's result.
    pub value: T,
    /// Which slot served it.
    pub provider: ProviderSlot,
    /// Name reported by the serving provider.
    pub provider_name: String,
}

impl<T> ProviderOutcome<T> {
    /// Returns true if the fallback provider served the call.
    pub fn served_by_fallback(&self) -> bool {
        self.provider == ProviderSlot::Fallback
    }
}

/// Failure after every permitted attempt was made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FallbackError {
    /// The primary was tried and failed, then the fallback failed too.
    #[error("primary provider failed ({primary}); fallback provider failed ({fallback})")]
    BothFailed {
        primary: ProviderError,
        fallback: ProviderError,
    },

    /// The circuit was open, so only the fallback was tried.
    #[error("fallback provider failed: {0}")]
    FallbackFailed(ProviderError),
}

impl FallbackError {
    /// The error reported by the fallback provider.
    pub fn fallback_error(&self) -> &ProviderError {
        match self {
            FallbackError::BothFailed { fallback, .. } => fallback,
            FallbackError::FallbackFailed(err) => err,
        }
    }
}

/// Primary/fallback provider pair bound to a shared health monitor.
pub struct FallbackOrchestrator {
    primary: Arc<dyn AIProvider>,
    fallback: Arc<dyn AIProvider>,
    monitor: Arc<dyn ProviderHealthMonitor>,
}

impl FallbackOrchestrator {
    /// Creates a new orchestrator.
    pub fn new(
        primary: Arc<dyn AIProvider>,
        fallback: Arc<dyn AIProvider>,
        monitor: Arc<dyn ProviderHealthMonitor>,
    ) -> Self {
        Self {
            primary,
            fallback,
            monitor,
        }
    }

    /// The health monitor shared with the admin endpoints.
    pub fn monitor(&self) -> &Arc<dyn ProviderHealthMonitor> {
        &self.monitor
    }

    /// Runs `op` against the provider the current phase selects, falling
    /// back once on primary failure.
    pub async fn call_with_fallback<T, F, Fut>(
        &self,
        op: F,
    ) -> Result<ProviderOutcome<T>, FallbackError>
    where
        F: Fn(Arc<dyn AIProvider>) -> Fut,
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        let phase = self.monitor.phase();

        let primary_error = if phase.attempts_primary() {
            if phase == HealthPhase::Probe {
                debug!(
                    provider = %self.primary.provider_info().name,
                    "Cooldown elapsed, probing primary provider"
                );
            }

            match self.attempt(ProviderSlot::Primary, op(self.primary.clone())).await {
                Ok(value) => {
                    self.monitor.record_success(ProviderSlot::Primary);
                    return Ok(self.outcome(value, ProviderSlot::Primary));
                }
                Err(err) => {
                    warn!(
                        provider = %self.primary.provider_info().name,
                        fallback = %self.fallback.provider_info().name,
                        error = %err,
                        "Primary provider failed, trying fallback"
                    );
                    self.monitor.record_failure(ProviderSlot::Primary);
                    Some(err)
                }
            }
        } else {
            None
        };

        match self.attempt(ProviderSlot::Fallback, op(self.fallback.clone())).await {
            Ok(value) => {
                self.monitor.record_success(ProviderSlot::Fallback);
                Ok(self.outcome(value, ProviderSlot::Fallback))
            }
            Err(fallback) => {
                self.monitor.record_failure(ProviderSlot::Fallback);
                error!(
                    provider = %self.fallback.provider_info().name,
                    error = %fallback,
                    primary_attempted = primary_error.is_some(),
                    "Fallback provider failed"
                );
                Err(match primary_error {
                    Some(primary) => FallbackError::BothFailed { primary, fallback },
                    None => FallbackError::FallbackFailed(fallback),
                })
            }
        }
    }

    /// Generates a reply through the fallback path.
    pub async fn generate_response(
        &self,
        message: &str,
        system_prompt: &str,
        history: &[Message],
    ) -> Result<ProviderOutcome<String>, FallbackError> {
        self.call_with_fallback(|provider| async move {
            provider
                .generate_response(message, system_prompt, history)
                .await
        })
        .await
    }

    /// Classifies emotional tone through the fallback path.
    pub async fn analyze_emotion(
        &self,
        text: &str,
    ) -> Result<ProviderOutcome<Sentiment>, FallbackError> {
        self.call_with_fallback(|provider| async move { provider.analyze_emotion(text).await })
            .await
    }

    /// Picks a topical category through the fallback path.
    pub async fn determine_category(
        &self,
        text: &str,
    ) -> Result<ProviderOutcome<String>, FallbackError> {
        self.call_with_fallback(|provider| async move { provider.determine_category(text).await })
            .await
    }

    /// Awaits one provider call, turning a panic into `Unavailable`.
    async fn attempt<T, Fut>(&self, slot: ProviderSlot, call: Fut) -> Result<T, ProviderError>
    where
        Fut: Future<Output = Result<T, ProviderError>>,
    {
        match AssertUnwindSafe(call).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                error!(
                    provider = %self.provider(slot).provider_info().name,
                    %slot,
                    panic = %message,
                    "Provider call panicked"
                );
                Err(ProviderError::unavailable(format!(
                    "provider panicked: {message}"
                )))
            }
        }
    }

    fn provider(&self, slot: ProviderSlot) -> &Arc<dyn AIProvider> {
        match slot {
            ProviderSlot::Primary => &self.primary,
            ProviderSlot::Fallback => &self.fallback,
        }
    }

    fn outcome<T>(&self, value: T, slot: ProviderSlot) -> ProviderOutcome<T> {
        ProviderOutcome {
            value,
            provider: slot,
            provider_name: self.provider(slot).provider_info().name,
        }
    }
}

/// Text of a panic payload.
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
