//! Errors raised inside the orchestration pipeline.
//!
//! None of these reach the HTTP caller: `OrchestrateResponseHandler` logs
//! them and answers with the degraded result instead.

use thiserror::Error;

use crate::adapters::ai::FallbackError;
use crate::ports::ProviderError;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestrationError {
    /// Every provider the health state allowed was tried and failed.
    #[error("all providers failed (primary: {}, fallback: {fallback})", display_primary(.primary))]
    ProvidersExhausted {
        /// `None` when the primary was skipped because fallback was active.
        primary: Option<ProviderError>,
        fallback: ProviderError,
    },

    /// The request could not be turned into a provider call.
    #[error("invalid context: {0}")]
    InvalidContext(String),

    /// A panic was caught while assembling the response.
    #[error("orchestration panicked: {0}")]
    Panicked(String),
}

fn display_primary(primary: &Option<ProviderError>) -> String {
    primary
        .as_ref()
        .map_or_else(|| "skipped".to_string(), ProviderError::to_string)
}

impl From<FallbackError> for OrchestrationError {
    fn from(err: FallbackError) -> Self {
        match err {
            FallbackError::BothFailed { primary, fallback } => {
                OrchestrationError::ProvidersExhausted {
                    primary: Some(primary),
                    fallback,
                }
            }
            FallbackError::FallbackFailed(fallback) => OrchestrationError::ProvidersExhausted {
                primary: None,
                fallback,
            },
        }
    }
}
