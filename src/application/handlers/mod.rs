//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod assistant;

pub use assistant::{
    GetAIStatusHandler, GetAIStatusQuery, OrchestrateResponseCommand, OrchestrateResponseHandler,
    OrchestrationError, ResetFallbackCommand, ResetFallbackHandler, ToggleFallbackCommand,
    ToggleFallbackHandler,
};
