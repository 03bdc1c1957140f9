//! Assistant Command and Query Handlers
//!
//! ## Commands
//! - `OrchestrateResponse` - Answer a chat message through the fallback pair
//! - `ToggleFallback` - Set or clear the manual fallback override
//! - `ResetFallback` - Clear failure history and the override
//!
//! ## Queries
//! - `GetAIStatus` - Current failover status

mod ai_status;
mod errors;
mod orchestrate_response;

pub use ai_status::{
    GetAIStatusHandler, GetAIStatusQuery, ResetFallbackCommand, ResetFallbackHandler,
    ToggleFallbackCommand, ToggleFallbackHandler,
};
pub use errors::OrchestrationError;
pub use orchestrate_response::{OrchestrateResponseCommand, OrchestrateResponseHandler};
