//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port, plus the orchestrator that puts a
//! primary/fallback pair behind the shared health monitor.
//!
//! ## Available Adapters
//!
//! - `FallbackOrchestrator` - Routes every capability through `call_with_fallback`
//! - `AnthropicProvider` - Anthropic Messages API
//! - `OpenAIProvider` - OpenAI chat completions API
//! - `MockAIProvider` - Configurable mock for testing

mod anthropic_provider;
mod classification;
mod fallback_orchestrator;
mod mock_provider;
mod openai_provider;

pub use anthropic_provider::{AnthropicConfig, AnthropicProvider};
pub use fallback_orchestrator::{FallbackError, FallbackOrchestrator, ProviderOutcome};
pub(crate) use fallback_orchestrator::panic_message;
pub use mock_provider::{MockAIProvider, MockCall, MockError, MockResponse};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
