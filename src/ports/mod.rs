//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Language-model capability (`generate_response`, `analyze_emotion`, `determine_category`)
//! - `ProviderHealthMonitor` - Shared failover state for the primary/fallback pair
//! - `Clock` - Current time, injectable for cooldown tests

mod ai_provider;
mod clock;
mod provider_health;

pub use ai_provider::{AIProvider, ProviderError, ProviderInfo, Sentiment};
pub use clock::Clock;
pub use provider_health::ProviderHealthMonitor;
