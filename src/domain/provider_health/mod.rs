//! Provider Health Domain Module
//!
//! Circuit-breaker-like bookkeeping for the primary/fallback provider pair.
//! The state here is pure: callers pass the current time in, and the
//! shared, mutex-guarded instance lives behind the `ProviderHealthMonitor` port.

pub mod state;

pub use state::*;
