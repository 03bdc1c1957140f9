//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects)
//! - `assistant` - Message understanding: intent, interests, style, prompts, results
//! - `provider_health` - Failover state machine for the language-model providers

pub mod assistant;
pub mod foundation;
pub mod provider_health;
