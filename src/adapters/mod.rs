//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Language-model providers (OpenAI, Anthropic, mock) and the fallback orchestrator
//! - `health` - In-memory provider health monitor and clocks
//! - `http` - REST API (chat orchestrator and admin failover endpoints)

pub mod ai;
pub mod health;
pub mod http;
