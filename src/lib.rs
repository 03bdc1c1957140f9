//! Life-Skills Assistant - AI response orchestration
//!
//! Turns a user message plus page context into a contextual assistant reply.
//! Requests go to a primary language-model provider and switch to a fallback
//! provider while the primary is failing; the endpoint never surfaces a
//! provider failure to the caller.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
