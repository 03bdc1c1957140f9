//! Foundation module - Shared domain primitives.
//!
//! Contains value objects that form the shared vocabulary of the
//! assistant domain.

mod timestamp;

pub use timestamp::Timestamp;
