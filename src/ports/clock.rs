//! Clock port - source of the current time.
//!
//! Cooldown expiry is computed against this clock, which lets tests step time
//! forward without sleeping.

use crate::domain::foundation::Timestamp;

/// Port for reading the current time.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> Timestamp;
}
