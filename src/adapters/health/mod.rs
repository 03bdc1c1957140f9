//! Provider Health Adapters.
//!
//! - `InMemoryProviderHealthMonitor` - Process-wide, mutex-guarded failover state
//! - `SystemClock` / `ManualClock` - Clock port implementations

mod clock;
mod in_memory_monitor;

pub use clock::{ManualClock, SystemClock};
pub use in_memory_monitor::InMemoryProviderHealthMonitor;
