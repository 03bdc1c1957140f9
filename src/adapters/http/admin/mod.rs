//! HTTP adapter for operator control over provider failover.
//!
//! - `GET /api/admin/ai-status` - Current failover status
//! - `POST /api/admin/ai-status/toggle-fallback` - Set or clear the manual override
//! - `POST /api/admin/ai-status/reset` - Clear failures and the override

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{AdminApiError, AdminAppState};
pub use routes::{admin_router, admin_routes};
