//! HTTP handlers for planet-service.

pub mod docs;
pub mod health;
pub mod planet;
pub mod system;

pub use docs::api_docs;
pub use health::{health_check, liveness, metrics_endpoint, readiness};
pub use planet::lookup_planet;
pub use system::host_info;
