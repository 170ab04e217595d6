//! HTTP route handlers.

mod health;
mod runs;

pub use health::{HealthResponse, health_routes};
pub use runs::{RunRequest, cron_run_handler, start_run_handler};
