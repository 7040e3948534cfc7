//! API layer - HTTP endpoint handlers.

mod health;
mod metrics;
mod root;

pub use health::{health, stats, HealthResponse, StatsResponse};
pub use metrics::prometheus_metrics;
pub use root::root;
