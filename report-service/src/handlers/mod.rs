mod health;
mod reports;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use reports::generate_usage_report;
