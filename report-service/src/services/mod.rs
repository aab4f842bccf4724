pub mod metrics;
pub mod report;

pub use metrics::{get_metrics, init_metrics};
pub use report::ReportService;
