mod usage;

pub use usage::{ProgramInfo, UsageReportRequest, UserInfo};
