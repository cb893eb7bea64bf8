pub mod report;
pub mod tenant;

pub use report::{check_report_name, ReportCategory, ReportEntry};
pub use tenant::TenantIdentity;
