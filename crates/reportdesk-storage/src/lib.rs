//! Reportdesk Storage Library
//!
//! This crate provides the report store abstraction and its filesystem implementation.
//!
//! # Layout
//!
//! Reports live in one flat directory. A report is addressed by its bare file name: names
//! must not be empty, `.` or `..`, and must not contain path separators, control characters
//! or double quotes. Sub-directories and symlinks in the root are never served.
//!
//! The optional owner index is a JSON object (`{ "<file name>": "<tenant id>" }`) stored next
//! to the reports.

pub mod factory;
#[cfg(feature = "storage-local")]
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_report_store;
#[cfg(feature = "storage-local")]
pub use local::LocalReportStore;
pub use traits::{ReportFile, ReportStore, ReportStream, StorageError, StorageResult};
