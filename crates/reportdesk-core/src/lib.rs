//! Reportdesk Core Library
//!
//! This crate provides the domain models, error types, configuration, the tenant access
//! policy and the catalog view pipeline shared by the storage and API crates.

pub mod access;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use access::{is_authorized, visible_to, AccessPolicy, OwnerIndex};
pub use catalog::{
    paginate, CatalogPage, CatalogSettings, CatalogState, CatalogView, PageSizes, SortDirection,
    SortField,
};
pub use config::{Config, IdentityMode, LogFormat, OwnershipMode};
pub use error::{AppError, AppResult, ErrorMetadata, LogLevel};
pub use models::{check_report_name, ReportCategory, ReportEntry, TenantIdentity};
