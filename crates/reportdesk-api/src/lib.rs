//! Reportdesk API Library
//!
//! This crate provides the HTTP handlers, identity resolution, middleware and application
//! setup for the report catalog service.

// Module declarations
mod api_doc;
pub mod constants;
mod handlers;
mod middleware;
pub mod services;
pub mod setup;
pub mod telemetry;

// Public modules
pub mod auth;
pub mod error;
pub mod landlock;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use services::ReportService;
