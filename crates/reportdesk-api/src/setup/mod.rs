//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::auth::{create_identity_resolver, IdentityResolver, IdentityState};
use crate::services::reports::{Ownership, ReportService};
use crate::state::AppState;
use anyhow::{Context, Result};
use reportdesk_core::Config;
use reportdesk_storage::{create_report_store, ReportStore};
use std::sync::Arc;

/// Initialize the entire application from configuration
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    let store = create_report_store(&config).context("Failed to create report store")?;
    let resolver = create_identity_resolver(&config).context("Failed to create identity resolver")?;

    initialize_with(config, store, resolver)
}

/// Assemble state and routes around the given collaborators
pub fn initialize_with(
    config: Config,
    store: Arc<dyn ReportStore>,
    resolver: Arc<dyn IdentityResolver>,
) -> Result<(Arc<AppState>, axum::Router)> {
    let state = Arc::new(AppState {
        reports: ReportService::new(store, Ownership::from_config(&config)),
        identity: Arc::new(IdentityState {
            resolver,
            timeout: config.identity_timeout(),
        }),
        catalog_settings: config.catalog_settings(),
        report_content_type: config.report_content_type.clone(),
    });

    tracing::info!(
        reports_directory = %config.reports_directory,
        ownership_mode = %config.ownership_mode,
        identity_mode = %config.identity_mode,
        "Application initialized"
    );

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
