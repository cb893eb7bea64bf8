#[cfg(feature = "storage-local")]
use crate::LocalReportStore;
use crate::{ReportStore, StorageError, StorageResult};
use reportdesk_core::Config;
use std::sync::Arc;

/// Create the report store described by the configuration
pub fn create_report_store(config: &Config) -> StorageResult<Arc<dyn ReportStore>> {
    if config.reports_directory.trim().is_empty() {
        return Err(StorageError::ConfigError(
            "REPORTS_DIRECTORY not configured".to_string(),
        ));
    }

    #[cfg(feature = "storage-local")]
    {
        let store = LocalReportStore::new(&config.reports_directory, &config.report_extension);
        tracing::info!(
            path = %store.root().display(),
            extension = %config.report_extension,
            "Using local report store"
        );
        Ok(Arc::new(store))
    }

    #[cfg(not(feature = "storage-local"))]
    Err(StorageError::ConfigError(
        "Local report store not available (storage-local feature not enabled)".to_string(),
    ))
}
