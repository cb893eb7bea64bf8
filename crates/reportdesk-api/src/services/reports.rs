//! Report listing and download.
//!
//! Both operations derive their access decision from one `AccessPolicy`, built fresh for
//! every call, so the catalog a tenant sees and the files it may download cannot diverge.

use crate::constants::FORBIDDEN_REPORT_MESSAGE;
use crate::error::app_error_from_storage;
use reportdesk_core::{
    check_report_name, AccessPolicy, AppError, AppResult, Config, OwnershipMode, ReportEntry,
    TenantIdentity,
};
use reportdesk_storage::{ReportFile, ReportStore};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ownership {
    /// Tenant id contained in the file name
    Filename,
    /// Owner index stored in the named file
    Index(String),
}

impl Ownership {
    pub fn from_config(config: &Config) -> Self {
        match config.ownership_mode {
            OwnershipMode::Filename => Ownership::Filename,
            OwnershipMode::Index => Ownership::Index(config.ownership_index_file.clone()),
        }
    }
}

#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn ReportStore>,
    ownership: Ownership,
}

impl ReportService {
    pub fn new(store: Arc<dyn ReportStore>, ownership: Ownership) -> Self {
        Self { store, ownership }
    }

    pub fn store(&self) -> &Arc<dyn ReportStore> {
        &self.store
    }

    async fn policy(&self) -> AppResult<AccessPolicy> {
        match &self.ownership {
            Ownership::Filename => Ok(AccessPolicy::FilenameContainsTenant),
            Ownership::Index(file_name) => self
                .store
                .load_owner_index(file_name)
                .await
                .map(AccessPolicy::Owners)
                .map_err(app_error_from_storage),
        }
    }

    /// Every report visible to `tenant`, in store order.
    pub async fn list_reports(&self, tenant: &TenantIdentity) -> AppResult<Vec<ReportEntry>> {
        let entries = self
            .store
            .list_all()
            .await
            .map_err(app_error_from_storage)?;
        let total = entries.len();

        let visible = self.policy().await?.visible_to(tenant, entries);

        tracing::info!(
            tenant = %tenant,
            total = total,
            count = visible.len(),
            "Reports listed"
        );

        Ok(visible)
    }

    /// Open one report for `tenant`.
    ///
    /// Checks run in a fixed order: name shape (400), authorization (403), then existence
    /// (404). An unauthorized caller learns nothing about whether the file exists.
    pub async fn download_report(
        &self,
        tenant: &TenantIdentity,
        name: &str,
    ) -> AppResult<ReportFile> {
        check_report_name(name).map_err(|reason| AppError::BadRequest(reason.to_string()))?;

        if !self.policy().await?.is_authorized(tenant, name) {
            tracing::warn!(tenant = %tenant, report = %name, "Report download denied");
            return Err(AppError::Forbidden(FORBIDDEN_REPORT_MESSAGE.to_string()));
        }

        let report = self
            .store
            .open(name)
            .await
            .map_err(app_error_from_storage)?;

        tracing::info!(
            tenant = %tenant,
            report = %name,
            size_bytes = report.size,
            "Report download started"
        );

        Ok(report)
    }
}
