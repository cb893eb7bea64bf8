//! Application state.

use crate::auth::IdentityState;
use crate::services::ReportService;
use reportdesk_core::CatalogSettings;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub reports: ReportService,
    pub identity: Arc<IdentityState>,
    pub catalog_settings: CatalogSettings,
    /// Content-Type sent with every report download
    pub report_content_type: String,
}
