//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use reportdesk_core::{CatalogPage, ReportCategory, ReportEntry, SortDirection, SortField};

/// Returns the OpenAPI document served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Reportdesk API",
        version = "0.1.0",
        description = "Tenant-scoped catalog and download service for generated report files. The caller's tenant is resolved from the upstream authentication context on every request; a tenant only ever sees and downloads its own reports."
    ),
    paths(
        handlers::reports::list_reports,
        handlers::reports::download_report,
        handlers::reports::report_catalog,
    ),
    components(schemas(
        ReportEntry,
        ReportCategory,
        SortField,
        SortDirection,
        CatalogPage,
        handlers::reports::ReportListResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "reports", description = "Report catalog and downloads")
    )
)]
struct ApiDoc;
