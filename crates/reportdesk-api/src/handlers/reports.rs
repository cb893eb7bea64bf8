use crate::auth::TenantContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, Response, StatusCode},
    response::IntoResponse,
    Json,
};
use futures::StreamExt;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reportdesk_core::{
    AppError, CatalogPage, CatalogSettings, CatalogState, ReportCategory, ReportEntry,
    SortDirection, SortField,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

/// RFC 5987 `attr-char`: everything else is percent-encoded in `filename*`.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ReportListResponse {
    pub reports: Vec<ReportEntry>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// Case-insensitive substring of the report name
    pub q: Option<String>,
    /// `name` or `creationTime` (default)
    pub sort: Option<String>,
    /// `asc` or `desc` (default)
    pub direction: Option<String>,
    /// Zero-based page index
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    /// `daily` (default when categories are enabled), `monthly` or `all`
    pub category: Option<String>,
}

impl CatalogQuery {
    /// Build the catalog state for this query on top of the initial state.
    pub fn into_state(self, settings: &CatalogSettings) -> Result<CatalogState, AppError> {
        let mut state = CatalogState::initial(settings);

        if let Some(q) = self.q {
            state.query = q;
        }
        if let Some(sort) = self.sort {
            state.sort_field = sort.parse::<SortField>().map_err(AppError::BadRequest)?;
        }
        if let Some(direction) = self.direction {
            state.sort_direction = direction
                .parse::<SortDirection>()
                .map_err(AppError::BadRequest)?;
        }
        if let Some(page) = self.page {
            state.page_index = page;
        }
        if let Some(page_size) = self.page_size {
            state.page_size = page_size;
        }
        if let Some(category) = self.category {
            state.category = if category.eq_ignore_ascii_case("all") {
                None
            } else {
                Some(
                    category
                        .parse::<ReportCategory>()
                        .map_err(AppError::BadRequest)?,
                )
            };
        }

        state.validate(settings).map_err(AppError::BadRequest)?;
        Ok(state)
    }
}

fn content_disposition(name: &str) -> String {
    if name.is_ascii() {
        format!("attachment; filename=\"{}\"", name)
    } else {
        format!(
            "attachment; filename=\"{}\"; filename*=UTF-8''{}",
            name,
            utf8_percent_encode(name, ATTR_CHAR)
        )
    }
}

#[utoipa::path(
    get,
    path = "/api/v0/reports",
    tag = "reports",
    responses(
        (status = 200, description = "Reports visible to the caller's tenant", body = ReportListResponse),
        (status = 401, description = "No authenticated session", body = ErrorResponse),
        (status = 500, description = "Report storage unavailable", body = ErrorResponse),
        (status = 502, description = "Identity resolution failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state),
    fields(tenant = %tenant_ctx.tenant, operation = "list_reports")
)]
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    tenant_ctx: TenantContext,
) -> Result<impl IntoResponse, HttpAppError> {
    let reports = state.reports.list_reports(&tenant_ctx.tenant).await?;
    Ok(Json(ReportListResponse { reports }))
}

#[utoipa::path(
    get,
    path = "/api/v0/reports/download/{name}",
    tag = "reports",
    params(
        ("name" = String, Path, description = "Report file name, percent-encoded")
    ),
    responses(
        (status = 200, description = "Report file", content_type = "application/pdf"),
        (status = 400, description = "Malformed report name", body = ErrorResponse),
        (status = 403, description = "Report belongs to another tenant", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse),
        (status = 500, description = "Report storage unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, name),
    fields(tenant = %tenant_ctx.tenant, operation = "download_report")
)]
pub async fn download_report(
    State(state): State<Arc<AppState>>,
    tenant_ctx: TenantContext,
    name: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Path(name) = name?;

    let report = state
        .reports
        .download_report(&tenant_ctx.tenant, &name)
        .await?;

    // The file handle lives in the body stream and is dropped with it.
    let body_stream = report.stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Report stream error: {}", e)))
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, state.report_content_type.as_str())
        .header(header::CONTENT_DISPOSITION, content_disposition(&report.name))
        .header(header::CONTENT_LENGTH, report.size)
        .body(Body::from_stream(body_stream))
        .map_err(|e| AppError::InternalWithSource {
            message: "Failed to build download response".to_string(),
            source: anyhow::Error::from(e),
        })?;

    Ok(response)
}

#[utoipa::path(
    get,
    path = "/api/v0/reports/catalog",
    tag = "reports",
    params(CatalogQuery),
    responses(
        (status = 200, description = "One page of the caller's catalog", body = CatalogPage),
        (status = 400, description = "Unknown sort, direction, category or page size", body = ErrorResponse),
        (status = 401, description = "No authenticated session", body = ErrorResponse),
        (status = 500, description = "Report storage unavailable", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, query),
    fields(tenant = %tenant_ctx.tenant, operation = "report_catalog")
)]
pub async fn report_catalog(
    State(state): State<Arc<AppState>>,
    tenant_ctx: TenantContext,
    query: Result<Query<CatalogQuery>, QueryRejection>,
) -> Result<impl IntoResponse, HttpAppError> {
    let Query(query) = query?;
    let catalog_state = query.into_state(&state.catalog_settings)?;

    let reports = state.reports.list_reports(&tenant_ctx.tenant).await?;
    Ok(Json(catalog_state.apply(&reports)))
}
