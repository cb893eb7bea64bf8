pub mod health;
pub mod reports;

use crate::constants::API_PREFIX;
use crate::error::HttpAppError;
use axum::http::Uri;
use reportdesk_core::AppError;

/// Fallback for paths no route matches.
///
/// A download path spanning several segments (`download/../../etc/passwd`) is a malformed
/// report name rather than an unknown route.
pub async fn route_not_found(uri: Uri) -> HttpAppError {
    let download_prefix = format!("{}/reports/download/", API_PREFIX);
    if uri.path().starts_with(&download_prefix) {
        return HttpAppError(AppError::BadRequest(
            "Report name must not contain path separators".to_string(),
        ));
    }
    HttpAppError(AppError::NotFound(format!("No route for {}", uri.path())))
}
