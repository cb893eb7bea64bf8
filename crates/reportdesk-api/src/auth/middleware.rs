use crate::auth::models::TenantContext;
use crate::auth::IdentityResolver;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use reportdesk_core::AppError;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct IdentityState {
    pub resolver: Arc<dyn IdentityResolver>,
    pub timeout: Duration,
}

/// Resolve the caller's tenant and store it in the request extensions.
///
/// The resolver call is bounded by `timeout`; a slow identity source fails the request
/// with an identity resolution error instead of holding it open.
pub async fn identity_middleware(
    State(identity): State<Arc<IdentityState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let resolved =
        tokio::time::timeout(identity.timeout, identity.resolver.resolve(request.headers())).await;

    let tenant = match resolved {
        Ok(Ok(tenant)) => tenant,
        Ok(Err(err)) => return HttpAppError(err).into_response(),
        Err(_) => {
            return HttpAppError(AppError::IdentityResolution(format!(
                "identity resolution timed out after {}ms",
                identity.timeout.as_millis()
            )))
            .into_response()
        }
    };

    tracing::debug!(tenant = %tenant, "Tenant resolved");

    request.extensions_mut().insert(TenantContext { tenant });
    next.run(request).await
}
