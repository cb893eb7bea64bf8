use axum::http::HeaderMap;
use reportdesk_core::{AppError, Config, IdentityMode, TenantIdentity};
use std::sync::Arc;

/// Resolves the caller's tenant from the incoming request headers.
///
/// Implementations return `Unauthorized` when the caller has no usable session and
/// `IdentityResolution` when the identity source itself fails.
#[async_trait::async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn resolve(&self, headers: &HeaderMap) -> Result<TenantIdentity, AppError>;
}

/// Create the resolver selected by `IDENTITY_MODE`
pub fn create_identity_resolver(
    config: &Config,
) -> Result<Arc<dyn IdentityResolver>, anyhow::Error> {
    match config.identity_mode {
        #[cfg(feature = "identity-authinfo")]
        IdentityMode::AuthInfo => {
            let resolver = super::AuthInfoResolver::new(
                &config.identity_upstream_url,
                &config.identity_tenant_field,
                config.identity_timeout(),
            )?;
            tracing::info!(
                upstream = %config.identity_upstream_url,
                tenant_field = %config.identity_tenant_field,
                "Resolving tenants through authinfo"
            );
            Ok(Arc::new(resolver))
        }

        #[cfg(not(feature = "identity-authinfo"))]
        IdentityMode::AuthInfo => Err(anyhow::anyhow!(
            "authinfo identity mode not available (identity-authinfo feature not enabled)"
        )),

        IdentityMode::Header => {
            let resolver = super::HeaderResolver::new(&config.identity_tenant_header)?;
            tracing::warn!(
                header = %config.identity_tenant_header,
                "Trusting tenant header; the service must only be reachable through the authenticating proxy"
            );
            Ok(Arc::new(resolver))
        }
    }
}
