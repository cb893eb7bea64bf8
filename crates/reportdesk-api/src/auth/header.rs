use super::IdentityResolver;
use axum::http::{HeaderMap, HeaderName};
use reportdesk_core::{AppError, TenantIdentity};

/// Reads the tenant from a header set by an authenticating reverse proxy.
#[derive(Debug, Clone)]
pub struct HeaderResolver {
    header: HeaderName,
}

impl HeaderResolver {
    pub fn new(header: &str) -> Result<Self, anyhow::Error> {
        let header = HeaderName::from_bytes(header.as_bytes())
            .map_err(|e| anyhow::anyhow!("Invalid tenant header name '{}': {}", header, e))?;
        Ok(Self { header })
    }
}

#[async_trait::async_trait]
impl IdentityResolver for HeaderResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Result<TenantIdentity, AppError> {
        let value = headers
            .get(&self.header)
            .ok_or_else(|| AppError::Unauthorized(format!("Missing {} header", self.header)))?;
        let value = value.to_str().map_err(|_| {
            AppError::Unauthorized(format!("{} header is not valid UTF-8", self.header))
        })?;
        Ok(TenantIdentity::new(value.trim()))
    }
}
