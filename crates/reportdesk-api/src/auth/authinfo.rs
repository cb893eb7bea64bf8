//! Identity resolution through the security plugin's `authinfo` endpoint.

use super::IdentityResolver;
use axum::http::{header, HeaderMap, StatusCode};
use reportdesk_core::{AppError, TenantIdentity};
use std::time::Duration;

const AUTHINFO_PATH: &str = "/_plugins/_security/authinfo";

/// Asks the upstream security plugin who the caller is, forwarding the caller's credentials.
#[derive(Debug, Clone)]
pub struct AuthInfoResolver {
    client: reqwest::Client,
    url: String,
    tenant_field: String,
}

impl AuthInfoResolver {
    pub fn new(
        upstream_url: &str,
        tenant_field: &str,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build identity HTTP client: {}", e))?;

        Ok(Self {
            client,
            url: format!("{}{}", upstream_url.trim_end_matches('/'), AUTHINFO_PATH),
            tenant_field: tenant_field.to_string(),
        })
    }
}

#[async_trait::async_trait]
impl IdentityResolver for AuthInfoResolver {
    async fn resolve(&self, headers: &HeaderMap) -> Result<TenantIdentity, AppError> {
        let mut request = self.client.get(&self.url);
        for name in [header::AUTHORIZATION, header::COOKIE] {
            if let Some(value) = headers.get(&name) {
                request = request.header(name, value.clone());
            }
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AppError::IdentityResolution("authinfo request timed out".to_string())
            } else {
                AppError::IdentityResolution(format!("authinfo request failed: {}", e))
            }
        })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::Unauthorized(
                "No authenticated session".to_string(),
            ));
        }
        if !status.is_success() {
            return Err(AppError::IdentityResolution(format!(
                "authinfo returned {}",
                status
            )));
        }

        let body: serde_json::Value = response.json().await.map_err(|e| {
            AppError::IdentityResolution(format!("authinfo returned an invalid body: {}", e))
        })?;

        let tenant = body
            .get(&self.tenant_field)
            .and_then(|value| value.as_str())
            .ok_or_else(|| {
                AppError::IdentityResolution(format!(
                    "authinfo response has no string field '{}'",
                    self.tenant_field
                ))
            })?;

        tracing::debug!(tenant = %tenant, "Resolved tenant from authinfo");

        Ok(TenantIdentity::new(tenant))
    }
}
