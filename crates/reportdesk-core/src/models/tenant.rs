use std::fmt::{Display, Formatter, Result as FmtResult};

/// Tenant identifier resolved for a single request.
///
/// Lives only for the duration of the request that resolved it; it is never persisted
/// or cached across requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantIdentity(String);

impl TenantIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        TenantIdentity(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// An empty or whitespace-only identifier, which must never be granted access.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Display for TenantIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}
