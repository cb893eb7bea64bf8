//! Tenant access policy
//!
//! Listing and download authorization go through the same predicate. There is no per-file
//! ACL: by default a tenant owns every report whose name contains the tenant identifier
//! (case-insensitive). That convention lets a tenant whose identifier is a substring of
//! another tenant's name (`al` vs `alpha_daily.pdf`) see the other tenant's reports, so an
//! owner index checked by equality is offered as the stricter alternative.

use crate::models::{ReportEntry, TenantIdentity};
use std::collections::HashMap;

/// Returns true iff the lowercase report name contains the lowercase tenant identifier.
///
/// A blank identifier never matches.
pub fn is_authorized(tenant: &TenantIdentity, name: &str) -> bool {
    if tenant.is_blank() {
        return false;
    }
    name.to_lowercase()
        .contains(&tenant.as_str().to_lowercase())
}

/// The subsequence of `entries` visible to `tenant`, in input order.
pub fn visible_to(tenant: &TenantIdentity, entries: Vec<ReportEntry>) -> Vec<ReportEntry> {
    AccessPolicy::FilenameContainsTenant.visible_to(tenant, entries)
}

/// Explicit report ownership: report name -> owning tenant id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnerIndex {
    owners: HashMap<String, String>,
}

impl OwnerIndex {
    pub fn new(owners: HashMap<String, String>) -> Self {
        Self { owners }
    }

    pub fn owner_of(&self, name: &str) -> Option<&str> {
        self.owners.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.owners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }
}

impl FromIterator<(String, String)> for OwnerIndex {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            owners: iter.into_iter().collect(),
        }
    }
}

/// The single authorization predicate applied to both listings and downloads.
#[derive(Debug, Clone)]
pub enum AccessPolicy {
    /// Tenant identifier must appear in the file name (case-insensitive).
    FilenameContainsTenant,
    /// Tenant identifier must equal the indexed owner (case-insensitive).
    /// Reports missing from the index are visible to nobody.
    Owners(OwnerIndex),
}

impl AccessPolicy {
    pub fn is_authorized(&self, tenant: &TenantIdentity, name: &str) -> bool {
        match self {
            AccessPolicy::FilenameContainsTenant => is_authorized(tenant, name),
            AccessPolicy::Owners(index) => {
                if tenant.is_blank() {
                    return false;
                }
                index
                    .owner_of(name)
                    .map(|owner| owner.to_lowercase() == tenant.as_str().to_lowercase())
                    .unwrap_or(false)
            }
        }
    }

    pub fn visible_to(&self, tenant: &TenantIdentity, entries: Vec<ReportEntry>) -> Vec<ReportEntry> {
        entries
            .into_iter()
            .filter(|entry| self.is_authorized(tenant, &entry.name))
            .collect()
    }
}
