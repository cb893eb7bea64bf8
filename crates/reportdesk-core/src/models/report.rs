use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use utoipa::ToSchema;

/// One stored report file.
///
/// The name is the only key: it is shown to the user and it is what the access policy
/// inspects. No tenant id is stored alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReportEntry {
    pub name: String,
    /// Filesystem creation time (ISO-8601 on the wire)
    pub creation_time: DateTime<Utc>,
}

impl ReportEntry {
    pub fn new(name: impl Into<String>, creation_time: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            creation_time,
        }
    }

    pub fn category(&self) -> Option<ReportCategory> {
        ReportCategory::of(&self.name)
    }
}

/// Rejects names that could address anything other than a file directly in the reports root.
///
/// Returns the reason on failure. This runs before any authorization or filesystem access.
pub fn check_report_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("Report name must not be empty");
    }
    if name == "." || name == ".." {
        return Err("Report name must not be a relative path component");
    }
    if name.contains(|c: char| c == '/' || c == '\\') {
        return Err("Report name must not contain path separators");
    }
    if name.chars().any(|c| c.is_control() || c == '"') {
        return Err("Report name contains invalid characters");
    }
    Ok(())
}

/// Report category, encoded in the file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportCategory {
    Daily,
    Monthly,
}

impl ReportCategory {
    pub const ALL: [ReportCategory; 2] = [ReportCategory::Daily, ReportCategory::Monthly];

    /// Literal marker written into file names by the report generator.
    pub fn marker(self) -> &'static str {
        match self {
            ReportCategory::Daily => "[DAILY]",
            ReportCategory::Monthly => "[MONTHLY]",
        }
    }

    fn token(self) -> &'static str {
        match self {
            ReportCategory::Daily => "daily",
            ReportCategory::Monthly => "monthly",
        }
    }

    /// Classify a report name.
    ///
    /// Bracketed markers (`[DAILY]`, `[MONTHLY]`) win over bare `daily` / `monthly` name
    /// tokens. Among several candidates of the same kind the one appearing first in the
    /// name decides. Names carrying neither belong to no category.
    pub fn of(name: &str) -> Option<Self> {
        let bracketed = Self::ALL
            .into_iter()
            .filter_map(|category| name.find(category.marker()).map(|pos| (pos, category)))
            .min_by_key(|(pos, _)| *pos);
        if let Some((_, category)) = bracketed {
            return Some(category);
        }

        name.split(|c: char| !c.is_alphanumeric())
            .find_map(|token| {
                Self::ALL
                    .into_iter()
                    .find(|category| token.eq_ignore_ascii_case(category.token()))
            })
    }
}

impl FromStr for ReportCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" => Ok(ReportCategory::Daily),
            "monthly" => Ok(ReportCategory::Monthly),
            other => Err(format!("Invalid report category: {}", other)),
        }
    }
}

impl Display for ReportCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.token())
    }
}
