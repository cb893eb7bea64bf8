//! API constants

/// Versioned API prefix
pub const API_PREFIX: &str = "/api/v0";

/// Message returned for every download the tenant may not see, whether or not the file exists
pub const FORBIDDEN_REPORT_MESSAGE: &str = "You do not have permission to access this report";

pub const REPORT_NOT_FOUND_MESSAGE: &str = "File not found";
