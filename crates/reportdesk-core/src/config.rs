//! Configuration module
//!
//! Settings are read from the process environment (after loading an optional `.env` file)
//! and validated once at startup.

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use std::time::Duration;

use crate::catalog::{CatalogSettings, PageSizes, DEFAULT_PAGE_SIZE};

const SERVER_PORT: u16 = 4000;
const REPORTS_DIRECTORY: &str = "/mnt/reports";
const REPORT_EXTENSION: &str = ".pdf";
const REPORT_CONTENT_TYPE: &str = "application/pdf";
const OWNERSHIP_INDEX_FILE: &str = ".report-owners.json";
const IDENTITY_UPSTREAM_URL: &str = "http://localhost:9200";
const IDENTITY_TENANT_FIELD: &str = "user_requested_tenant";
const IDENTITY_TENANT_HEADER: &str = "x-tenant-id";
const IDENTITY_TIMEOUT_MS: u64 = 5000;
const HTTP_CONCURRENCY_LIMIT: usize = 1024;

/// How the caller's tenant is resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityMode {
    /// Ask the security plugin's `authinfo` endpoint, forwarding the caller's credentials
    AuthInfo,
    /// Trust a header injected by an authenticating reverse proxy
    Header,
}

impl FromStr for IdentityMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "authinfo" => Ok(IdentityMode::AuthInfo),
            "header" => Ok(IdentityMode::Header),
            _ => Err(anyhow::anyhow!("Invalid identity mode: {}", s)),
        }
    }
}

impl Display for IdentityMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            IdentityMode::AuthInfo => write!(f, "authinfo"),
            IdentityMode::Header => write!(f, "header"),
        }
    }
}

/// How report ownership is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnershipMode {
    /// Tenant identifier contained in the file name
    Filename,
    /// Sidecar owner index in the reports directory
    Index,
}

impl FromStr for OwnershipMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "filename" => Ok(OwnershipMode::Filename),
            "index" => Ok(OwnershipMode::Index),
            _ => Err(anyhow::anyhow!("Invalid ownership mode: {}", s)),
        }
    }
}

impl Display for OwnershipMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            OwnershipMode::Filename => write!(f, "filename"),
            OwnershipMode::Index => write!(f, "index"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            _ => Err(anyhow::anyhow!("Invalid log format: {}", s)),
        }
    }
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    pub http_concurrency_limit: usize,
    pub log_format: LogFormat,
    // Report storage
    pub reports_directory: String,
    pub report_extension: String,
    pub report_content_type: String,
    pub ownership_mode: OwnershipMode,
    pub ownership_index_file: String,
    // Catalog view
    pub page_size_options: Vec<usize>,
    pub default_page_size: usize,
    pub categories_enabled: bool,
    pub reset_page_on_filter_change: bool,
    // Identity resolution
    pub identity_mode: IdentityMode,
    pub identity_upstream_url: String,
    pub identity_tenant_field: String,
    pub identity_tenant_header: String,
    pub identity_timeout_ms: u64,
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    value
        .map(|v| v.trim().to_lowercase())
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(var: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = var("ENVIRONMENT")
            .or_else(|| var("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let page_size_options = match var("PAGE_SIZE_OPTIONS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(|s| {
                    s.parse::<usize>().map_err(|_| {
                        anyhow::anyhow!("PAGE_SIZE_OPTIONS contains an invalid number: {}", s)
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            None => crate::catalog::DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
        };

        let mut report_extension = var("REPORT_EXTENSION")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| REPORT_EXTENSION.to_string());
        if !report_extension.is_empty() && !report_extension.starts_with('.') {
            report_extension.insert(0, '.');
        }

        let config = Config {
            server_port: var("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            http_concurrency_limit: var("HTTP_CONCURRENCY_LIMIT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT)
                .max(1),
            log_format: var("LOG_FORMAT")
                .map(|s| s.parse::<LogFormat>())
                .transpose()?
                .unwrap_or_default(),
            reports_directory: var("REPORTS_DIRECTORY")
                .unwrap_or_else(|| REPORTS_DIRECTORY.to_string()),
            report_extension,
            report_content_type: var("REPORT_CONTENT_TYPE")
                .unwrap_or_else(|| REPORT_CONTENT_TYPE.to_string()),
            ownership_mode: var("OWNERSHIP_MODE")
                .map(|s| s.parse::<OwnershipMode>())
                .transpose()?
                .unwrap_or(OwnershipMode::Filename),
            ownership_index_file: var("OWNERSHIP_INDEX_FILE")
                .unwrap_or_else(|| OWNERSHIP_INDEX_FILE.to_string()),
            page_size_options,
            default_page_size: var("DEFAULT_PAGE_SIZE")
                .map(|s| {
                    s.trim()
                        .parse::<usize>()
                        .map_err(|_| anyhow::anyhow!("DEFAULT_PAGE_SIZE must be a valid number"))
                })
                .transpose()?
                .unwrap_or(DEFAULT_PAGE_SIZE),
            categories_enabled: parse_bool(var("CATALOG_CATEGORIES_ENABLED"), true),
            reset_page_on_filter_change: parse_bool(
                var("CATALOG_RESET_PAGE_ON_FILTER_CHANGE"),
                false,
            ),
            identity_mode: var("IDENTITY_MODE")
                .map(|s| s.parse::<IdentityMode>())
                .transpose()?
                .unwrap_or(IdentityMode::AuthInfo),
            identity_upstream_url: var("IDENTITY_UPSTREAM_URL")
                .unwrap_or_else(|| IDENTITY_UPSTREAM_URL.to_string()),
            identity_tenant_field: var("IDENTITY_TENANT_FIELD")
                .unwrap_or_else(|| IDENTITY_TENANT_FIELD.to_string()),
            identity_tenant_header: var("IDENTITY_TENANT_HEADER")
                .unwrap_or_else(|| IDENTITY_TENANT_HEADER.to_string())
                .to_lowercase(),
            identity_timeout_ms: var("IDENTITY_TIMEOUT_MS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(IDENTITY_TIMEOUT_MS),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.reports_directory.trim().is_empty() {
            return Err(anyhow::anyhow!("REPORTS_DIRECTORY must not be empty"));
        }

        let is_separator = |c: char| c == '/' || c == '\\';
        if self.report_extension.len() < 2
            || self.report_extension[1..].contains(|c: char| c == '.' || is_separator(c))
        {
            return Err(anyhow::anyhow!(
                "REPORT_EXTENSION must be a single extension such as '.pdf'"
            ));
        }

        if self.report_content_type.trim().is_empty() {
            return Err(anyhow::anyhow!("REPORT_CONTENT_TYPE must not be empty"));
        }

        if self.ownership_index_file.is_empty()
            || self.ownership_index_file.contains(is_separator)
        {
            return Err(anyhow::anyhow!(
                "OWNERSHIP_INDEX_FILE must be a plain file name inside REPORTS_DIRECTORY"
            ));
        }

        let page_sizes = PageSizes::new(self.page_size_options.clone())
            .map_err(|e| anyhow::anyhow!("PAGE_SIZE_OPTIONS: {}", e))?;
        if !page_sizes.contains(self.default_page_size) {
            return Err(anyhow::anyhow!(
                "DEFAULT_PAGE_SIZE {} must be one of PAGE_SIZE_OPTIONS {:?}",
                self.default_page_size,
                page_sizes.as_slice()
            ));
        }

        if self.identity_timeout_ms == 0 {
            return Err(anyhow::anyhow!("IDENTITY_TIMEOUT_MS must be greater than 0"));
        }

        match self.identity_mode {
            IdentityMode::AuthInfo => {
                if !self.identity_upstream_url.starts_with("http://")
                    && !self.identity_upstream_url.starts_with("https://")
                {
                    return Err(anyhow::anyhow!(
                        "IDENTITY_UPSTREAM_URL must be an http(s) URL when IDENTITY_MODE=authinfo"
                    ));
                }
                if self.identity_tenant_field.trim().is_empty() {
                    return Err(anyhow::anyhow!("IDENTITY_TENANT_FIELD must not be empty"));
                }
            }
            IdentityMode::Header => {
                let valid = !self.identity_tenant_header.is_empty()
                    && self
                        .identity_tenant_header
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
                if !valid {
                    return Err(anyhow::anyhow!(
                        "IDENTITY_TENANT_HEADER must be a valid header name"
                    ));
                }
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn identity_timeout(&self) -> Duration {
        Duration::from_millis(self.identity_timeout_ms)
    }

    pub fn catalog_settings(&self) -> CatalogSettings {
        CatalogSettings {
            // Already checked by validate()
            page_sizes: PageSizes::new(self.page_size_options.clone()).unwrap_or_default(),
            default_page_size: self.default_page_size,
            categories_enabled: self.categories_enabled,
            reset_page_on_filter_change: self.reset_page_on_filter_change,
        }
    }
}
