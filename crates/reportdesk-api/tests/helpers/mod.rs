//! Test helpers: build the real router around a temporary reports directory.
//!
//! Run from workspace root: `cargo test -p reportdesk-api`.

#![allow(dead_code)]

use axum_test::TestServer;
use reportdesk_api::constants;
use reportdesk_api::setup;
use reportdesk_core::Config;
use std::collections::HashMap;
use std::path::Path;
use tempfile::TempDir;

pub const TENANT_HEADER: &str = "x-tenant-id";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Test application: server and the reports directory it serves.
pub struct TestApp {
    pub server: TestServer,
    pub reports_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn write_report(&self, name: &str, contents: &[u8]) {
        std::fs::write(self.reports_dir.path().join(name), contents)
            .expect("Failed to write report fixture");
    }
}

/// Configuration for tests: header identity mode over `reports_dir`, plus overrides.
pub fn test_config(reports_dir: &Path, overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert(
        "REPORTS_DIRECTORY".to_string(),
        reports_dir.display().to_string(),
    );
    vars.insert("IDENTITY_MODE".to_string(), "header".to_string());
    vars.insert("IDENTITY_TENANT_HEADER".to_string(), TENANT_HEADER.to_string());
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).expect("Invalid test configuration")
}

/// The application router over `reports_dir`, for requests that bypass the test client.
pub async fn build_router(reports_dir: &Path, overrides: &[(&str, &str)]) -> axum::Router {
    let (_state, app) = setup::initialize_app(test_config(reports_dir, overrides))
        .await
        .expect("Failed to initialize app");
    app
}

/// Setup test app with header identity and an empty reports directory.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

pub async fn setup_test_app_with(overrides: &[(&str, &str)]) -> TestApp {
    let reports_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = test_config(reports_dir.path(), overrides);

    let (_state, app) = setup::initialize_app(config)
        .await
        .expect("Failed to initialize app");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        reports_dir,
    }
}
