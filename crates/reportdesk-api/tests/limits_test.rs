//! Request bounds: the global concurrency limit and the identity resolution timeout.
//!
//! Run with: `cargo test -p reportdesk-api --test limits_test`

mod helpers;

use axum::http::HeaderMap;
use axum_test::TestServer;
use helpers::{api_path, test_config};
use reportdesk_api::auth::IdentityResolver;
use reportdesk_api::setup;
use reportdesk_core::{AppError, TenantIdentity};
use reportdesk_storage::LocalReportStore;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Resolves every caller to `alpha` after a fixed delay.
struct SlowResolver {
    delay: Duration,
}

#[async_trait::async_trait]
impl IdentityResolver for SlowResolver {
    async fn resolve(&self, _headers: &HeaderMap) -> Result<TenantIdentity, AppError> {
        tokio::time::sleep(self.delay).await;
        Ok(TenantIdentity::new("alpha"))
    }
}

fn slow_server(reports_dir: &TempDir, delay: Duration, overrides: &[(&str, &str)]) -> TestServer {
    let config = test_config(reports_dir.path(), overrides);
    let store = Arc::new(LocalReportStore::new(
        reports_dir.path(),
        config.report_extension.clone(),
    ));
    let (_state, app) = setup::initialize_with(config, store, Arc::new(SlowResolver { delay }))
        .expect("Failed to initialize app");
    TestServer::new(app.into_make_service()).expect("Failed to create test server")
}

#[tokio::test]
async fn test_identity_resolution_timeout_is_bad_gateway() {
    let reports_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let server = slow_server(
        &reports_dir,
        Duration::from_secs(2),
        &[("IDENTITY_TIMEOUT_MS", "100")],
    );

    let started = Instant::now();
    let response = server.get(&api_path("/reports")).await;

    assert_eq!(response.status_code(), 502);
    assert!(started.elapsed() < Duration::from_secs(1));
    let body: Value = response.json();
    assert_eq!(body["code"], "IDENTITY_RESOLUTION_ERROR");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_concurrency_limit_is_shared_across_routes() {
    let reports_dir = tempfile::tempdir().expect("Failed to create temp directory");
    std::fs::write(
        reports_dir.path().join("alpha_daily_20240101.pdf"),
        b"%PDF alpha",
    )
    .unwrap();
    let server = slow_server(
        &reports_dir,
        Duration::from_millis(1500),
        &[("HTTP_CONCURRENCY_LIMIT", "1")],
    );

    // The listing holds the only slot while its tenant resolves
    let holder = async { server.get(&api_path("/reports")).await };
    let waiter = async {
        tokio::time::sleep(Duration::from_millis(200)).await;
        tokio::time::timeout(Duration::from_millis(500), async {
            server.get("/health/live").await
        })
        .await
    };
    let (held, waited) = tokio::join!(holder, waiter);

    assert_eq!(held.status_code(), 200);
    assert!(
        waited.is_err(),
        "liveness answered while the only slot was held"
    );

    let response = server.get("/health/live").await;
    assert_eq!(response.status_code(), 200);
}
