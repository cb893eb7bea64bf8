//! Report catalog and download integration tests.
//!
//! Run with: `cargo test -p reportdesk-api --test reports_test`

mod helpers;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
};
use helpers::{api_path, build_router, setup_test_app, setup_test_app_with, TENANT_HEADER};
use serde_json::Value;
use tower::ServiceExt;

fn names(body: &Value, key: &str) -> Vec<String> {
    body[key]
        .as_array()
        .expect("array of reports")
        .iter()
        .map(|entry| entry["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_list_reports_only_returns_tenant_reports() {
    let app = setup_test_app().await;
    app.write_report("alpha_daily_20240101.pdf", b"%PDF alpha");
    app.write_report("beta_daily_20240101.pdf", b"%PDF beta");
    app.write_report("alpha_notes.txt", b"not a report");

    let response = app
        .client()
        .get(&api_path("/reports"))
        .add_header(TENANT_HEADER, "alpha")
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(names(&body, "reports"), vec!["alpha_daily_20240101.pdf"]);
    assert!(body["reports"][0]["creationTime"].is_string());
}

#[tokio::test]
async fn test_list_reports_tenant_is_case_insensitive() {
    let app = setup_test_app().await;
    app.write_report("Alpha_daily_20240101.pdf", b"%PDF");

    let response = app
        .client()
        .get(&api_path("/reports"))
        .add_header(TENANT_HEADER, "ALPHA")
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(names(&body, "reports"), vec!["Alpha_daily_20240101.pdf"]);
}

#[tokio::test]
async fn test_list_reports_blank_tenant_sees_nothing() {
    let app = setup_test_app().await;
    app.write_report("alpha_daily_20240101.pdf", b"%PDF");

    let response = app
        .client()
        .get(&api_path("/reports"))
        .add_header(TENANT_HEADER, " ")
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert!(names(&body, "reports").is_empty());
}

#[tokio::test]
async fn test_list_reports_requires_identity() {
    let app = setup_test_app().await;

    let response = app.client().get(&api_path("/reports")).await;

    assert_eq!(response.status_code(), 401);
    let body: Value = response.json();
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_list_reports_unreadable_directory_is_storage_error() {
    let app = setup_test_app_with(&[("REPORTS_DIRECTORY", "/nonexistent/reportdesk-test")]).await;

    let response = app
        .client()
        .get(&api_path("/reports"))
        .add_header(TENANT_HEADER, "alpha")
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "STORAGE_ERROR");
    // Sensitive: no filesystem details leak
    assert!(body.get("details").is_none());
    assert!(!body["error"].as_str().unwrap().contains("/nonexistent"));
}

#[tokio::test]
async fn test_download_report_streams_file() {
    let app = setup_test_app().await;
    let contents = b"%PDF-1.4 alpha daily report";
    app.write_report("alpha_daily_20240101.pdf", contents);

    let response = app
        .client()
        .get(&api_path("/reports/download/alpha_daily_20240101.pdf"))
        .add_header(TENANT_HEADER, "alpha")
        .await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-type"), "application/pdf");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"alpha_daily_20240101.pdf\""
    );
    assert_eq!(
        response.header("content-length"),
        contents.len().to_string().as_str()
    );
    assert_eq!(response.header("x-content-type-options"), "nosniff");
    assert_eq!(response.header("cache-control"), "no-store, private");
    assert_eq!(response.as_bytes().as_ref(), contents);
}

#[tokio::test]
async fn test_download_percent_encoded_name() {
    let app = setup_test_app().await;
    app.write_report("alpha [DAILY] été.pdf", b"%PDF");

    let response = app
        .client()
        .get(&api_path("/reports/download/alpha%20%5BDAILY%5D%20%C3%A9t%C3%A9.pdf"))
        .add_header(TENANT_HEADER, "alpha")
        .await;

    assert_eq!(response.status_code(), 200);
    let disposition = response.header("content-disposition");
    let disposition = String::from_utf8_lossy(disposition.as_bytes());
    assert!(disposition.contains("filename*=UTF-8''alpha%20%5BDAILY%5D%20%C3%A9t%C3%A9.pdf"));
}

#[tokio::test]
async fn test_download_other_tenant_report_is_forbidden() {
    let app = setup_test_app().await;
    app.write_report("beta_daily_20240101.pdf", b"%PDF beta");

    let response = app
        .client()
        .get(&api_path("/reports/download/beta_daily_20240101.pdf"))
        .add_header(TENANT_HEADER, "alpha")
        .await;

    assert_eq!(response.status_code(), 403);
    let body: Value = response.json();
    assert_eq!(body["error"], "You do not have permission to access this report");
}

#[tokio::test]
async fn test_forbidden_takes_precedence_over_not_found() {
    let app = setup_test_app().await;
    app.write_report("beta_daily_20240101.pdf", b"%PDF beta");

    let existing = app
        .client()
        .get(&api_path("/reports/download/beta_daily_20240101.pdf"))
        .add_header(TENANT_HEADER, "alpha")
        .await;
    let missing = app
        .client()
        .get(&api_path("/reports/download/beta_daily_20991231.pdf"))
        .add_header(TENANT_HEADER, "alpha")
        .await;

    assert_eq!(existing.status_code(), 403);
    assert_eq!(missing.status_code(), 403);
    let existing: Value = existing.json();
    let missing: Value = missing.json();
    assert_eq!(existing["error"], missing["error"]);
}

#[tokio::test]
async fn test_download_missing_report_is_not_found() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get(&api_path("/reports/download/alpha_daily_20240101.pdf"))
        .add_header(TENANT_HEADER, "alpha")
        .await;

    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["error"], "File not found");
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_download_non_report_file_is_not_found() {
    let app = setup_test_app().await;
    app.write_report("alpha_notes.txt", b"not a report");

    let response = app
        .client()
        .get(&api_path("/reports/download/alpha_notes.txt"))
        .add_header(TENANT_HEADER, "alpha")
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_download_path_traversal_is_bad_request() {
    let app = setup_test_app().await;

    for path in [
        "/reports/download/..%2F..%2Fetc%2Fpasswd",
        "/reports/download/alpha%2F..%2F..%2Fetc%2Fpasswd.pdf",
        "/reports/download/..%5Calpha.pdf",
        "/reports/download/alpha%00.pdf",
    ] {
        let response = app
            .client()
            .get(&api_path(path))
            .add_header(TENANT_HEADER, "alpha")
            .await;

        assert_eq!(response.status_code(), 400, "path {}", path);
        let body: Value = response.json();
        assert_eq!(body["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_download_unencoded_traversal_is_bad_request() {
    // Sent through the router directly: URL builders normalize `..` segments away.
    let reports_dir = tempfile::tempdir().expect("Failed to create temp directory");
    std::fs::write(reports_dir.path().join("beta_daily_20240101.pdf"), b"%PDF beta").unwrap();
    let router = build_router(reports_dir.path(), &[]).await;

    for path in [
        "/reports/download/../../etc/passwd",
        "/reports/download/alpha/../beta_daily_20240101.pdf",
    ] {
        let request = Request::builder()
            .uri(api_path(path))
            .header(TENANT_HEADER, "alpha")
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "path {}", path);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get(&api_path("/unknown"))
        .add_header(TENANT_HEADER, "alpha")
        .await;

    assert_eq!(response.status_code(), 404);
    let body: Value = response.json();
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_download_requires_identity() {
    let app = setup_test_app().await;
    app.write_report("alpha_daily_20240101.pdf", b"%PDF");

    let response = app
        .client()
        .get(&api_path("/reports/download/alpha_daily_20240101.pdf"))
        .await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_catalog_monthly_round_trip() {
    let app = setup_test_app().await;
    app.write_report("alpha_daily_20240101.pdf", b"%PDF");
    app.write_report("alpha_monthly_20240601.pdf", b"%PDF");
    app.write_report("beta_monthly_20240601.pdf", b"%PDF");

    let monthly = app
        .client()
        .get(&api_path("/reports/catalog?category=monthly"))
        .add_header(TENANT_HEADER, "alpha")
        .await;
    assert_eq!(monthly.status_code(), 200);
    let monthly: Value = monthly.json();
    assert_eq!(names(&monthly, "items"), vec!["alpha_monthly_20240601.pdf"]);
    assert_eq!(monthly["category"], "monthly");

    // Default tab is daily
    let daily = app
        .client()
        .get(&api_path("/reports/catalog"))
        .add_header(TENANT_HEADER, "alpha")
        .await;
    let daily: Value = daily.json();
    assert_eq!(names(&daily, "items"), vec!["alpha_daily_20240101.pdf"]);

    let beta = app
        .client()
        .get(&api_path("/reports/catalog?category=monthly"))
        .add_header(TENANT_HEADER, "beta")
        .await;
    let beta: Value = beta.json();
    assert_eq!(names(&beta, "items"), vec!["beta_monthly_20240601.pdf"]);
}

#[tokio::test]
async fn test_catalog_search_sort_and_paginate() {
    let app = setup_test_app().await;
    for day in 0..25 {
        app.write_report(&format!("alpha_daily_202401{:02}.pdf", day + 1), b"%PDF");
    }
    app.write_report("alpha_monthly_20240101.pdf", b"%PDF");

    let response = app
        .client()
        .get(&api_path(
            "/reports/catalog?sort=name&direction=asc&page=1&page_size=10&category=all&q=DAILY",
        ))
        .add_header(TENANT_HEADER, "alpha")
        .await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["total"], 25);
    assert_eq!(body["pageIndex"], 1);
    assert_eq!(body["pageSize"], 10);
    assert_eq!(body["pageCount"], 3);
    let expected: Vec<String> = (11..=20)
        .map(|day| format!("alpha_daily_202401{:02}.pdf", day))
        .collect();
    assert_eq!(names(&body, "items"), expected);

    let last = app
        .client()
        .get(&api_path(
            "/reports/catalog?sort=name&direction=desc&page=2&page_size=10&category=daily",
        ))
        .add_header(TENANT_HEADER, "alpha")
        .await;
    let last: Value = last.json();
    assert_eq!(
        names(&last, "items"),
        vec![
            "alpha_daily_20240105.pdf",
            "alpha_daily_20240104.pdf",
            "alpha_daily_20240103.pdf",
            "alpha_daily_20240102.pdf",
            "alpha_daily_20240101.pdf",
        ]
    );

    let beyond = app
        .client()
        .get(&api_path("/reports/catalog?page=9&page_size=10"))
        .add_header(TENANT_HEADER, "alpha")
        .await;
    assert_eq!(beyond.status_code(), 200);
    let beyond: Value = beyond.json();
    assert!(names(&beyond, "items").is_empty());
    assert_eq!(beyond["total"], 25);
}

#[tokio::test]
async fn test_catalog_rejects_invalid_parameters() {
    let app = setup_test_app().await;

    for query in [
        "?page_size=7",
        "?sort=size",
        "?direction=sideways",
        "?category=weekly",
        "?page=-1",
    ] {
        let response = app
            .client()
            .get(&format!("{}{}", api_path("/reports/catalog"), query))
            .add_header(TENANT_HEADER, "alpha")
            .await;

        assert_eq!(response.status_code(), 400, "query {}", query);
        let body: Value = response.json();
        assert_eq!(body["code"], "BAD_REQUEST");
    }
}

#[tokio::test]
async fn test_owner_index_mode_uses_equality() {
    let app = setup_test_app_with(&[("OWNERSHIP_MODE", "index")]).await;
    app.write_report("alpha_daily_20240101.pdf", b"%PDF alpha");
    app.write_report("quarterly_summary.pdf", b"%PDF summary");
    app.write_report(
        ".report-owners.json",
        br#"{"alpha_daily_20240101.pdf": "alpha", "quarterly_summary.pdf": "alpha"}"#,
    );

    let listing = app
        .client()
        .get(&api_path("/reports"))
        .add_header(TENANT_HEADER, "alpha")
        .await;
    let listing: Value = listing.json();
    assert_eq!(
        names(&listing, "reports"),
        vec!["alpha_daily_20240101.pdf", "quarterly_summary.pdf"]
    );

    // A tenant whose id is a substring of the owner's no longer matches
    let response = app
        .client()
        .get(&api_path("/reports/download/alpha_daily_20240101.pdf"))
        .add_header(TENANT_HEADER, "al")
        .await;
    assert_eq!(response.status_code(), 403);

    let response = app
        .client()
        .get(&api_path("/reports/download/quarterly_summary.pdf"))
        .add_header(TENANT_HEADER, "Alpha")
        .await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_owner_index_malformed_is_storage_error() {
    let app = setup_test_app_with(&[("OWNERSHIP_MODE", "index")]).await;
    app.write_report("alpha_daily_20240101.pdf", b"%PDF alpha");
    app.write_report(".report-owners.json", b"{ not json");

    let response = app
        .client()
        .get(&api_path("/reports"))
        .add_header(TENANT_HEADER, "alpha")
        .await;

    assert_eq!(response.status_code(), 500);
    let body: Value = response.json();
    assert_eq!(body["code"], "STORAGE_ERROR");
}
