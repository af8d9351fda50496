//! Health probes and unmatched routes.

use axum::http::StatusCode;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health_always_ok_with_status() {
    let app = TestApp::new();

    let response = app.request("GET", "/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    let status = response.body["status"].as_str().unwrap();
    assert!(["Healthy", "Degraded", "Unhealthy"].contains(&status));

    let names: Vec<_> = response.body["checks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect();
    for name in ["database", "cache", "memory", "self"] {
        assert!(names.iter().any(|n| n == name), "missing {name}");
    }
}

#[tokio::test]
async fn test_ready_runs_ready_checks_only() {
    let app = TestApp::new();

    let response = app.request("GET", "/health/ready", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "Healthy");
    let checks = response.body["checks"].as_array().unwrap();
    assert_eq!(checks.len(), 2);
    let database = checks.iter().find(|c| c["name"] == "database").unwrap();
    assert_eq!(database["data"]["veiculos_count"], 0);
}

#[tokio::test]
async fn test_live_has_no_checks() {
    let app = TestApp::new();

    let response = app.request("GET", "/health/live", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "Healthy");
    assert!(response.body["checks"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_api_health() {
    let app = TestApp::new();

    let response = app.request("GET", "/api/health", None, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["status"], "Healthy");
    assert_eq!(response.body["version"], "1.0.0");
    assert!(response.body["timestamp"].is_string());
}

#[tokio::test]
async fn test_unknown_route_is_problem_document() {
    let app = TestApp::new();

    let response = app.request("GET", "/nao-existe", None, None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["status"], 404);
    assert_eq!(response.body["instance"], "/nao-existe");
}
