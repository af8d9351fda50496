//! Fixed-window rate limiting through the full middleware stack.

use axum::http::StatusCode;
use axum::http::header::RETRY_AFTER;
use serde_json::json;

use crate::helpers::{TestApp, test_config};

fn limited_app(general: u64, auth: u64) -> TestApp {
    let mut config = test_config();
    config.rate_limit.enabled = true;
    config.rate_limit.general.permit_limit = general;
    config.rate_limit.auth.permit_limit = auth;
    TestApp::with_config(config)
}

#[tokio::test]
async fn test_general_policy_rejects_after_limit() {
    let app = limited_app(3, 100);
    let client = [("user-agent", "client-a")];

    for _ in 0..3 {
        let response = app
            .request_with_headers("GET", "/api/health", None, None, &client)
            .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let rejected = app
        .request_with_headers("GET", "/api/health", None, None, &client)
        .await;
    assert_eq!(rejected.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(rejected.body, "Muitas requisições. Tente novamente mais tarde.");
    assert_eq!(rejected.headers[RETRY_AFTER], "60");

    // Another identity has its own window.
    let other = app
        .request_with_headers(
            "GET",
            "/api/health",
            None,
            None,
            &[("user-agent", "client-b")],
        )
        .await;
    assert_eq!(other.status, StatusCode::OK);

    let forwarded = app
        .request_with_headers(
            "GET",
            "/api/health",
            None,
            None,
            &[("user-agent", "client-a"), ("x-forwarded-for", "198.51.100.4")],
        )
        .await;
    assert_eq!(forwarded.status, StatusCode::OK);
}

#[tokio::test]
async fn test_login_has_stricter_policy() {
    let app = limited_app(100, 2);
    let body = json!({ "Email": "x@teste.com", "Senha": "Errada123" });

    for _ in 0..2 {
        let response = app
            .request("POST", "/administradores/login", Some(body.clone()), None)
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    let rejected = app
        .request("POST", "/administradores/login", Some(body), None)
        .await;
    assert_eq!(rejected.status, StatusCode::TOO_MANY_REQUESTS);

    // Other routes still use the general policy.
    let health = app.request("GET", "/api/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
}
