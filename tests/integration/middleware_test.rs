//! Timeout and panic handling through the full middleware stack.

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;

use fleet_api::AppState;

use crate::helpers::{TestApp, test_config};

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(3)).await;
    "done"
}

async fn explode() -> &'static str {
    panic!("handler exploded")
}

fn app_with_one_second_timeout() -> TestApp {
    let mut config = test_config();
    config.server.request_timeout_seconds = 1;
    let routes: Router<AppState> = Router::new()
        .route("/lento", get(slow))
        .route("/falha", get(explode));
    TestApp::with_routes(config, routes)
}

#[tokio::test]
async fn test_slow_request_answers_408_problem() {
    let app = app_with_one_second_timeout();

    let response = app.request("GET", "/lento", None, None).await;

    assert_eq!(response.status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(response.body["title"], "Tempo limite excedido");
    assert_eq!(response.body["status"], 408);
    assert_eq!(response.body["instance"], "/lento");
}

#[tokio::test]
async fn test_panicking_handler_answers_500_problem() {
    let app = app_with_one_second_timeout();

    let response = app.request("GET", "/falha", None, None).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["title"], "Erro interno do servidor");
    assert_eq!(response.body["status"], 500);
    assert_eq!(response.body["instance"], "/falha");
}

#[tokio::test]
async fn test_server_keeps_answering_after_a_panic() {
    let app = app_with_one_second_timeout();

    let first = app.request("GET", "/falha", None, None).await;
    let second = app.request("GET", "/falha", None, None).await;

    assert_eq!(first.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(second.status, StatusCode::INTERNAL_SERVER_ERROR);
}
