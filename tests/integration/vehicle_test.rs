//! Vehicle CRUD over HTTP.

use axum::http::StatusCode;
use axum::http::header::LOCATION;
use serde_json::json;

use crate::helpers::TestApp;

fn civic() -> serde_json::Value {
    json!({ "Nome": "Civic", "Marca": "Honda", "Ano": 2020 })
}

#[tokio::test]
async fn test_create_requires_token() {
    let app = TestApp::new();

    let response = app.request("POST", "/veiculos", Some(civic()), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_with_admin_token() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let response = app
        .request("POST", "/veiculos", Some(civic()), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let id = response.body["id"].as_i64().unwrap();
    assert!(id > 0);
    assert_eq!(response.headers[LOCATION], format!("/veiculos/{id}"));
    assert_eq!(response.body["nome"], "Civic");
    assert_eq!(response.body["marca"], "Honda");
    assert_eq!(response.body["ano"], 2020);
}

#[tokio::test]
async fn test_editor_can_create_and_read() {
    let app = TestApp::new();
    let token = app.editor_token().await;

    let created = app
        .request(
            "POST",
            "/veiculos",
            Some(json!({ "nome": "Gol", "marca": "Volkswagen", "ano": 2012 })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let id = created.body["id"].as_i64().unwrap();
    let fetched = app
        .request("GET", &format!("/veiculos/{id}"), None, Some(&token))
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, created.body);
}

#[tokio::test]
async fn test_old_year_is_rejected() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let response = app
        .request(
            "POST",
            "/veiculos",
            Some(json!({ "Nome": "Ford T", "Marca": "Ford", "Ano": 1927 })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.messages(),
        vec!["Veículo muito antigo, aceito somete anos superiores a 1950"]
    );
}

#[tokio::test]
async fn test_every_invalid_field_is_reported() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let response = app
        .request("POST", "/veiculos", Some(json!({ "Ano": 1900 })), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.messages().len(), 3);
}

#[tokio::test]
async fn test_malformed_json_is_problem_document() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let response = app
        .send("POST", "/veiculos", "{ \"Nome\": ".to_string(), Some(&token), &[])
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["status"], 400);
    assert_eq!(response.body["instance"], "/veiculos");
    assert!(response.body["title"].is_string());
}

#[tokio::test]
async fn test_non_numeric_id_is_bad_request() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let response = app.request("GET", "/veiculos/abc", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_pages_and_filters() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    for i in 0..12 {
        app.request(
            "POST",
            "/veiculos",
            Some(json!({ "Nome": format!("Uno {i}"), "Marca": "Fiat", "Ano": 2000 + i })),
            Some(&token),
        )
        .await;
    }
    app.request("POST", "/veiculos", Some(civic()), Some(&token))
        .await;

    let all = app.request("GET", "/veiculos", None, Some(&token)).await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body.as_array().unwrap().len(), 13);

    let first = app
        .request("GET", "/veiculos?pagina=1", None, Some(&token))
        .await;
    assert_eq!(first.body.as_array().unwrap().len(), 10);

    let second = app
        .request("GET", "/veiculos?pagina=2", None, Some(&token))
        .await;
    assert_eq!(second.body.as_array().unwrap().len(), 3);

    let hondas = app
        .request("GET", "/veiculos?marca=honda", None, Some(&token))
        .await;
    let hondas = hondas.body.as_array().unwrap();
    assert_eq!(hondas.len(), 1);
    assert_eq!(hondas[0]["nome"], "Civic");
}

#[tokio::test]
async fn test_editor_can_list() {
    let app = TestApp::new();
    let token = app.editor_token().await;

    let response = app.request("GET", "/veiculos", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_missing_vehicle_wins_over_validation() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let response = app
        .request(
            "PUT",
            "/veiculos/999",
            Some(json!({ "Nome": "", "Marca": "", "Ano": 1 })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["status"], 404);
}

#[tokio::test]
async fn test_update_and_delete() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let created = app
        .request("POST", "/veiculos", Some(civic()), Some(&token))
        .await;
    let path = format!("/veiculos/{}", created.body["id"]);

    // Cached read before the update must not leak through afterwards.
    app.request("GET", &path, None, Some(&token)).await;

    let invalid = app
        .request(
            "PUT",
            &path,
            Some(json!({ "Nome": "Civic", "Marca": "Honda", "Ano": 1900 })),
            Some(&token),
        )
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

    let updated = app
        .request(
            "PUT",
            &path,
            Some(json!({ "Nome": "Civic Si", "Marca": "Honda", "Ano": 2022 })),
            Some(&token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["nome"], "Civic Si");

    let fetched = app.request("GET", &path, None, Some(&token)).await;
    assert_eq!(fetched.body["ano"], 2022);

    let deleted = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let again = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    let gone = app.request("GET", &path, None, Some(&token)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}
