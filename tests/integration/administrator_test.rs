//! Administrator management, statistics and the welcome document.

use axum::http::StatusCode;
use axum::http::header::LOCATION;
use serde_json::json;

use fleet_auth::PasswordPolicy;

use crate::helpers::{ADMIN_EMAIL, TestApp, memory_state, test_config};

#[tokio::test]
async fn test_create_list_and_get() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let created = app
        .request(
            "POST",
            "/administradores",
            Some(json!({ "Email": "novo@teste.com", "Senha": "Segura123", "Perfil": "Editor" })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_i64().unwrap();
    assert_eq!(created.headers[LOCATION], format!("/administradores/{id}"));
    assert_eq!(created.body["perfil"], "Editor");
    assert!(created.body.get("password_hash").is_none());
    assert!(created.body.get("senha").is_none());

    let listed = app
        .request("GET", "/administradores", None, Some(&token))
        .await;
    assert_eq!(listed.status, StatusCode::OK);
    let emails: Vec<_> = listed
        .body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["email"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(emails, vec![ADMIN_EMAIL, "novo@teste.com"]);

    let fetched = app
        .request("GET", &format!("/administradores/{id}"), None, Some(&token))
        .await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, created.body);

    // The new account can log in.
    let editor_token = app.login("novo@teste.com", "Segura123").await;
    assert!(!editor_token.is_empty());
}

#[tokio::test]
async fn test_role_as_ordinal() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let created = app
        .request(
            "POST",
            "/administradores",
            Some(json!({ "email": "ordinal@teste.com", "senha": "Segura123", "perfil": 0 })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["perfil"], "Adm");
}

#[tokio::test]
async fn test_get_missing_is_not_found() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let response = app
        .request("GET", "/administradores/999", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_administrator_is_rejected() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let response = app
        .request(
            "POST",
            "/administradores",
            Some(json!({ "Email": "sem-arroba", "Senha": "fraca", "Perfil": "Root" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let messages = response.messages();
    assert!(messages.contains(&"Email deve ter um formato válido".to_string()));
    assert!(messages.contains(&"A senha deve ter pelo menos 6 caracteres".to_string()));
    assert!(messages.contains(&"Perfil deve ser Adm ou Editor".to_string()));
}

#[tokio::test]
async fn test_creation_uses_policy_from_state() {
    let mut state = memory_state(test_config());
    state.password_policy = PasswordPolicy::new(10, 50);
    let app = TestApp::with_state(state);
    let token = app.admin_token().await;

    let response = app
        .request(
            "POST",
            "/administradores",
            Some(json!({ "Email": "novo@teste.com", "Senha": "Segura1", "Perfil": "Editor" })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.messages(),
        vec!["A senha deve ter pelo menos 10 caracteres".to_string()]
    );
}

#[tokio::test]
async fn test_duplicate_email_is_conflict() {
    let app = TestApp::new();
    let token = app.admin_token().await;

    let response = app
        .request(
            "POST",
            "/administradores",
            Some(json!({ "Email": ADMIN_EMAIL.to_uppercase(), "Senha": "Segura123", "Perfil": "Adm" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_statistics_requires_authentication() {
    let app = TestApp::new();

    let anonymous = app.request("GET", "/api/estatisticas", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);

    let token = app.editor_token().await;
    app.request(
        "POST",
        "/veiculos",
        Some(json!({ "Nome": "Civic", "Marca": "Honda", "Ano": 2020 })),
        Some(&token),
    )
    .await;

    let response = app
        .request("GET", "/api/estatisticas", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["totalVeiculos"], 1);
    assert_eq!(response.body["totalAdministradores"], 1);
    assert_eq!(response.body["versaoAPI"], "v1.0");
    assert!(response.body["funcionalidadesDisponiveis"].is_array());
}

#[tokio::test]
async fn test_home_is_anonymous() {
    let app = TestApp::new();

    let response = app.request("GET", "/", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body["mensagem"].is_string());
    assert_eq!(response.body["health"], "/health");
}
