//! Login, token validation and role gating.

use axum::http::StatusCode;
use axum::http::header::WWW_AUTHENTICATE;

use fleet_auth::jwt::JwtDecoder;
use fleet_entity::Role;

use crate::helpers::{ADMIN_EMAIL, ADMIN_PASSWORD, TestApp, test_config};

#[tokio::test]
async fn test_login_success_returns_decodable_token() {
    let app = TestApp::new();
    app.create_administrator(ADMIN_EMAIL, ADMIN_PASSWORD, Role::Admin)
        .await;

    let response = app
        .request(
            "POST",
            "/administradores/login",
            Some(serde_json::json!({ "email": ADMIN_EMAIL, "senha": ADMIN_PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], ADMIN_EMAIL);
    assert_eq!(response.body["perfil"], "Adm");

    let token = response.body["token"].as_str().unwrap();
    assert!(!token.is_empty());
    let claims = JwtDecoder::new(&test_config().auth).decode(token).unwrap();
    assert_eq!(claims.role, Role::Admin);
    assert_eq!(claims.perfil, Role::Admin);
    assert_eq!(claims.email, ADMIN_EMAIL);
}

#[tokio::test]
async fn test_login_wrong_password_is_unauthorized() {
    let app = TestApp::new();
    app.create_administrator(ADMIN_EMAIL, ADMIN_PASSWORD, Role::Admin)
        .await;

    let response = app
        .request(
            "POST",
            "/administradores/login",
            Some(serde_json::json!({ "Email": ADMIN_EMAIL, "Senha": "Wrong123" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.body.get("token").is_none());
    assert_eq!(response.body["status"], 401);
}

#[tokio::test]
async fn test_login_unknown_email_matches_wrong_password() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/administradores/login",
            Some(serde_json::json!({ "Email": "ninguem@teste.com", "Senha": "Qualquer1" })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.body.get("token").is_none());
}

#[tokio::test]
async fn test_login_email_is_case_insensitive() {
    let app = TestApp::new();
    app.create_administrator(ADMIN_EMAIL, ADMIN_PASSWORD, Role::Admin)
        .await;

    let token = app.login("Administrador@Teste.COM", ADMIN_PASSWORD).await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_login_empty_fields_is_validation_error() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/administradores/login",
            Some(serde_json::json!({})),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.messages(),
        vec!["O email é obrigatório", "A senha é obrigatória"]
    );
}

#[tokio::test]
async fn test_missing_token_is_unauthorized_with_challenge() {
    let app = TestApp::new();

    let response = app.request("GET", "/veiculos", None, None).await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.headers[WWW_AUTHENTICATE], "Bearer");
    assert_eq!(response.body["instance"], "/veiculos");
    assert!(response.body.get("timestamp").is_some());
}

#[tokio::test]
async fn test_forged_token_is_unauthorized() {
    let app = TestApp::new();

    let response = app
        .request("GET", "/veiculos", None, Some("not.a.token"))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let other = {
        let mut config = test_config();
        config.auth.jwt_secret = "some-other-signing-key-9876543210".to_string();
        TestApp::with_config(config)
    };
    let foreign_token = other.admin_token().await;
    let response = app
        .request("GET", "/veiculos", None, Some(&foreign_token))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_editor_is_forbidden_on_admin_routes() {
    let app = TestApp::new();
    let token = app.editor_token().await;

    for (method, path) in [
        ("GET", "/administradores"),
        ("GET", "/administradores/1"),
        ("DELETE", "/veiculos/1"),
    ] {
        let response = app.request(method, path, None, Some(&token)).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{method} {path}");
        assert_eq!(response.body["status"], 403);
    }
}

#[tokio::test]
async fn test_role_is_checked_before_body() {
    let app = TestApp::new();
    let token = app.editor_token().await;

    let response = app
        .send("PUT", "/veiculos/1", "{ not json".to_string(), Some(&token), &[])
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}
