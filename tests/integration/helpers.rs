//! Shared test helpers for integration tests.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use fleet_api::{AppState, build_router, with_middleware};
use fleet_cache::CacheManager;
use fleet_cache::memory::MemoryCacheProvider;
use fleet_core::config::AppConfig;
use fleet_database::DatabaseManager;
use fleet_entity::{Administrator, Role};
use fleet_service::NewAdministratorInput;

pub const ADMIN_EMAIL: &str = "administrador@teste.com";
pub const ADMIN_PASSWORD: &str = "Admin123";
pub const EDITOR_EMAIL: &str = "editor@teste.com";
pub const EDITOR_PASSWORD: &str = "Editor123";

/// Configuration used by every test: no rate limiting, no workers.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = "integration-test-signing-key-0123456789".to_string();
    config.rate_limit.enabled = false;
    config.worker.enabled = false;
    config
}

/// State over a fresh memory store and cache
pub fn memory_state(config: AppConfig) -> AppState {
    let cache = Arc::new(CacheManager::from_provider(
        Arc::new(MemoryCacheProvider::new(&config.cache.memory)),
        Duration::from_secs(config.cache.default_ttl_seconds),
    ));
    AppState::new(config, DatabaseManager::in_memory(), cache)
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for seeding data directly
    pub state: AppState,
}

impl TestApp {
    /// Create a new test application with the default test configuration
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a test application over a fresh memory store and cache
    pub fn with_config(config: AppConfig) -> Self {
        Self::with_state(memory_state(config))
    }

    /// Serve the full API over a prepared state
    pub fn with_state(state: AppState) -> Self {
        let router = build_router(state.clone());
        Self { router, state }
    }

    /// Serve only `routes`, behind the same middleware stack as the API
    pub fn with_routes(config: AppConfig, routes: Router<AppState>) -> Self {
        let state = memory_state(config);
        let router = with_middleware(routes, state.clone());
        Self { router, state }
    }

    /// Insert an administrator through the service layer
    pub async fn create_administrator(&self, email: &str, password: &str, role: Role) -> Administrator {
        self.state
            .administrators
            .create(NewAdministratorInput {
                email: email.to_string(),
                password: password.to_string(),
                role,
            })
            .await
            .expect("Failed to create administrator")
    }

    /// Login and return the JWT
    pub async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                "POST",
                "/administradores/login",
                Some(serde_json::json!({ "Email": email, "Senha": password })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }

    /// Token of a freshly created `Adm` account
    pub async fn admin_token(&self) -> String {
        self.create_administrator(ADMIN_EMAIL, ADMIN_PASSWORD, Role::Admin)
            .await;
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Token of a freshly created `Editor` account
    pub async fn editor_token(&self) -> String {
        self.create_administrator(EDITOR_EMAIL, EDITOR_PASSWORD, Role::Editor)
            .await;
        self.login(EDITOR_EMAIL, EDITOR_PASSWORD).await
    }

    /// Make an HTTP request to the test app
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        self.request_with_headers(method, path, body, token, &[]).await
    }

    /// Make an HTTP request with extra headers
    pub async fn request_with_headers(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();
        self.send(method, path, body_str, token, headers).await
    }

    /// Send a raw body
    pub async fn send(
        &self,
        method: &str,
        path: &str,
        body: String,
        token: Option<&str>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {token}"));
        }
        for (name, value) in headers {
            req = req.header(*name, *value);
        }

        let req = req.body(Body::from(body)).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body = serde_json::from_slice(&body_bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Parsed JSON body, or the raw text when it is not JSON
    pub body: Value,
}

impl TestResponse {
    /// `Mensagens` of a validation response
    pub fn messages(&self) -> Vec<String> {
        self.body["Mensagens"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|m| m.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }
}
