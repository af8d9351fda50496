//! Administrator handlers: login, listing, lookup and creation.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::LOCATION;
use axum::response::IntoResponse;

use fleet_core::error::AppError;
use fleet_service::NewAdministratorInput;

use crate::dto::request::{AdministratorRequest, LoginRequest, PageQuery};
use crate::dto::response::{AdministratorView, LoginResponse};
use crate::error::ApiError;
use crate::extractors::{AdminUser, ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

/// POST /administradores/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(mut req): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let messages = req.violations();
    if !messages.is_empty() {
        return Err(ApiError::Invalid(messages));
    }

    let outcome = state.administrators.login(&req.email, &req.senha).await?;

    Ok(Json(LoginResponse {
        email: outcome.administrator.email,
        perfil: outcome.administrator.role,
        token: outcome.token.token,
    }))
}

/// GET /administradores?pagina=n
pub async fn list(
    _admin: AdminUser,
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<Vec<AdministratorView>>, ApiError> {
    let admins = state.administrators.list(query.pagina).await?;
    Ok(Json(admins.into_iter().map(AdministratorView::from).collect()))
}

/// GET /administradores/{id}
pub async fn get(
    _admin: AdminUser,
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<AdministratorView>, ApiError> {
    let admin = state
        .administrators
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Administrator {id} not found")))?;
    Ok(Json(admin.into()))
}

/// POST /administradores
pub async fn create(
    admin: AdminUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<AdministratorRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let valid = req
        .validated(&state.password_policy)
        .map_err(ApiError::Invalid)?;

    let created = state
        .administrators
        .create(NewAdministratorInput {
            email: valid.email,
            password: valid.senha,
            role: valid.perfil,
        })
        .await?;

    tracing::info!(created_by = %admin.email(), administrator_id = created.id, "Administrator registered");

    let location = format!("/administradores/{}", created.id);
    Ok((
        StatusCode::CREATED,
        [(LOCATION, location)],
        Json(AdministratorView::from(created)),
    ))
}
