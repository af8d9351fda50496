//! Maps domain errors to HTTP responses.
//!
//! Two body shapes leave this module: the problem document for every
//! [`AppError`], and the `{ "Mensagens": [...] }` list returned when a
//! request body fails field validation.

use std::collections::BTreeMap;

use axum::Json;
use axum::http::header::WWW_AUTHENTICATE;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use fleet_core::error::{AppError, ErrorKind};

/// Problem document returned for every failed request except field validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    pub title: String,
    pub status: u16,
    pub detail: String,
    /// Request path, filled in by the `problem_instance` middleware.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

/// Field validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessages {
    #[serde(rename = "Mensagens")]
    pub mensagens: Vec<String>,
}

/// Error type returned by handlers and extractors.
#[derive(Debug)]
pub enum ApiError {
    /// A domain error, rendered as a [`ProblemDetails`].
    App(AppError),
    /// Field validation messages, rendered as [`ValidationMessages`].
    Invalid(Vec<String>),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl ApiError {
    /// Status code this error is answered with.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::App(err) => status_for(err.kind),
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
        }
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::InvalidOperation => StatusCode::BAD_REQUEST,
        ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        ErrorKind::Authorization => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Timeout => StatusCode::REQUEST_TIMEOUT,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::RateLimit => StatusCode::TOO_MANY_REQUESTS,
        ErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Internal
        | ErrorKind::Database
        | ErrorKind::Cache
        | ErrorKind::Configuration
        | ErrorKind::Serialization => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn title_for(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Validation => "Erro de validação",
        ErrorKind::InvalidOperation => "Operação inválida",
        ErrorKind::Authentication => "Não autorizado",
        ErrorKind::Authorization => "Acesso negado",
        ErrorKind::NotFound => "Recurso não encontrado",
        ErrorKind::Timeout => "Tempo limite excedido",
        ErrorKind::Conflict => "Conflito",
        ErrorKind::RateLimit => "Muitas requisições",
        ErrorKind::ServiceUnavailable => "Serviço indisponível",
        _ => "Erro interno do servidor",
    }
}

/// Client-facing detail. Only kinds whose message is meant for the caller
/// pass it through.
fn detail_for(err: &AppError) -> String {
    match err.kind {
        ErrorKind::Validation | ErrorKind::InvalidOperation | ErrorKind::Conflict => {
            err.message.clone()
        }
        ErrorKind::Authentication => "Credenciais ausentes ou inválidas".to_string(),
        ErrorKind::Authorization => "Permissão insuficiente para este recurso".to_string(),
        ErrorKind::NotFound => "O recurso solicitado não foi encontrado".to_string(),
        ErrorKind::Timeout => "A requisição excedeu o tempo limite".to_string(),
        ErrorKind::RateLimit => "Muitas requisições. Tente novamente mais tarde.".to_string(),
        ErrorKind::ServiceUnavailable => "Serviço temporariamente indisponível".to_string(),
        _ => "Ocorreu um erro inesperado".to_string(),
    }
}

impl ProblemDetails {
    /// Build the document for a domain error.
    pub fn from_error(err: &AppError) -> Self {
        Self {
            title: title_for(err.kind).to_string(),
            status: status_for(err.kind).as_u16(),
            detail: detail_for(err),
            instance: None,
            timestamp: Utc::now(),
            errors: err.field_errors.clone(),
        }
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(&self)).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

impl IntoResponse for ValidationMessages {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self)).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = match self {
            Self::Invalid(mensagens) => {
                debug!(messages = ?mensagens, "Request failed validation");
                return ValidationMessages { mensagens }.into_response();
            }
            Self::App(err) => err,
        };

        if err.kind.is_infrastructure() {
            error!(kind = %err.kind, error = %err.message, source = ?err.source, "Request failed");
        } else if err.kind == ErrorKind::ServiceUnavailable {
            warn!(error = %err.message, "Request failed");
        } else {
            debug!(kind = %err.kind, error = %err.message, "Request rejected");
        }

        let mut response = ProblemDetails::from_error(&err).into_response();
        if err.kind == ErrorKind::Authentication {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}
