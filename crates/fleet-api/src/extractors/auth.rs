//! Bearer-token authentication and role checks.
//!
//! Both extractors only read the request head, so they reject a request
//! before its body is parsed.

use std::marker::PhantomData;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use tracing::warn;

use fleet_auth::jwt::Claims;
use fleet_auth::rbac::{AdminOnly, AdminOrEditor, AnyRole, RolePolicy};
use fleet_core::error::AppError;
use fleet_entity::Role;

use crate::error::ApiError;
use crate::state::AppState;

/// Caller identified by a valid bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub claims: Claims,
}

impl AuthUser {
    /// Role used for authorization.
    pub fn role(&self) -> Role {
        self.claims.role
    }

    /// Login email.
    pub fn email(&self) -> &str {
        &self.claims.email
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| AppError::authentication("Missing Authorization header"))?
        .to_str()
        .map_err(|_| AppError::authentication("Authorization header is not valid text"))?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(AppError::authentication("Invalid Authorization header format")),
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let token = bearer_token(&parts.headers)?;
        let claims = state.jwt_decoder.decode(token)?;

        let user = AuthUser { claims };
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Caller whose role satisfies `P`.
#[derive(Debug, Clone)]
pub struct Authorized<P> {
    pub user: AuthUser,
    _policy: PhantomData<fn() -> P>,
}

impl<P> std::ops::Deref for Authorized<P> {
    type Target = AuthUser;

    fn deref(&self) -> &Self::Target {
        &self.user
    }
}

impl<P: RolePolicy> FromRequestParts<AppState> for Authorized<P> {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if let Err(e) = P::require(user.role()) {
            warn!(
                email = %user.email(),
                role = %user.role(),
                required = P::DESCRIPTION,
                path = %parts.uri.path(),
                "Access denied"
            );
            return Err(e.into());
        }

        Ok(Self {
            user,
            _policy: PhantomData,
        })
    }
}

/// Administrators only.
pub type AdminUser = Authorized<AdminOnly>;
/// Administrators and editors.
pub type StaffUser = Authorized<AdminOrEditor>;
/// Any authenticated caller.
pub type AnyUser = Authorized<AnyRole>;

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")).unwrap(), "abc.def");
        assert_eq!(bearer_token(&headers("bearer abc")).unwrap(), "abc");
        assert!(bearer_token(&headers("Basic abc")).is_err());
        assert!(bearer_token(&headers("Bearer ")).is_err());
        assert!(bearer_token(&HeaderMap::new()).is_err());
    }
}
