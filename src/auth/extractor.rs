//! Axum extractors for Bearer-token authentication.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

use crate::auth::jwt::{self, Claims, TokenType};
use crate::error::ApiError;
use crate::AppState;

/// Requires a valid Bearer access token. Add as a handler parameter to
/// protect a route.
pub struct AuthUser(pub Claims);

/// Accepts a request with or without credentials. Used by routes whose
/// behavior depends on whether the caller is authenticated (e.g. lesson
/// export, where public lessons need no auth).
pub struct MaybeAuthUser(pub Option<Claims>);

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(ApiError::Unauthorized)?;
        let claims = jwt::verify_typed(token, &state.config.jwt_secret, TokenType::Access)
            .map_err(|_| ApiError::Unauthorized)?;
        Ok(AuthUser(claims))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = bearer_token(parts).and_then(|token| {
            jwt::verify_typed(token, &state.config.jwt_secret, TokenType::Access).ok()
        });
        Ok(MaybeAuthUser(claims))
    }
}
