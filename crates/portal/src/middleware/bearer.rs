//! Bearer-token extractors for the JSON API.
//!
//! Tokens are issued by `/api/auth/login` and `/api/auth/register` (and by
//! the HTML login, which keeps its token in the session). Rejections are
//! JSON `AppError` responses.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};

use store_ratings_core::{Role, User};

use crate::error::AppError;
use crate::state::AppState;

/// Extractor that requires a valid bearer token of any role.
pub struct BearerUser(pub User);

/// Extractor that requires a valid bearer token of an admin.
pub struct BearerAdmin(pub User);

/// The token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

impl FromRequestParts<AppState> for BearerUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let user_id = state
            .tokens()
            .resolve(token)
            .await
            .ok_or_else(|| AppError::Unauthorized("Invalid or revoked token".to_string()))?;

        let user = state
            .db()
            .users()
            .get(user_id)
            .await
            .map_err(|_| AppError::Unauthorized("Account no longer exists".to_string()))?;

        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for BearerAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerUser(user) = BearerUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            tracing::debug!(user_id = %user.id, role = %user.role, "Admin endpoint refused");
            return Err(AppError::Forbidden(
                "Only administrators can perform this action".to_string(),
            ));
        }
        Ok(Self(user))
    }
}
