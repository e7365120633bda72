//! Token login and registration.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use store_ratings_core::{AuthResponse, LoginRequest, RegisterRequest, Role, User};

use crate::error::{AppError, Result};
use crate::middleware::{BearerUser, bearer_token};
use crate::services::auth::{AuthService, NewAccount};
use crate::state::AppState;

async fn issue(state: &AppState, user: &User) -> AuthResponse {
    let session_user = AuthService::new(state.db()).session_user(user).await;
    let token = state.tokens().issue(user.id).await;
    AuthResponse {
        user: session_user,
        token: token.expose_secret().to_string(),
        refresh_token: None,
    }
}

/// `POST /api/auth/login`
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let password = SecretString::from(request.password);
    let user = AuthService::new(state.db())
        .login(request.email.trim(), &password)
        .await?;

    tracing::info!(user_id = %user.id, "API login");
    Ok(Json(issue(&state, &user).await))
}

/// `POST /api/auth/register`
///
/// The role defaults to `user`. Administrators cannot be self-registered.
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let role = request.role.unwrap_or_default();
    if role == Role::Admin {
        return Err(AppError::Forbidden(
            "Administrator accounts cannot be self-registered".to_string(),
        ));
    }

    let user = AuthService::new(state.db())
        .register(NewAccount {
            name: request.name,
            email: request.email.trim().to_string(),
            address: request.address,
            role,
            password: SecretString::from(request.password),
        })
        .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "API registration");
    Ok((StatusCode::CREATED, Json(issue(&state, &user).await)))
}

/// `POST /api/auth/logout`
///
/// Revokes the presented token. Other tokens of the same user stay valid.
#[instrument(skip(user, state, headers), fields(user_id = %user.id))]
pub async fn logout(
    BearerUser(user): BearerUser,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> StatusCode {
    if let Some(token) = bearer_token(&headers) {
        state.tokens().revoke(&SecretString::from(token)).await;
        tracing::info!("API token revoked");
    }
    StatusCode::NO_CONTENT
}
