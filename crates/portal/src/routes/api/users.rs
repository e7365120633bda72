//! User endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use secrecy::SecretString;
use tracing::instrument;

use store_ratings_core::validation::{FormMode, UserDraft, validate_user};
use store_ratings_core::{Email, User, UserCreate, UserId, UserUpdate};

use super::ListQuery;
use crate::db::UserChanges;
use crate::error::{AppError, Result};
use crate::middleware::BearerAdmin;
use crate::services::auth::{AuthError, AuthService, NewAccount};
use crate::state::AppState;

/// `GET /api/users[?q=]`
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<User>> {
    Json(state.db().users().search(&query.q).await)
}

/// `GET /api/users/{id}`
pub async fn show(State(state): State<AppState>, Path(id): Path<UserId>) -> Result<Json<User>> {
    Ok(Json(state.db().users().get(id).await?))
}

/// `POST /api/users` (admin)
#[instrument(skip(_admin, state, request), fields(email = %request.email))]
pub async fn create(
    BearerAdmin(_admin): BearerAdmin,
    State(state): State<AppState>,
    Json(request): Json<UserCreate>,
) -> Result<(StatusCode, Json<User>)> {
    let user = AuthService::new(state.db())
        .register(NewAccount {
            name: request.name,
            email: request.email.trim().to_string(),
            address: request.address,
            role: request.role,
            password: SecretString::from(request.password),
        })
        .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "User created via API");
    Ok((StatusCode::CREATED, Json(user)))
}

/// `PATCH /api/users/{id}` (admin)
///
/// Absent fields keep their current value. The password cannot be changed.
#[instrument(skip(_admin, state, request))]
pub async fn update(
    BearerAdmin(_admin): BearerAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Json(request): Json<UserUpdate>,
) -> Result<Json<User>> {
    let users = state.db().users();
    let current = users.get(id).await?;
    let (name, email, address, role) = request.merged(&current);

    let draft = UserDraft {
        name: &name,
        email: email.trim(),
        address: &address,
        password: None,
    };
    validate_user(&draft, FormMode::Edit)
        .into_result()
        .map_err(AppError::Validation)?;
    let email = Email::parse(email.trim()).map_err(AuthError::from)?;

    let user = users
        .update(
            id,
            UserChanges {
                name,
                email,
                address,
                role,
            },
        )
        .await?;
    Ok(Json(user))
}

/// `DELETE /api/users/{id}` (admin)
///
/// Removes the user's ratings and revokes their tokens.
#[instrument(skip(admin, state))]
pub async fn delete(
    BearerAdmin(admin): BearerAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<StatusCode> {
    if id == admin.id {
        return Err(AppError::BadRequest(
            "You cannot delete your own account".to_string(),
        ));
    }

    state.db().users().delete(id).await?;
    state.tokens().revoke_user(id).await;
    tracing::info!(user_id = %id, "User deleted via API");
    Ok(StatusCode::NO_CONTENT)
}
