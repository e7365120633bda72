//! Rating endpoints.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use store_ratings_core::validation::validate_rating;
use store_ratings_core::{Rating, RatingCreate, RatingId, RatingUpdate, Role, StoreId, User, UserId};

use crate::error::{AppError, Result};
use crate::middleware::BearerUser;
use crate::state::AppState;

/// Only the author of a rating or an admin may change it.
fn ensure_can_modify(user: &User, rating: &Rating) -> Result<()> {
    if rating.user_id == user.id || user.role == Role::Admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You can only change your own ratings".to_string(),
        ))
    }
}

/// `GET /api/stores/{id}/ratings`, newest first.
pub async fn for_store(
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
) -> Result<Json<Vec<Rating>>> {
    Ok(Json(state.db().ratings().for_store(id).await?))
}

/// `GET /api/users/{id}/ratings`, newest first.
pub async fn for_user(
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Result<Json<Vec<Rating>>> {
    Ok(Json(state.db().ratings().for_user(id).await?))
}

/// `POST /api/ratings`
///
/// Rating a store again replaces the earlier rating: 201 when created,
/// 200 when an existing rating was updated.
#[instrument(skip(user, state, request), fields(user_id = %user.id, store_id = %request.store_id))]
pub async fn create(
    BearerUser(user): BearerUser,
    State(state): State<AppState>,
    Json(request): Json<RatingCreate>,
) -> Result<(StatusCode, Json<Rating>)> {
    let value = validate_rating(request.rating).map_err(AppError::Validation)?;
    let (rating, created) = state
        .db()
        .ratings()
        .upsert(user.id, request.store_id, value, request.comment)
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(rating)))
}

/// `PATCH /api/ratings/{id}` (author or admin)
#[instrument(skip(user, state, request), fields(user_id = %user.id))]
pub async fn update(
    BearerUser(user): BearerUser,
    State(state): State<AppState>,
    Path(id): Path<RatingId>,
    Json(request): Json<RatingUpdate>,
) -> Result<Json<Rating>> {
    let ratings = state.db().ratings();
    ensure_can_modify(&user, &ratings.get(id).await?)?;

    let value = request
        .rating
        .map(validate_rating)
        .transpose()
        .map_err(AppError::Validation)?;
    Ok(Json(ratings.update(id, value, request.comment).await?))
}

/// `DELETE /api/ratings/{id}` (author or admin)
#[instrument(skip(user, state), fields(user_id = %user.id))]
pub async fn delete(
    BearerUser(user): BearerUser,
    State(state): State<AppState>,
    Path(id): Path<RatingId>,
) -> Result<StatusCode> {
    let ratings = state.db().ratings();
    ensure_can_modify(&user, &ratings.get(id).await?)?;
    ratings.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
