//! Store endpoints.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;

use store_ratings_core::{Store, StoreCreate, StoreId, StoreUpdate};

use super::ListQuery;
use crate::error::{AppError, Result};
use crate::middleware::BearerAdmin;
use crate::services::stores::StoreService;
use crate::state::AppState;

/// `GET /api/stores[?q=]`
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<Store>> {
    Json(state.db().stores().search(&query.q).await)
}

/// `GET /api/stores/{id}`
pub async fn show(State(state): State<AppState>, Path(id): Path<StoreId>) -> Result<Json<Store>> {
    Ok(Json(state.db().stores().get(id).await?))
}

/// `POST /api/stores` (admin)
#[instrument(skip(_admin, state, request), fields(name = %request.name))]
pub async fn create(
    BearerAdmin(_admin): BearerAdmin,
    State(state): State<AppState>,
    Json(request): Json<StoreCreate>,
) -> Result<(StatusCode, Json<Store>)> {
    let new_store = StoreService::new(state.db())
        .prepare(&request)
        .await
        .map_err(AppError::Validation)?;
    let store = state.db().stores().create(new_store).await?;

    tracing::info!(store_id = %store.id, "Store created via API");
    Ok((StatusCode::CREATED, Json(store)))
}

/// `PATCH /api/stores/{id}` (admin)
///
/// Absent fields keep their current value.
#[instrument(skip(_admin, state, request))]
pub async fn update(
    BearerAdmin(_admin): BearerAdmin,
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
    Json(request): Json<StoreUpdate>,
) -> Result<Json<Store>> {
    let stores = state.db().stores();
    let merged = request.merged(&stores.get(id).await?);
    let new_store = StoreService::new(state.db())
        .prepare(&merged)
        .await
        .map_err(AppError::Validation)?;
    Ok(Json(stores.update(id, new_store).await?))
}

/// `DELETE /api/stores/{id}` (admin)
#[instrument(skip(_admin, state))]
pub async fn delete(
    BearerAdmin(_admin): BearerAdmin,
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
) -> Result<StatusCode> {
    state.db().stores().delete(id).await?;
    tracing::info!(store_id = %id, "Store deleted via API");
    Ok(StatusCode::NO_CONTENT)
}
