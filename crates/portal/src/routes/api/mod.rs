//! JSON API consumed by the REST client and the CLI.
//!
//! Reads are public. Mutations need `Authorization: Bearer <token>` from
//! `/api/auth/login` or `/api/auth/register`, revoked by `/api/auth/logout`.
//! User and store mutations are admin-only, and a rating can only be changed
//! by its author or an admin.
//! Errors are JSON `{message, errors?}` bodies from [`AppError`].
//!
//! [`AppError`]: crate::error::AppError

pub mod auth;
pub mod ratings;
pub mod stores;
pub mod users;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

/// Create the `/api` router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .route("/auth/logout", post(auth::logout))
        .route("/users", get(users::index).post(users::create))
        .route(
            "/users/{id}",
            get(users::show).patch(users::update).delete(users::delete),
        )
        .route("/users/{id}/ratings", get(ratings::for_user))
        .route("/stores", get(stores::index).post(stores::create))
        .route(
            "/stores/{id}",
            get(stores::show).patch(stores::update).delete(stores::delete),
        )
        .route("/stores/{id}/ratings", get(ratings::for_store))
        .route("/ratings", post(ratings::create))
        .route(
            "/ratings/{id}",
            patch(ratings::update).delete(ratings::delete),
        )
}

/// Optional `?q=` search on list endpoints.
#[derive(Debug, Default, serde::Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub q: String,
}
