//! HTTP route handlers for the portal.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                         - Landing page
//! GET  /health                   - Health check
//!
//! # Auth
//! GET  /login, POST /login       - Login (demo accounts listed)
//! GET  /signup, POST /signup     - Signup (role "user")
//! POST /logout                   - Logout
//!
//! # Admin (role admin)
//! GET  /admin                    - Redirect to dashboard
//! GET  /admin/dashboard          - Totals and recent activity
//! GET  /admin/users              - User list (?q= search), POST creates
//! GET  /admin/users/new          - New user form
//! GET  /admin/users/{id}         - User details, POST updates
//! GET  /admin/users/{id}/edit    - Edit user form
//! POST /admin/users/{id}/delete  - Delete user
//! GET  /admin/stores             - Store list (?q= search), POST creates
//! GET  /admin/stores/new         - New store form
//! GET  /admin/stores/{id}        - Store details, POST updates
//! GET  /admin/stores/{id}/edit   - Edit store form
//! POST /admin/stores/{id}/delete - Delete store
//!
//! # Store owner (role store_owner)
//! GET  /store                    - Redirect to dashboard
//! GET  /store/dashboard          - Owned store's ratings
//!
//! # User (role user)
//! GET  /user                     - Redirect to dashboard
//! GET  /user/dashboard           - Own ratings and top rated stores
//! GET  /user/stores              - Store list (?q= search)
//! GET  /user/stores/{id}         - Store details, POST rates
//!
//! # JSON API (bearer token for mutations)
//! POST /api/auth/login, /api/auth/register
//! GET  /api/stores, /api/stores/{id}, /api/stores/{id}/ratings
//! POST /api/stores, PATCH|DELETE /api/stores/{id}
//! GET  /api/users, /api/users/{id}, /api/users/{id}/ratings
//! POST /api/users, PATCH|DELETE /api/users/{id}
//! POST /api/ratings, PATCH|DELETE /api/ratings/{id}
//! ```

pub mod admin;
pub mod api;
pub mod auth;
pub mod home;
pub mod store_owner;
pub mod user;

use axum::{
    Router,
    response::Redirect,
    routing::{get, post},
};
use serde::Deserialize;

use crate::state::AppState;

/// Query parameters for error/success display.
#[derive(Debug, Default, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Query parameters for list pages with a search box.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl SearchQuery {
    /// Split off the banner messages.
    #[must_use]
    pub fn into_parts(self) -> (String, MessageQuery) {
        (
            self.q,
            MessageQuery {
                error: self.error,
                success: self.success,
            },
        )
    }
}

/// Redirect to `path` with a banner message in the query string.
///
/// `kind` is `error` or `success`.
#[must_use]
pub fn redirect_with(path: &str, kind: &str, message: &str) -> Redirect {
    let encoded: String = url::form_urlencoded::byte_serialize(message.as_bytes()).collect();
    Redirect::to(&format!("{path}?{kind}={encoded}"))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/logout", post(auth::logout))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/admin/dashboard") }))
        .route("/dashboard", get(admin::dashboard::show))
        .route(
            "/users",
            get(admin::users::index).post(admin::users::create),
        )
        .route("/users/new", get(admin::users::new))
        .route(
            "/users/{id}",
            get(admin::users::show).post(admin::users::update),
        )
        .route("/users/{id}/edit", get(admin::users::edit))
        .route("/users/{id}/delete", post(admin::users::delete))
        .route(
            "/stores",
            get(admin::stores::index).post(admin::stores::create),
        )
        .route("/stores/new", get(admin::stores::new))
        .route(
            "/stores/{id}",
            get(admin::stores::show).post(admin::stores::update),
        )
        .route("/stores/{id}/edit", get(admin::stores::edit))
        .route("/stores/{id}/delete", post(admin::stores::delete))
}

/// Create the store owner routes router.
pub fn store_owner_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/store/dashboard") }))
        .route("/dashboard", get(store_owner::dashboard))
}

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/user/dashboard") }))
        .route("/dashboard", get(user::dashboard))
        .route("/stores", get(user::stores))
        .route("/stores/{id}", get(user::store).post(user::rate))
}

/// Create all routes for the portal.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(home::health))
        .merge(auth_routes())
        .nest("/admin", admin_routes())
        .nest("/store", store_owner_routes())
        .nest("/user", user_routes())
        .nest("/api", api::routes())
}
