//! Landing page and health check.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use crate::filters;
use crate::middleware::OptionalUser;
use crate::routes::MessageQuery;
use crate::state::AppState;
use crate::views::{Page, StoreView};

const FEATURED_STORES: usize = 3;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: Page,
    pub featured: Vec<StoreView>,
    pub store_count: usize,
}

/// Landing page.
///
/// Logged-in visitors are sent to their role's dashboard.
#[instrument(skip(state, user))]
pub async fn home(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<MessageQuery>,
) -> Response {
    if let Some(user) = user {
        return Redirect::to(user.role.dashboard_path()).into_response();
    }

    let stores = state.db().stores();
    let featured = stores
        .top_rated(FEATURED_STORES)
        .await
        .iter()
        .map(StoreView::from)
        .collect();

    HomeTemplate {
        page: Page::new(None, query),
        featured,
        store_count: stores.count().await,
    }
    .into_response()
}

/// Liveness health check endpoint.
pub async fn health() -> &'static str {
    "ok"
}
