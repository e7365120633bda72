//! Admin dashboard route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::db::Activity;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::MessageQuery;
use crate::state::AppState;
use crate::views::Page;

const RECENT_ACTIVITY: usize = 10;

/// Activity entry for templates.
#[derive(Debug, Clone)]
pub struct ActivityView {
    pub kind: &'static str,
    pub action: String,
    pub when: String,
}

impl From<&Activity> for ActivityView {
    fn from(activity: &Activity) -> Self {
        Self {
            kind: activity.kind.as_str(),
            action: activity.action.clone(),
            when: activity.at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Admin dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub page: Page,
    pub total_users: usize,
    pub total_stores: usize,
    pub total_ratings: usize,
    pub activity: Vec<ActivityView>,
}

/// Admin dashboard: totals and recent activity.
#[instrument(skip(admin, state))]
pub async fn show(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let db = state.db();
    let activity = db
        .activity()
        .recent(RECENT_ACTIVITY)
        .await
        .iter()
        .map(ActivityView::from)
        .collect();

    AdminDashboardTemplate {
        page: Page::for_user(admin, query),
        total_users: db.users().count().await,
        total_stores: db.stores().count().await,
        total_ratings: db.ratings().count().await,
        activity,
    }
}
