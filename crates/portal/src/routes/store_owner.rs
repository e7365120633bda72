//! Store owner dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use tracing::instrument;

use crate::filters;
use crate::middleware::RequireStoreOwner;
use crate::routes::MessageQuery;
use crate::state::AppState;
use crate::views::{Page, RatingView, StoreView};

/// Count of ratings at one star value.
#[derive(Debug, Clone)]
pub struct Breakdown {
    pub value: u8,
    pub count: usize,
    pub percent: usize,
}

fn breakdown(ratings: &[RatingView]) -> Vec<Breakdown> {
    let total = ratings.len();
    (1..=5u8)
        .rev()
        .map(|value| {
            let count = ratings.iter().filter(|r| r.value == value).count();
            let percent = if total == 0 { 0 } else { count * 100 / total };
            Breakdown {
                value,
                count,
                percent,
            }
        })
        .collect()
}

/// Store owner dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "store/dashboard.html")]
pub struct StoreDashboardTemplate {
    pub page: Page,
    pub store: Option<StoreView>,
    pub raters: Vec<RatingView>,
    pub breakdown: Vec<Breakdown>,
    pub other_stores: Vec<StoreView>,
}

/// Dashboard for the owner's store: average, count and who rated it.
///
/// The store recorded in the session is shown first; any other stores the
/// owner has are listed below it.
#[instrument(skip(owner, state))]
pub async fn dashboard(
    RequireStoreOwner(owner): RequireStoreOwner,
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> impl IntoResponse {
    let db = state.db();
    let mut owned = db.stores().owned_by(owner.id).await;
    let position = owner
        .store_id
        .and_then(|id| owned.iter().position(|s| s.id == id))
        .unwrap_or(0);
    let store = (position < owned.len()).then(|| owned.remove(position));

    let raters: Vec<RatingView> = match &store {
        Some(store) => db
            .ratings()
            .for_store_with_users(store.id)
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| RatingView::new(&r.rating, &r.user.name, r.user.id.as_i32()))
            .collect(),
        None => Vec::new(),
    };

    StoreDashboardTemplate {
        page: Page::for_user(owner, query),
        store: store.as_ref().map(StoreView::from),
        breakdown: breakdown(&raters),
        raters,
        other_stores: owned.iter().map(StoreView::from).collect(),
    }
}
