//! End-user area: dashboard, store browsing and rating.

use std::collections::HashMap;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use store_ratings_core::session::SessionUser;
use store_ratings_core::validation::{FieldErrors, validate_rating};
use store_ratings_core::{RatingValue, StoreId};

use crate::filters;
use crate::middleware::RequireUser;
use crate::routes::{MessageQuery, SearchQuery, redirect_with};
use crate::state::AppState;
use crate::views::{FormErrors, Page, RatingView, SelectOption, StoreView};

const TOP_RATED: usize = 5;
const RECENT_RATINGS: usize = 5;

/// Rating form data.
#[derive(Debug, Default, Deserialize)]
pub struct RateForm {
    #[serde(default)]
    pub rating: String,
    #[serde(default)]
    pub comment: String,
}

/// Store listing row with the viewer's own rating.
#[derive(Debug, Clone)]
pub struct StoreListItem {
    pub store: StoreView,
    pub my_rating: Option<u8>,
}

// =============================================================================
// Templates
// =============================================================================

/// User dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "user/dashboard.html")]
pub struct UserDashboardTemplate {
    pub page: Page,
    pub stores_rated: usize,
    pub recent: Vec<RatingView>,
    pub top_rated: Vec<StoreView>,
}

/// Store listing template.
#[derive(Template, WebTemplate)]
#[template(path = "user/stores.html")]
pub struct StoresTemplate {
    pub page: Page,
    pub query: String,
    pub stores: Vec<StoreListItem>,
}

/// Store details template with the rating form.
#[derive(Template, WebTemplate)]
#[template(path = "user/store.html")]
pub struct StoreTemplate {
    pub page: Page,
    pub store: StoreView,
    pub reviews: Vec<RatingView>,
    pub has_rated: bool,
    pub choices: Vec<SelectOption>,
    pub comment: String,
    pub errors: FormErrors,
}

fn rating_choices(selected: &str) -> Vec<SelectOption> {
    (RatingValue::MIN..=RatingValue::MAX)
        .rev()
        .filter_map(|v| RatingValue::new(i64::from(v)).ok())
        .map(|v| SelectOption::new(v.to_string(), format!("{v} - {}", v.label()), selected))
        .collect()
}

async fn store_template(
    state: &AppState,
    user: SessionUser,
    store_id: StoreId,
    query: MessageQuery,
    form: Option<&RateForm>,
    errors: FieldErrors,
) -> Option<StoreTemplate> {
    let db = state.db();
    let store = db.stores().get(store_id).await.ok()?;
    let reviews = db
        .ratings()
        .for_store_with_users(store_id)
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| RatingView::new(&r.rating, &r.user.name, r.user.id.as_i32()))
        .collect();

    let mine = db.ratings().find(user.id, store_id).await;
    let (selected, comment) = match (form, &mine) {
        (Some(form), _) => (form.rating.clone(), form.comment.clone()),
        (None, Some(rating)) => (
            rating.rating.to_string(),
            rating.comment.clone().unwrap_or_default(),
        ),
        (None, None) => (String::new(), String::new()),
    };

    Some(StoreTemplate {
        page: Page::for_user(user, query),
        store: StoreView::from(&store),
        reviews,
        has_rated: mine.is_some(),
        choices: rating_choices(&selected),
        comment,
        errors: errors.into(),
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// User dashboard: own recent ratings and the best-rated stores.
#[instrument(skip(user, state))]
pub async fn dashboard(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
) -> Response {
    let db = state.db();
    let mine = db.ratings().for_user_with_stores(user.id).await.unwrap_or_default();
    let recent = mine
        .iter()
        .take(RECENT_RATINGS)
        .map(|r| RatingView::new(&r.rating, &r.store.name, r.store.id.as_i32()))
        .collect();
    let top_rated = db
        .stores()
        .top_rated(TOP_RATED)
        .await
        .iter()
        .map(StoreView::from)
        .collect();

    UserDashboardTemplate {
        page: Page::for_user(user, query),
        stores_rated: mine.len(),
        recent,
        top_rated,
    }
    .into_response()
}

/// Store listing with optional `?q=` search and the viewer's own ratings.
#[instrument(skip(user, state))]
pub async fn stores(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let (term, messages) = query.into_parts();
    let db = state.db();
    let mine: HashMap<StoreId, u8> = db
        .ratings()
        .for_user(user.id)
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| (r.store_id, r.rating.get()))
        .collect();

    let stores = db
        .stores()
        .search(&term)
        .await
        .iter()
        .map(|store| StoreListItem {
            store: StoreView::from(store),
            my_rating: mine.get(&store.id).copied(),
        })
        .collect();

    StoresTemplate {
        page: Page::for_user(user, messages),
        query: term,
        stores,
    }
    .into_response()
}

/// Store details, reviews and the rating form.
#[instrument(skip(user, state))]
pub async fn store(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
    Query(query): Query<MessageQuery>,
) -> Response {
    match store_template(&state, user, id, query, None, FieldErrors::new()).await {
        Some(template) => template.into_response(),
        None => redirect_with("/user/stores", "error", "Store not found").into_response(),
    }
}

/// Submit or update the viewer's rating of a store.
#[instrument(skip(user, state, form))]
pub async fn rate(
    RequireUser(user): RequireUser,
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
    Form(form): Form<RateForm>,
) -> Response {
    let raw = form.rating.trim().parse::<i64>().unwrap_or(0);
    let value = match validate_rating(raw) {
        Ok(value) => value,
        Err(errors) => {
            let query = MessageQuery::default();
            return match store_template(&state, user, id, query, Some(&form), errors).await {
                Some(template) => (StatusCode::UNPROCESSABLE_ENTITY, template).into_response(),
                None => redirect_with("/user/stores", "error", "Store not found").into_response(),
            };
        }
    };

    match state.db().ratings().upsert(user.id, id, value, Some(form.comment)).await {
        Ok((rating, created)) => {
            tracing::info!(rating_id = %rating.id, store_id = %id, created, "Rating saved");
            let message = if created {
                "Your rating has been submitted"
            } else {
                "Your rating has been updated"
            };
            redirect_with(&format!("/user/stores/{id}"), "success", message).into_response()
        }
        Err(e) => {
            tracing::warn!(store_id = %id, "Failed to save rating: {}", e);
            redirect_with("/user/stores", "error", "Store not found").into_response()
        }
    }
}
