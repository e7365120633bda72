//! Admin store management route handlers.

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

use store_ratings_core::validation::FieldErrors;
use store_ratings_core::{Store, StoreCategory, StoreCreate, StoreId, UserId};

use crate::db::RepositoryError;
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::{MessageQuery, SearchQuery, redirect_with};
use crate::services::stores::StoreService;
use crate::state::AppState;
use crate::views::{FormErrors, Page, RatingView, SelectOption, StoreView, UserView};

const STORES_PATH: &str = "/admin/stores";

// =============================================================================
// Form Types
// =============================================================================

/// Store form data.
///
/// `owner_id` is kept as text so an unselected picker (`""`) reaches the
/// validator instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
pub struct StoreForm {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub owner_id: String,
}

impl StoreForm {
    fn from_store(store: &Store) -> Self {
        Self {
            name: store.name.clone(),
            address: store.address.clone(),
            category: store.category.name().to_string(),
            phone: store.phone.clone(),
            website: store.website.clone(),
            owner_id: store.owner_id.to_string(),
        }
    }

    fn to_input(&self) -> StoreCreate {
        StoreCreate {
            name: self.name.clone(),
            address: self.address.clone(),
            category: self.category.clone(),
            phone: self.phone.clone(),
            website: self.website.clone(),
            owner_id: self.owner_id.trim().parse::<i32>().ok().map(UserId::new),
        }
    }
}

// =============================================================================
// Templates
// =============================================================================

/// Store list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/stores/index.html")]
pub struct StoresIndexTemplate {
    pub page: Page,
    pub query: String,
    pub stores: Vec<StoreView>,
}

/// Store create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/stores/form.html")]
pub struct StoreFormTemplate {
    pub page: Page,
    pub title: String,
    pub action: String,
    pub is_new: bool,
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub categories: Vec<SelectOption>,
    pub owners: Vec<SelectOption>,
    pub errors: FormErrors,
}

/// Store details template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/stores/show.html")]
pub struct StoreShowTemplate {
    pub page: Page,
    pub store: StoreView,
    pub owner: Option<UserView>,
    pub ratings: Vec<RatingView>,
}

async fn form_template(
    state: &AppState,
    page: Page,
    target: Option<StoreId>,
    form: &StoreForm,
    errors: FieldErrors,
) -> StoreFormTemplate {
    let (title, action) = match target {
        Some(id) => ("Edit Store".to_string(), format!("{STORES_PATH}/{id}")),
        None => ("Add Store".to_string(), STORES_PATH.to_string()),
    };

    let category = form.category.trim();
    let categories = StoreCategory::ALL
        .iter()
        .map(|c| SelectOption::new(c.name(), c.name(), category))
        .collect();

    let owner = form.owner_id.trim();
    let owners = state
        .db()
        .users()
        .store_owners()
        .await
        .iter()
        .map(|u| SelectOption::new(u.id.to_string(), format!("{} ({})", u.name, u.email), owner))
        .collect();

    StoreFormTemplate {
        page,
        title,
        action,
        is_new: target.is_none(),
        name: form.name.clone(),
        address: form.address.clone(),
        phone: form.phone.clone(),
        website: form.website.clone(),
        categories,
        owners,
        errors: errors.into(),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Store list with optional `?q=` search.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let (term, messages) = query.into_parts();
    let stores = state
        .db()
        .stores()
        .search(&term)
        .await
        .iter()
        .map(StoreView::from)
        .collect();

    StoresIndexTemplate {
        page: Page::for_user(admin, messages),
        query: term,
        stores,
    }
    .into_response()
}

/// Blank store form.
pub async fn new(RequireAdmin(admin): RequireAdmin, State(state): State<AppState>) -> Response {
    let page = Page::for_user(admin, MessageQuery::default());
    let template =
        form_template(&state, page, None, &StoreForm::default(), FieldErrors::new()).await;
    template.into_response()
}

/// Create a store from the admin form.
#[instrument(skip(admin, state, form), fields(name = %form.name))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<StoreForm>,
) -> Response {
    let new_store = match StoreService::new(state.db()).prepare(&form.to_input()).await {
        Ok(new_store) => new_store,
        Err(errors) => {
            let page = Page::for_user(admin, MessageQuery::default());
            let template = form_template(&state, page, None, &form, errors).await;
            return (StatusCode::UNPROCESSABLE_ENTITY, template).into_response();
        }
    };

    match state.db().stores().create(new_store).await {
        Ok(store) => {
            tracing::info!(store_id = %store.id, "Store created by admin");
            redirect_with(STORES_PATH, "success", "Store created successfully").into_response()
        }
        Err(e) => {
            tracing::warn!("Failed to create store: {}", e);
            redirect_with(STORES_PATH, "error", "Could not create store").into_response()
        }
    }
}

/// Store details with owner and reviews.
#[instrument(skip(admin, state))]
pub async fn show(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
    Query(query): Query<MessageQuery>,
) -> Response {
    let db = state.db();
    let Ok(store) = db.stores().get(id).await else {
        return redirect_with(STORES_PATH, "error", "Store not found").into_response();
    };

    let owner = db.users().get(store.owner_id).await.ok();
    let ratings = db
        .ratings()
        .for_store_with_users(id)
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| RatingView::new(&r.rating, &r.user.name, r.user.id.as_i32()))
        .collect();

    StoreShowTemplate {
        page: Page::for_user(admin, query),
        store: StoreView::from(&store),
        owner: owner.as_ref().map(UserView::from),
        ratings,
    }
    .into_response()
}

/// Edit form prefilled with the store's current details.
pub async fn edit(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
) -> Response {
    let Ok(store) = state.db().stores().get(id).await else {
        return redirect_with(STORES_PATH, "error", "Store not found").into_response();
    };

    let page = Page::for_user(admin, MessageQuery::default());
    let form = StoreForm::from_store(&store);
    form_template(&state, page, Some(id), &form, FieldErrors::new()).await.into_response()
}

/// Save an edited store.
#[instrument(skip(admin, state, form))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
    Form(form): Form<StoreForm>,
) -> Response {
    let new_store = match StoreService::new(state.db()).prepare(&form.to_input()).await {
        Ok(new_store) => new_store,
        Err(errors) => {
            let page = Page::for_user(admin, MessageQuery::default());
            let template = form_template(&state, page, Some(id), &form, errors).await;
            return (StatusCode::UNPROCESSABLE_ENTITY, template).into_response();
        }
    };

    match state.db().stores().update(id, new_store).await {
        Ok(store) => {
            tracing::info!(store_id = %store.id, "Store updated by admin");
            let path = format!("{STORES_PATH}/{id}");
            redirect_with(&path, "success", "Store updated successfully").into_response()
        }
        Err(RepositoryError::NotFound) => {
            redirect_with(STORES_PATH, "error", "Store not found").into_response()
        }
        Err(RepositoryError::Conflict(message)) => {
            let page = Page::with_error(Some(admin), message);
            let template = form_template(&state, page, Some(id), &form, FieldErrors::new()).await;
            (StatusCode::CONFLICT, template).into_response()
        }
    }
}

/// Delete a store and its ratings.
#[instrument(skip(_admin, state))]
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<StoreId>,
) -> Response {
    match state.db().stores().delete(id).await {
        Ok(()) => {
            tracing::info!(store_id = %id, "Store deleted by admin");
            redirect_with(STORES_PATH, "success", "Store deleted successfully").into_response()
        }
        Err(e) => {
            tracing::warn!(store_id = %id, "Failed to delete store: {}", e);
            redirect_with(STORES_PATH, "error", "Store not found").into_response()
        }
    }
}
