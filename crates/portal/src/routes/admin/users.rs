//! Admin user management route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tracing::instrument;

use store_ratings_core::validation::{FormMode, UserDraft, validate_user};
use store_ratings_core::{Email, Role, User, UserId};

use crate::db::{RepositoryError, UserChanges};
use crate::filters;
use crate::middleware::RequireAdmin;
use crate::routes::{MessageQuery, SearchQuery, redirect_with};
use crate::services::auth::{AuthError, AuthService, NewAccount};
use crate::state::AppState;
use crate::views::{FormErrors, Page, RatingView, SelectOption, StoreView, UserView};

const USERS_PATH: &str = "/admin/users";

// =============================================================================
// Form Types
// =============================================================================

/// User form data. The password is only read when creating.
#[derive(Debug, Default, Deserialize)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub password: Option<String>,
}

impl UserForm {
    fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.to_string(),
            address: user.address.clone(),
            role: user.role.as_str().to_string(),
            password: None,
        }
    }

    fn draft(&self) -> UserDraft<'_> {
        UserDraft {
            name: &self.name,
            email: self.email.trim(),
            address: &self.address,
            password: self.password.as_deref(),
        }
    }
}

fn role_options(selected: &str) -> Vec<SelectOption> {
    Role::ALL
        .iter()
        .map(|role| SelectOption::new(role.as_str(), role.label(), selected))
        .collect()
}

// =============================================================================
// Templates
// =============================================================================

/// User list template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/users/index.html")]
pub struct UsersIndexTemplate {
    pub page: Page,
    pub query: String,
    pub users: Vec<UserView>,
}

/// User create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/users/form.html")]
pub struct UserFormTemplate {
    pub page: Page,
    pub title: String,
    pub action: String,
    pub is_new: bool,
    pub name: String,
    pub email: String,
    pub address: String,
    pub roles: Vec<SelectOption>,
    pub errors: FormErrors,
}

impl UserFormTemplate {
    fn new(page: Page, target: Option<UserId>, form: &UserForm, errors: FormErrors) -> Self {
        let (title, action) = match target {
            Some(id) => ("Edit User".to_string(), format!("{USERS_PATH}/{id}")),
            None => ("Add User".to_string(), USERS_PATH.to_string()),
        };
        Self {
            page,
            title,
            action,
            is_new: target.is_none(),
            name: form.name.clone(),
            email: form.email.clone(),
            address: form.address.clone(),
            roles: role_options(&form.role),
            errors,
        }
    }
}

/// User details template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/users/show.html")]
pub struct UserShowTemplate {
    pub page: Page,
    pub user: UserView,
    pub ratings: Vec<RatingView>,
    pub stores: Vec<StoreView>,
}

// =============================================================================
// Handlers
// =============================================================================

/// User list with optional `?q=` search.
#[instrument(skip(admin, state))]
pub async fn index(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Response {
    let (term, messages) = query.into_parts();
    let users = state
        .db()
        .users()
        .search(&term)
        .await
        .iter()
        .map(UserView::from)
        .collect();

    UsersIndexTemplate {
        page: Page::for_user(admin, messages),
        query: term,
        users,
    }
    .into_response()
}

/// Blank user form.
pub async fn new(RequireAdmin(admin): RequireAdmin) -> Response {
    let form = UserForm {
        role: Role::User.as_str().to_string(),
        ..UserForm::default()
    };
    UserFormTemplate::new(
        Page::for_user(admin, MessageQuery::default()),
        None,
        &form,
        FormErrors::default(),
    )
    .into_response()
}

/// Create a user from the admin form.
#[instrument(skip(admin, state, form), fields(email = %form.email))]
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Form(form): Form<UserForm>,
) -> Response {
    let errors = validate_user(&form.draft(), FormMode::Create);
    if !errors.is_empty() {
        let page = Page::for_user(admin, MessageQuery::default());
        let template = UserFormTemplate::new(page, None, &form, errors.into());
        return (StatusCode::UNPROCESSABLE_ENTITY, template).into_response();
    }

    let Ok(role) = form.role.parse::<Role>() else {
        return redirect_with(&format!("{USERS_PATH}/new"), "error", "Unknown role")
            .into_response();
    };

    let account = NewAccount {
        name: form.name.clone(),
        email: form.email.trim().to_string(),
        address: form.address.clone(),
        role,
        password: SecretString::from(form.password.clone().unwrap_or_default()),
    };

    match AuthService::new(state.db()).register(account).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, role = %user.role, "User created by admin");
            redirect_with(USERS_PATH, "success", "User created successfully").into_response()
        }
        Err(AuthError::Validation(errors)) => {
            let page = Page::for_user(admin, MessageQuery::default());
            let template = UserFormTemplate::new(page, None, &form, errors.into());
            (StatusCode::UNPROCESSABLE_ENTITY, template).into_response()
        }
        Err(AuthError::UserAlreadyExists) => {
            let page = Page::with_error(Some(admin), "A user with this email already exists");
            let template = UserFormTemplate::new(page, None, &form, FormErrors::default());
            (StatusCode::CONFLICT, template).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to create user: {}", e);
            redirect_with(USERS_PATH, "error", "Could not create user").into_response()
        }
    }
}

/// User details with their ratings (and stores, for owners).
#[instrument(skip(admin, state))]
pub async fn show(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Query(query): Query<MessageQuery>,
) -> Response {
    let db = state.db();
    let Ok(user) = db.users().get(id).await else {
        return redirect_with(USERS_PATH, "error", "User not found").into_response();
    };

    let ratings = db
        .ratings()
        .for_user_with_stores(id)
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| RatingView::new(&r.rating, &r.store.name, r.store.id.as_i32()))
        .collect();

    let stores = if user.role == Role::StoreOwner {
        db.stores().owned_by(id).await.iter().map(StoreView::from).collect()
    } else {
        Vec::new()
    };

    UserShowTemplate {
        page: Page::for_user(admin, query),
        user: UserView::from(&user),
        ratings,
        stores,
    }
    .into_response()
}

/// Edit form prefilled with the user's current profile.
pub async fn edit(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Response {
    match state.db().users().get(id).await {
        Ok(user) => UserFormTemplate::new(
            Page::for_user(admin, MessageQuery::default()),
            Some(id),
            &UserForm::from_user(&user),
            FormErrors::default(),
        )
        .into_response(),
        Err(_) => redirect_with(USERS_PATH, "error", "User not found").into_response(),
    }
}

/// Save an edited user. The password is never validated or changed here.
#[instrument(skip(admin, state, form))]
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
    Form(form): Form<UserForm>,
) -> Response {
    let errors = validate_user(&form.draft(), FormMode::Edit);
    if !errors.is_empty() {
        let page = Page::for_user(admin, MessageQuery::default());
        let template = UserFormTemplate::new(page, Some(id), &form, errors.into());
        return (StatusCode::UNPROCESSABLE_ENTITY, template).into_response();
    }

    let (Ok(email), Ok(role)) = (Email::parse(form.email.trim()), form.role.parse::<Role>())
    else {
        let path = format!("{USERS_PATH}/{id}/edit");
        return redirect_with(&path, "error", "Invalid email or role").into_response();
    };

    let changes = UserChanges {
        name: form.name.clone(),
        email,
        address: form.address.clone(),
        role,
    };

    match state.db().users().update(id, changes).await {
        Ok(user) => {
            tracing::info!(user_id = %user.id, "User updated by admin");
            redirect_with(&format!("{USERS_PATH}/{id}"), "success", "User updated successfully")
                .into_response()
        }
        Err(RepositoryError::NotFound) => {
            redirect_with(USERS_PATH, "error", "User not found").into_response()
        }
        Err(RepositoryError::Conflict(message)) => {
            let page = Page::with_error(Some(admin), message);
            let template = UserFormTemplate::new(page, Some(id), &form, FormErrors::default());
            (StatusCode::CONFLICT, template).into_response()
        }
    }
}

/// Delete a user and their ratings.
#[instrument(skip(admin, state))]
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<UserId>,
) -> Response {
    if id == admin.id {
        return redirect_with(USERS_PATH, "error", "You cannot delete your own account")
            .into_response();
    }

    match state.db().users().delete(id).await {
        Ok(()) => {
            state.tokens().revoke_user(id).await;
            tracing::info!(user_id = %id, "User deleted by admin");
            redirect_with(USERS_PATH, "success", "User deleted successfully").into_response()
        }
        Err(RepositoryError::NotFound) => {
            redirect_with(USERS_PATH, "error", "User not found").into_response()
        }
        Err(RepositoryError::Conflict(message)) => {
            redirect_with(USERS_PATH, "error", &message).into_response()
        }
    }
}
