//! Authentication route handlers.
//!
//! Login, signup and logout for the HTML portal. A successful login stores
//! the session user and an API token in the session, then sends the visitor
//! to their role's dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use store_ratings_core::validation::{UserDraft, validate_signup};
use store_ratings_core::{Role, User};

use crate::error::{clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{OptionalUser, clear_current_user, set_current_user};
use crate::routes::{MessageQuery, redirect_with};
use crate::services::auth::{AuthError, AuthService, NewAccount};
use crate::services::seed::{DEMO_ACCOUNTS, DemoAccount};
use crate::state::AppState;
use crate::views::{FormErrors, Page};

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Signup form data.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub address: String,
    pub password: String,
    pub confirm_password: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: Page,
    pub email: String,
    pub demo_accounts: Vec<DemoAccount>,
}

/// Signup page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/signup.html")]
pub struct SignupTemplate {
    pub page: Page,
    pub name: String,
    pub email: String,
    pub address: String,
    pub errors: FormErrors,
}

impl SignupTemplate {
    fn from_form(form: &SignupForm, page: Page, errors: FormErrors) -> Self {
        Self {
            page,
            name: form.name.clone(),
            email: form.email.clone(),
            address: form.address.clone(),
            errors,
        }
    }
}

fn login_template(state: &AppState, page: Page, email: String) -> LoginTemplate {
    let demo_accounts = if state.config().seed_demo_data {
        DEMO_ACCOUNTS.to_vec()
    } else {
        Vec::new()
    };
    LoginTemplate {
        page,
        email,
        demo_accounts,
    }
}

/// Put `user` into the session with a fresh API token.
async fn start_session(state: &AppState, session: &Session, user: &User) -> Response {
    let session_user = AuthService::new(state.db()).session_user(user).await;
    let token = state.tokens().issue(user.id).await;

    if let Err(e) = set_current_user(session, &session_user, &token).await {
        tracing::error!("Failed to set session: {}", e);
        state.tokens().revoke(&token).await;
        return redirect_with("/login", "error", "Could not start your session").into_response();
    }

    set_sentry_user(&user.id, Some(user.email.as_str()));
    tracing::info!(user_id = %user.id, role = %user.role, "User logged in");
    Redirect::to(user.role.dashboard_path()).into_response()
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    Query(query): Query<MessageQuery>,
) -> Response {
    if let Some(user) = user {
        return Redirect::to(user.role.dashboard_path()).into_response();
    }
    login_template(&state, Page::new(None, query), String::new()).into_response()
}

/// Handle login form submission.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let password = SecretString::from(form.password);
    match AuthService::new(state.db())
        .login(form.email.trim(), &password)
        .await
    {
        Ok(user) => start_session(&state, &session, &user).await,
        Err(e) => {
            tracing::warn!("Login failed: {}", e);
            let page = Page::with_error(None, "Invalid email or password");
            (StatusCode::UNAUTHORIZED, login_template(&state, page, form.email)).into_response()
        }
    }
}

// =============================================================================
// Signup Routes
// =============================================================================

/// Display the signup page.
pub async fn signup_page(
    OptionalUser(user): OptionalUser,
    Query(query): Query<MessageQuery>,
) -> Response {
    if let Some(user) = user {
        return Redirect::to(user.role.dashboard_path()).into_response();
    }
    SignupTemplate {
        page: Page::new(None, query),
        name: String::new(),
        email: String::new(),
        address: String::new(),
        errors: FormErrors::default(),
    }
    .into_response()
}

/// Handle signup form submission.
///
/// New accounts always get the `user` role and are logged in straight away.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Response {
    let draft = UserDraft {
        name: &form.name,
        email: form.email.trim(),
        address: &form.address,
        password: Some(&form.password),
    };
    let errors = validate_signup(&draft, &form.confirm_password);
    if !errors.is_empty() {
        tracing::debug!(errors = %errors, "Signup form rejected");
        let template = SignupTemplate::from_form(&form, Page::default(), errors.into());
        return (StatusCode::UNPROCESSABLE_ENTITY, template).into_response();
    }

    let account = NewAccount {
        name: form.name.clone(),
        email: form.email.trim().to_string(),
        address: form.address.clone(),
        role: Role::User,
        password: SecretString::from(form.password.clone()),
    };

    match AuthService::new(state.db()).register(account).await {
        Ok(user) => start_session(&state, &session, &user).await,
        Err(AuthError::UserAlreadyExists) => {
            let page = Page::with_error(None, "An account with this email already exists");
            let template = SignupTemplate::from_form(&form, page, FormErrors::default());
            (StatusCode::CONFLICT, template).into_response()
        }
        Err(AuthError::Validation(errors)) => {
            let template = SignupTemplate::from_form(&form, Page::default(), errors.into());
            (StatusCode::UNPROCESSABLE_ENTITY, template).into_response()
        }
        Err(e) => {
            tracing::error!("Signup failed: {}", e);
            redirect_with("/signup", "error", "Could not create your account").into_response()
        }
    }
}

// =============================================================================
// Logout
// =============================================================================

/// Handle logout: clear the session and revoke its API token.
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    match clear_current_user(&session).await {
        Ok(Some(token)) => {
            state.tokens().revoke(&token).await;
            tracing::debug!("Session token revoked");
        }
        Ok(None) => {}
        Err(e) => tracing::error!("Failed to clear session: {}", e),
    }
    clear_sentry_user();
    redirect_with("/login", "success", "You have been logged out").into_response()
}
