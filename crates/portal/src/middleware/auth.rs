//! Role guards for the HTML dashboards.
//!
//! Each role area (`/admin`, `/store`, `/user`) is protected by an extractor
//! that reads the [`SessionUser`] stored under the `user` session key and
//! checks its role. A missing, malformed or mismatched session sends the
//! visitor to the login page; under `/api/` the rejection is a bare 401.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use secrecy::SecretString;
use tower_sessions::Session;

use store_ratings_core::Role;
use store_ratings_core::session::{Access, LOGIN_PATH, SessionUser, TOKEN_KEY, USER_KEY, guard};

/// Error returned when a role guard rejects the request.
#[derive(Debug)]
pub enum RoleRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
}

impl IntoResponse for RoleRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// Read the session user, treating unreadable data as logged out.
async fn session_user(parts: &Parts) -> Option<SessionUser> {
    let session = parts.extensions.get::<Session>()?;
    match session.get::<SessionUser>(USER_KEY).await {
        Ok(user) => user,
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring unreadable session user");
            None
        }
    }
}

async fn require_role(parts: &Parts, role: Role) -> Result<SessionUser, RoleRejection> {
    match guard(session_user(parts).await, role) {
        Access::Granted(user) => Ok(user),
        Access::RedirectToLogin => {
            tracing::debug!(path = %parts.uri.path(), required = %role, "Role guard rejected request");
            if parts.uri.path().starts_with("/api/") {
                Err(RoleRejection::Unauthorized)
            } else {
                Err(RoleRejection::RedirectToLogin)
            }
        }
    }
}

macro_rules! role_guard {
    ($(#[$meta:meta])* $name:ident => $role:expr) => {
        $(#[$meta])*
        pub struct $name(pub SessionUser);

        impl<S> FromRequestParts<S> for $name
        where
            S: Send + Sync,
        {
            type Rejection = RoleRejection;

            async fn from_request_parts(
                parts: &mut Parts,
                _state: &S,
            ) -> Result<Self, Self::Rejection> {
                require_role(parts, $role).await.map(Self)
            }
        }
    };
}

role_guard!(
    /// Extractor that requires a session with the `admin` role.
    RequireAdmin => Role::Admin
);

role_guard!(
    /// Extractor that requires a session with the `store_owner` role.
    RequireStoreOwner => Role::StoreOwner
);

role_guard!(
    /// Extractor that requires a session with the `user` role.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// async fn dashboard(RequireUser(user): RequireUser) -> impl IntoResponse {
    ///     format!("Hello, {}!", user.name)
    /// }
    /// ```
    RequireUser => Role::User
);

/// Extractor that optionally gets the current session user.
///
/// Unlike the role guards, this never rejects the request.
pub struct OptionalUser(pub Option<SessionUser>);

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_user(parts).await))
    }
}

/// Store the logged-in user and their API token in the session.
///
/// The session id is rotated to prevent fixation.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &SessionUser,
    token: &SecretString,
) -> Result<(), tower_sessions::session::Error> {
    use secrecy::ExposeSecret;

    session.cycle_id().await?;
    session.insert(USER_KEY, user).await?;
    session.insert(TOKEN_KEY, token.expose_secret()).await
}

/// Clear the session (logout), returning the API token it held.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(
    session: &Session,
) -> Result<Option<SecretString>, tower_sessions::session::Error> {
    let token = session.remove::<String>(TOKEN_KEY).await?;
    session.flush().await?;
    Ok(token.map(SecretString::from))
}
