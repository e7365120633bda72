//! Login, registration and the local session.

use secrecy::{ExposeSecret, SecretString};

use store_ratings_core::session::{SessionStorage, SessionUser};
use store_ratings_core::{AuthResponse, LoginRequest, RegisterRequest};

use crate::client::ApiClient;
use crate::error::Result;

/// Auth endpoints plus the session they fill in.
pub struct AuthService<'a, S> {
    client: &'a ApiClient<S>,
}

impl<'a, S: SessionStorage> AuthService<'a, S> {
    pub(crate) const fn new(client: &'a ApiClient<S>) -> Self {
        Self { client }
    }

    /// Log in and remember the token and user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 401 for bad credentials, or an
    /// error if the session cannot be written.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<SessionUser> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.expose_secret().to_string(),
        };
        let response: AuthResponse = self.client.post("/auth/login", &request).await?;
        self.remember(response)
    }

    /// Create an account, then remember it as logged in.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 422 (invalid fields) or 409
    /// (email taken), or an error if the session cannot be written.
    pub async fn register(&self, request: &RegisterRequest) -> Result<SessionUser> {
        let response: AuthResponse = self.client.post("/auth/register", request).await?;
        self.remember(response)
    }

    /// Revoke the token on the server, then forget the token and user.
    ///
    /// The local session is cleared even when the server call fails. A 401
    /// means the token was already dead and counts as success.
    ///
    /// # Errors
    ///
    /// Returns the server error for any other failed revocation, or an error
    /// if the session cannot be written.
    pub async fn logout(&self) -> Result<()> {
        let revoked = if self.is_authenticated() {
            self.client.post_empty("/auth/logout").await
        } else {
            Ok(())
        };

        self.client.session().sign_out()?;
        tracing::debug!("Session cleared");

        match revoked {
            Err(e) if e.status() != Some(401) => Err(e),
            _ => Ok(()),
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.client.session().is_authenticated()
    }

    #[must_use]
    pub fn current_user(&self) -> Option<SessionUser> {
        self.client.session().load()
    }

    fn remember(&self, response: AuthResponse) -> Result<SessionUser> {
        let session = self.client.session();
        session.save_token(&response.token)?;
        session.save(&response.user)?;
        tracing::debug!(user_id = %response.user.id, role = %response.user.role, "Session saved");
        Ok(response.user)
    }
}
