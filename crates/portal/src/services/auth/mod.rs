//! Authentication service.
//!
//! Password registration and login against the user repository, plus the
//! mapping from a stored user to the identity kept in the session.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use secrecy::{ExposeSecret, SecretString};

use store_ratings_core::session::SessionUser;
use store_ratings_core::validation::{FormMode, UserDraft, validate_user};
use store_ratings_core::{Email, Role, User};

use crate::db::{Database, NewUser, RepositoryError, StoreRepository, UserRepository};

/// Input for creating an account with a password.
#[derive(Debug)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub address: String,
    pub role: Role,
    pub password: SecretString,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    stores: StoreRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self {
            users: UserRepository::new(db),
            stores: StoreRepository::new(db),
        }
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Validation` if a field breaks the form rules.
    /// Returns `AuthError::UserAlreadyExists` if the email is already registered.
    pub async fn register(&self, account: NewAccount) -> Result<User, AuthError> {
        let draft = UserDraft {
            name: &account.name,
            email: &account.email,
            address: &account.address,
            password: Some(account.password.expose_secret()),
        };
        validate_user(&draft, FormMode::Create)
            .into_result()
            .map_err(AuthError::Validation)?;

        let email = Email::parse(&account.email)?;
        let password_hash = hash_password(account.password.expose_secret())?;

        self.users
            .create(NewUser {
                name: account.name,
                email,
                address: account.address,
                role: account.role,
                password_hash: Some(password_hash),
            })
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
                other => AuthError::Repository(other),
            })
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_password_hash(&email)
            .await
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password.expose_secret(), &password_hash)?;

        Ok(user)
    }

    /// Identity to keep in the session for `user`.
    ///
    /// Store owners carry the id of the first store they own.
    pub async fn session_user(&self, user: &User) -> SessionUser {
        let store_id = if user.role == Role::StoreOwner {
            self.stores.owned_by(user.id).await.first().map(|s| s.id)
        } else {
            None
        };

        SessionUser {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            store_id,
        }
    }
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
