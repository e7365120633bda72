//! Local session store and role guard.
//!
//! The logged-in user is kept as JSON under the fixed key [`USER_KEY`] in a
//! key/value [`SessionStorage`]; the bearer token sits beside it under
//! [`TOKEN_KEY`]. Whatever is stored there is the sole authority for "is
//! logged in" and "what role". There is no expiry or signature check.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::types::{Email, Role, StoreId, UserId};

/// Storage key of the serialized [`SessionUser`].
pub const USER_KEY: &str = "user";

/// Storage key of the bearer token.
pub const TOKEN_KEY: &str = "authToken";

/// Where unauthenticated or unauthorized visitors are sent.
pub const LOGIN_PATH: &str = "/login";

/// Identity of the logged-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
    /// Store managed by a store owner.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<StoreId>,
}

/// Errors from a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Errors from [`SessionStore`] writes.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// String key/value storage, in the manner of browser local storage.
///
/// Methods take `&self`; implementations handle their own interior
/// mutability.
pub trait SessionStorage {
    /// Read a value. Unreadable values are reported as absent.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot persist the value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a value. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot persist the removal.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage, used by tests and short-lived processes.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// Outcome of a role check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted(SessionUser),
    RedirectToLogin,
}

impl Access {
    #[must_use]
    pub const fn is_granted(&self) -> bool {
        matches!(self, Self::Granted(_))
    }
}

/// Grant access only when a session exists and its role is `required`.
#[must_use]
pub fn guard(stored: Option<SessionUser>, required: Role) -> Access {
    match stored {
        Some(user) if user.role == required => Access::Granted(user),
        _ => Access::RedirectToLogin,
    }
}

/// Typed view over a [`SessionStorage`].
#[derive(Debug, Default)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: SessionStorage> SessionStore<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Persist the logged-in user.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` if serialization or the storage write fails.
    pub fn save(&self, user: &SessionUser) -> Result<(), SessionError> {
        let json = serde_json::to_string(user)?;
        self.storage.set(USER_KEY, &json)?;
        Ok(())
    }

    /// The stored user, or `None` when absent or malformed.
    #[must_use]
    pub fn load(&self) -> Option<SessionUser> {
        let raw = self.storage.get(USER_KEY)?;
        serde_json::from_str(&raw).ok()
    }

    /// Forget the stored user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the storage write fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(USER_KEY)
    }

    /// Persist the bearer token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the storage write fails.
    pub fn save_token(&self, token: &str) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token)
    }

    /// The stored bearer token, if any.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    /// Logged in means a token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Remove both the user and the token.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if either removal fails.
    pub fn sign_out(&self) -> Result<(), StorageError> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)
    }

    /// Check the stored user against a required role.
    #[must_use]
    pub fn guard(&self, required: Role) -> Access {
        guard(self.load(), required)
    }
}
