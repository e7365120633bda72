//! Portal users.

use serde::{Deserialize, Serialize};

use crate::types::{Email, Role, UserId};

/// A portal account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub address: String,
    pub role: Role,
    /// Number of distinct stores this user has rated.
    pub stores_rated: u32,
}

/// Payload for creating a user (admin form, `POST /users`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub role: Role,
    pub password: String,
}

/// Partial update for a user (`PATCH /users/:id`). Passwords are not editable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl UserUpdate {
    /// Overlay this update on an existing user's editable fields.
    ///
    /// Returns `(name, email, address, role)` as they would be after the
    /// update, for validation before anything is written.
    #[must_use]
    pub fn merged(&self, user: &User) -> (String, String, String, Role) {
        (
            self.name.clone().unwrap_or_else(|| user.name.clone()),
            self.email
                .clone()
                .unwrap_or_else(|| user.email.as_str().to_owned()),
            self.address.clone().unwrap_or_else(|| user.address.clone()),
            self.role.unwrap_or(user.role),
        )
    }
}
