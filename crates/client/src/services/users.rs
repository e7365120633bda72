//! `/users` endpoints.

use store_ratings_core::session::SessionStorage;
use store_ratings_core::{Rating, User, UserCreate, UserId, UserUpdate};

use super::search_query;
use crate::client::ApiClient;
use crate::error::Result;

pub struct UserService<'a, S> {
    client: &'a ApiClient<S>,
}

impl<'a, S: SessionStorage> UserService<'a, S> {
    pub(crate) const fn new(client: &'a ApiClient<S>) -> Self {
        Self { client }
    }

    /// All users, or those matching `search` on name, email or address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<User>> {
        self.client.get("/users", &search_query(search)).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 404 for an unknown id.
    pub async fn get(&self, id: UserId) -> Result<User> {
        self.client.get(&format!("/users/{id}"), &[]).await
    }

    /// Create a user. Requires an admin session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 401/403 without an admin token,
    /// 422 for invalid fields or 409 for a taken email.
    pub async fn create(&self, user: &UserCreate) -> Result<User> {
        self.client.post("/users", user).await
    }

    /// Apply a partial update. Requires an admin session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    pub async fn update(&self, id: UserId, update: &UserUpdate) -> Result<User> {
        self.client.patch(&format!("/users/{id}"), update).await
    }

    /// Delete a user and their ratings. Requires an admin session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    pub async fn delete(&self, id: UserId) -> Result<()> {
        self.client.delete(&format!("/users/{id}")).await
    }

    /// Ratings submitted by a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn ratings(&self, id: UserId) -> Result<Vec<Rating>> {
        self.client.get(&format!("/users/{id}/ratings"), &[]).await
    }
}
