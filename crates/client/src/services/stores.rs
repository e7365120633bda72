//! `/stores` endpoints.

use store_ratings_core::session::SessionStorage;
use store_ratings_core::{Rating, Store, StoreCreate, StoreId, StoreUpdate};

use super::search_query;
use crate::client::ApiClient;
use crate::error::Result;

pub struct StoreService<'a, S> {
    client: &'a ApiClient<S>,
}

impl<'a, S: SessionStorage> StoreService<'a, S> {
    pub(crate) const fn new(client: &'a ApiClient<S>) -> Self {
        Self { client }
    }

    /// All stores, or those matching `search` on name, address or category.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn list(&self, search: Option<&str>) -> Result<Vec<Store>> {
        self.client.get("/stores", &search_query(search)).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 404 for an unknown id.
    pub async fn get(&self, id: StoreId) -> Result<Store> {
        self.client.get(&format!("/stores/{id}"), &[]).await
    }

    /// Create a store. Requires an admin session.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 422 when the name, category or
    /// owner is invalid.
    pub async fn create(&self, store: &StoreCreate) -> Result<Store> {
        self.client.post("/stores", store).await
    }

    /// Apply a partial update. Requires an admin session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    pub async fn update(&self, id: StoreId, update: &StoreUpdate) -> Result<Store> {
        self.client.patch(&format!("/stores/{id}"), update).await
    }

    /// Delete a store and its ratings. Requires an admin session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    pub async fn delete(&self, id: StoreId) -> Result<()> {
        self.client.delete(&format!("/stores/{id}")).await
    }

    /// Ratings of a store, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn ratings(&self, id: StoreId) -> Result<Vec<Rating>> {
        self.client.get(&format!("/stores/{id}/ratings"), &[]).await
    }
}
