//! `/ratings` endpoints.

use store_ratings_core::session::SessionStorage;
use store_ratings_core::{Rating, RatingCreate, RatingId, RatingUpdate};

use crate::client::ApiClient;
use crate::error::Result;

pub struct RatingService<'a, S> {
    client: &'a ApiClient<S>,
}

impl<'a, S: SessionStorage> RatingService<'a, S> {
    pub(crate) const fn new(client: &'a ApiClient<S>) -> Self {
        Self { client }
    }

    /// Rate a store as the logged-in user.
    ///
    /// Rating the same store again replaces the earlier rating.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 401 when logged out or 422 for a
    /// value outside 1 to 5.
    pub async fn submit(&self, rating: &RatingCreate) -> Result<Rating> {
        self.client.post("/ratings", rating).await
    }

    /// Change a rating. Only its author or an admin may do this.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Api` with status 403 for someone else's rating.
    pub async fn update(&self, id: RatingId, update: &RatingUpdate) -> Result<Rating> {
        self.client.patch(&format!("/ratings/{id}"), update).await
    }

    /// Delete a rating. Only its author or an admin may do this.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    pub async fn delete(&self, id: RatingId) -> Result<()> {
        self.client.delete(&format!("/ratings/{id}")).await
    }
}
