//! Rated stores.

use serde::{Deserialize, Serialize};

use crate::types::{StoreCategory, StoreId, UserId};

/// A store as shown to clients.
///
/// `avg_rating` and `total_ratings` are derived from the store's ratings at
/// read time; they are never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub address: String,
    pub category: StoreCategory,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    pub owner_id: UserId,
    pub avg_rating: f64,
    pub total_ratings: u32,
}

/// Payload for creating a store (`POST /stores`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCreate {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub owner_id: Option<UserId>,
}

/// Partial update for a store (`PATCH /stores/:id`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<UserId>,
}

impl StoreUpdate {
    /// The full create-shaped payload this update would produce on `store`.
    #[must_use]
    pub fn merged(&self, store: &Store) -> StoreCreate {
        StoreCreate {
            name: self.name.clone().unwrap_or_else(|| store.name.clone()),
            address: self
                .address
                .clone()
                .unwrap_or_else(|| store.address.clone()),
            category: self
                .category
                .clone()
                .unwrap_or_else(|| store.category.name().to_owned()),
            phone: self.phone.clone().unwrap_or_else(|| store.phone.clone()),
            website: self
                .website
                .clone()
                .unwrap_or_else(|| store.website.clone()),
            owner_id: Some(self.owner_id.unwrap_or(store.owner_id)),
        }
    }
}
