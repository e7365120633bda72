//! In-memory data store for the portal.
//!
//! # Tables
//!
//! - `users` - Accounts with role and optional password hash
//! - `stores` - Stores, each owned by a `store_owner` user
//! - `ratings` - One rating per (user, store) pair
//! - `activity` - Bounded log of recent changes for the admin dashboard
//!
//! Everything lives behind a single `tokio::sync::RwLock`. Each repository
//! call takes the lock once, so cascades and aggregate reads see a
//! consistent snapshot. Store averages and per-user rating counts are never
//! stored; they are computed from `ratings` on every read.

pub mod activity;
pub mod ratings;
pub mod stores;
pub mod users;

use std::collections::{BTreeMap, VecDeque};

use chrono::Utc;
use tokio::sync::RwLock;

use store_ratings_core::{
    Email, Rating, RatingId, RatingSummary, Role, Store, StoreCategory, StoreId, User, UserId,
};

pub use activity::{Activity, ActivityKind, ActivityRepository};
pub use ratings::RatingRepository;
pub use stores::{NewStore, StoreRepository};
pub use users::{NewUser, UserChanges, UserRepository};

/// Number of activity entries kept in memory.
const ACTIVITY_CAPACITY: usize = 100;

/// Errors that can occur during repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Stored user row.
#[derive(Debug, Clone)]
pub(crate) struct UserRow {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub address: String,
    pub role: Role,
    pub password_hash: Option<String>,
}

/// Stored store row.
#[derive(Debug, Clone)]
pub(crate) struct StoreRow {
    pub id: StoreId,
    pub name: String,
    pub address: String,
    pub category: StoreCategory,
    pub phone: String,
    pub website: String,
    pub owner_id: UserId,
}

/// All tables plus id counters.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub users: BTreeMap<UserId, UserRow>,
    pub stores: BTreeMap<StoreId, StoreRow>,
    pub ratings: BTreeMap<RatingId, Rating>,
    pub activity: VecDeque<Activity>,
    next_user: i32,
    next_store: i32,
    next_rating: i32,
}

impl Tables {
    pub fn next_user_id(&mut self) -> UserId {
        self.next_user += 1;
        UserId::new(self.next_user)
    }

    pub fn next_store_id(&mut self) -> StoreId {
        self.next_store += 1;
        StoreId::new(self.next_store)
    }

    pub fn next_rating_id(&mut self) -> RatingId {
        self.next_rating += 1;
        RatingId::new(self.next_rating)
    }

    /// Append to the activity log, dropping the oldest entry when full.
    pub fn log(&mut self, kind: ActivityKind, action: String) {
        if self.activity.len() == ACTIVITY_CAPACITY {
            self.activity.pop_front();
        }
        self.activity.push_back(Activity {
            kind,
            action,
            at: Utc::now(),
        });
    }

    pub fn email_taken(&self, email: &Email, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|u| Some(u.id) != except && u.email.matches(email.as_str()))
    }

    pub fn stores_rated(&self, user_id: UserId) -> u32 {
        let count = self.ratings.values().filter(|r| r.user_id == user_id).count();
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    pub fn summary(&self, store_id: StoreId) -> RatingSummary {
        RatingSummary::from_values(
            self.ratings
                .values()
                .filter(|r| r.store_id == store_id)
                .map(|r| r.rating),
        )
    }

    pub fn user(&self, row: &UserRow) -> User {
        User {
            id: row.id,
            name: row.name.clone(),
            email: row.email.clone(),
            address: row.address.clone(),
            role: row.role,
            stores_rated: self.stores_rated(row.id),
        }
    }

    pub fn store(&self, row: &StoreRow) -> Store {
        let summary = self.summary(row.id);
        Store {
            id: row.id,
            name: row.name.clone(),
            address: row.address.clone(),
            category: row.category,
            phone: row.phone.clone(),
            website: row.website.clone(),
            owner_id: row.owner_id,
            avg_rating: summary.average,
            total_ratings: summary.count,
        }
    }

    /// Remove every rating matching `pred`, returning how many went.
    pub fn remove_ratings(&mut self, pred: impl Fn(&Rating) -> bool) -> usize {
        let before = self.ratings.len();
        self.ratings.retain(|_, r| !pred(r));
        before - self.ratings.len()
    }
}

/// Shared handle to the in-memory tables.
#[derive(Debug, Default)]
pub struct Database {
    tables: RwLock<Tables>,
}

impl Database {
    /// Create an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn read(&self) -> tokio::sync::RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    pub(crate) async fn write(&self) -> tokio::sync::RwLockWriteGuard<'_, Tables> {
        self.tables.write().await
    }

    #[must_use]
    pub const fn users(&self) -> UserRepository<'_> {
        UserRepository::new(self)
    }

    #[must_use]
    pub const fn stores(&self) -> StoreRepository<'_> {
        StoreRepository::new(self)
    }

    #[must_use]
    pub const fn ratings(&self) -> RatingRepository<'_> {
        RatingRepository::new(self)
    }

    #[must_use]
    pub const fn activity(&self) -> ActivityRepository<'_> {
        ActivityRepository::new(self)
    }
}
