//! Store repository.

use store_ratings_core::search::{filter_stores, top_rated};
use store_ratings_core::{Role, Store, StoreCategory, StoreId, UserId};

use super::{ActivityKind, Database, RepositoryError, StoreRow, Tables};

/// Data for a new or replaced store row.
#[derive(Debug, Clone)]
pub struct NewStore {
    pub name: String,
    pub address: String,
    pub category: StoreCategory,
    pub phone: String,
    pub website: String,
    pub owner_id: UserId,
}

/// Repository for store operations.
pub struct StoreRepository<'a> {
    db: &'a Database,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All stores ordered by id, with live rating aggregates.
    pub async fn list(&self) -> Vec<Store> {
        let tables = self.db.read().await;
        tables.stores.values().map(|row| tables.store(row)).collect()
    }

    /// Stores whose name, address or category contains `term`.
    pub async fn search(&self, term: &str) -> Vec<Store> {
        filter_stores(self.list().await, term)
    }

    /// The `limit` best-rated stores.
    pub async fn top_rated(&self, limit: usize) -> Vec<Store> {
        top_rated(self.list().await, limit)
    }

    /// Stores owned by `owner_id`, ordered by id.
    pub async fn owned_by(&self, owner_id: UserId) -> Vec<Store> {
        let tables = self.db.read().await;
        tables
            .stores
            .values()
            .filter(|row| row.owner_id == owner_id)
            .map(|row| tables.store(row))
            .collect()
    }

    pub async fn count(&self) -> usize {
        self.db.read().await.stores.len()
    }

    /// Get a store by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such store exists.
    pub async fn get(&self, id: StoreId) -> Result<Store, RepositoryError> {
        let tables = self.db.read().await;
        tables
            .stores
            .get(&id)
            .map(|row| tables.store(row))
            .ok_or(RepositoryError::NotFound)
    }

    /// Insert a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the owner is not a store owner.
    pub async fn create(&self, new: NewStore) -> Result<Store, RepositoryError> {
        let mut tables = self.db.write().await;
        check_owner(&tables, new.owner_id)?;

        let row = StoreRow {
            id: tables.next_store_id(),
            name: new.name,
            address: new.address,
            category: new.category,
            phone: new.phone,
            website: new.website,
            owner_id: new.owner_id,
        };
        tables.log(ActivityKind::Store, format!("New store added: {}", row.name));
        let store = tables.store(&row);
        tables.stores.insert(row.id, row);
        Ok(store)
    }

    /// Replace a store's fields. Ratings are kept.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not exist, or
    /// `RepositoryError::Conflict` if the owner is not a store owner.
    pub async fn update(&self, id: StoreId, new: NewStore) -> Result<Store, RepositoryError> {
        let mut tables = self.db.write().await;
        if !tables.stores.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        check_owner(&tables, new.owner_id)?;

        tables.log(ActivityKind::Store, format!("Store updated: {}", new.name));
        let row = tables.stores.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        row.name = new.name;
        row.address = new.address;
        row.category = new.category;
        row.phone = new.phone;
        row.website = new.website;
        row.owner_id = new.owner_id;
        let row = row.clone();
        Ok(tables.store(&row))
    }

    /// Delete a store and all of its ratings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not exist.
    pub async fn delete(&self, id: StoreId) -> Result<(), RepositoryError> {
        let mut tables = self.db.write().await;
        let row = tables.stores.remove(&id).ok_or(RepositoryError::NotFound)?;
        let removed = tables.remove_ratings(|r| r.store_id == id);
        tracing::debug!(store_id = %id, ratings = removed, "deleted store ratings");
        tables.log(ActivityKind::Store, format!("Store removed: {}", row.name));
        Ok(())
    }
}

fn check_owner(tables: &Tables, owner_id: UserId) -> Result<(), RepositoryError> {
    match tables.users.get(&owner_id) {
        Some(user) if user.role == Role::StoreOwner => Ok(()),
        Some(_) => Err(RepositoryError::Conflict(format!(
            "user {owner_id} is not a store owner"
        ))),
        None => Err(RepositoryError::Conflict(format!(
            "owner {owner_id} does not exist"
        ))),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::NewUser;
    use store_ratings_core::{Email, RatingValue};

    async fn user(db: &Database, email: &str, role: Role) -> UserId {
        db.users()
            .create(NewUser {
                name: email.to_string(),
                email: Email::parse(email).unwrap(),
                address: String::new(),
                role,
                password_hash: None,
            })
            .await
            .unwrap()
            .id
    }

    fn new_store(name: &str, owner_id: UserId) -> NewStore {
        NewStore {
            name: name.to_string(),
            address: "1 High Street".to_string(),
            category: StoreCategory::Books,
            phone: String::new(),
            website: String::new(),
            owner_id,
        }
    }

    #[tokio::test]
    async fn test_owner_must_have_store_owner_role() {
        let db = Database::new();
        let plain = user(&db, "plain@example.com", Role::User).await;
        let err = db.stores().create(new_store("Books", plain)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let err = db
            .stores()
            .create(new_store("Books", UserId::new(99)))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_aggregates_follow_ratings() {
        let db = Database::new();
        let owner = user(&db, "owner@example.com", Role::StoreOwner).await;
        let a = user(&db, "a@example.com", Role::User).await;
        let b = user(&db, "b@example.com", Role::User).await;
        let store = db.stores().create(new_store("Books", owner)).await.unwrap();
        assert_eq!(store.total_ratings, 0);
        assert!(store.avg_rating.abs() < f64::EPSILON);

        db.ratings()
            .upsert(a, store.id, RatingValue::new(5).unwrap(), None)
            .await
            .unwrap();
        db.ratings()
            .upsert(b, store.id, RatingValue::new(4).unwrap(), None)
            .await
            .unwrap();
        let store = db.stores().get(store.id).await.unwrap();
        assert_eq!(store.total_ratings, 2);
        assert!((store.avg_rating - 4.5).abs() < f64::EPSILON);

        db.stores().delete(store.id).await.unwrap();
        assert_eq!(db.ratings().count().await, 0);
        assert_eq!(db.users().get(a).await.unwrap().stores_rated, 0);
    }

    #[tokio::test]
    async fn test_update_keeps_ratings() {
        let db = Database::new();
        let owner = user(&db, "owner@example.com", Role::StoreOwner).await;
        let rater = user(&db, "rater@example.com", Role::User).await;
        let store = db.stores().create(new_store("Books", owner)).await.unwrap();
        db.ratings()
            .upsert(rater, store.id, RatingValue::new(3).unwrap(), None)
            .await
            .unwrap();

        let mut changes = new_store("Books & More", owner);
        changes.category = StoreCategory::OfficeSupplies;
        let updated = db.stores().update(store.id, changes).await.unwrap();
        assert_eq!(updated.name, "Books & More");
        assert_eq!(updated.total_ratings, 1);
    }

    #[tokio::test]
    async fn test_owned_by_and_search() {
        let db = Database::new();
        let owner = user(&db, "owner@example.com", Role::StoreOwner).await;
        db.stores().create(new_store("Alpha Books", owner)).await.unwrap();
        db.stores().create(new_store("Beta Books", owner)).await.unwrap();
        assert_eq!(db.stores().owned_by(owner).await.len(), 2);
        assert_eq!(db.stores().search("beta").await.len(), 1);
        assert_eq!(db.stores().search("books").await.len(), 2);
    }
}
