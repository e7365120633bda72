//! Rating repository.
//!
//! A user holds at most one rating per store. Submitting again for the same
//! store replaces the value and comment of the existing rating.

use chrono::Utc;

use store_ratings_core::{Rating, RatingId, RatingValue, Store, StoreId, User, UserId};

use super::{ActivityKind, Database, RepositoryError, Tables};

/// A rating joined with the user who submitted it.
#[derive(Debug, Clone)]
pub struct RatingWithUser {
    pub rating: Rating,
    pub user: User,
}

/// A rating joined with the store it is about.
#[derive(Debug, Clone)]
pub struct RatingWithStore {
    pub rating: Rating,
    pub store: Store,
}

/// Repository for rating operations.
pub struct RatingRepository<'a> {
    db: &'a Database,
}

impl<'a> RatingRepository<'a> {
    /// Create a new rating repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    pub async fn count(&self) -> usize {
        self.db.read().await.ratings.len()
    }

    /// Get a rating by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such rating exists.
    pub async fn get(&self, id: RatingId) -> Result<Rating, RepositoryError> {
        self.db
            .read()
            .await
            .ratings
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    /// The rating `user_id` gave `store_id`, if any.
    pub async fn find(&self, user_id: UserId, store_id: StoreId) -> Option<Rating> {
        find(&*self.db.read().await, user_id, store_id).cloned()
    }

    /// Ratings of a store, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not exist.
    pub async fn for_store(&self, store_id: StoreId) -> Result<Vec<Rating>, RepositoryError> {
        Ok(self
            .for_store_with_users(store_id)
            .await?
            .into_iter()
            .map(|r| r.rating)
            .collect())
    }

    /// Ratings of a store with their authors, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the store does not exist.
    pub async fn for_store_with_users(
        &self,
        store_id: StoreId,
    ) -> Result<Vec<RatingWithUser>, RepositoryError> {
        let tables = self.db.read().await;
        if !tables.stores.contains_key(&store_id) {
            return Err(RepositoryError::NotFound);
        }
        let mut ratings: Vec<RatingWithUser> = tables
            .ratings
            .values()
            .filter(|r| r.store_id == store_id)
            .filter_map(|r| {
                let user = tables.users.get(&r.user_id)?;
                Some(RatingWithUser {
                    rating: r.clone(),
                    user: tables.user(user),
                })
            })
            .collect();
        ratings.sort_by(|a, b| newest_first(&a.rating, &b.rating));
        Ok(ratings)
    }

    /// Ratings submitted by a user, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn for_user(&self, user_id: UserId) -> Result<Vec<Rating>, RepositoryError> {
        Ok(self
            .for_user_with_stores(user_id)
            .await?
            .into_iter()
            .map(|r| r.rating)
            .collect())
    }

    /// Ratings submitted by a user with their stores, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    pub async fn for_user_with_stores(
        &self,
        user_id: UserId,
    ) -> Result<Vec<RatingWithStore>, RepositoryError> {
        let tables = self.db.read().await;
        if !tables.users.contains_key(&user_id) {
            return Err(RepositoryError::NotFound);
        }
        let mut ratings: Vec<RatingWithStore> = tables
            .ratings
            .values()
            .filter(|r| r.user_id == user_id)
            .filter_map(|r| {
                let store = tables.stores.get(&r.store_id)?;
                Some(RatingWithStore {
                    rating: r.clone(),
                    store: tables.store(store),
                })
            })
            .collect();
        ratings.sort_by(|a, b| newest_first(&a.rating, &b.rating));
        Ok(ratings)
    }

    /// Rate a store, replacing the user's previous rating of it.
    ///
    /// Returns the stored rating and whether it was newly created. The
    /// comment is trimmed and a blank one is stored as none.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user or store does not exist.
    pub async fn upsert(
        &self,
        user_id: UserId,
        store_id: StoreId,
        value: RatingValue,
        comment: Option<String>,
    ) -> Result<(Rating, bool), RepositoryError> {
        let comment = comment.and_then(clean_comment);
        let mut tables = self.db.write().await;
        let user_name = tables
            .users
            .get(&user_id)
            .map(|u| u.name.clone())
            .ok_or(RepositoryError::NotFound)?;
        let store_name = tables
            .stores
            .get(&store_id)
            .map(|s| s.name.clone())
            .ok_or(RepositoryError::NotFound)?;
        tables.log(
            ActivityKind::Rating,
            format!("{user_name} rated {store_name} {value} stars"),
        );

        if let Some(id) = find(&tables, user_id, store_id).map(|r| r.id) {
            let rating = tables.ratings.get_mut(&id).ok_or(RepositoryError::NotFound)?;
            rating.rating = value;
            rating.comment = comment;
            return Ok((rating.clone(), false));
        }

        let rating = Rating {
            id: tables.next_rating_id(),
            store_id,
            user_id,
            rating: value,
            comment,
            created_at: Utc::now(),
        };
        tables.ratings.insert(rating.id, rating.clone());
        Ok((rating, true))
    }

    /// Change an existing rating's value and/or comment.
    ///
    /// A supplied comment is trimmed; a blank one clears the stored comment.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the rating does not exist.
    pub async fn update(
        &self,
        id: RatingId,
        value: Option<RatingValue>,
        comment: Option<String>,
    ) -> Result<Rating, RepositoryError> {
        let mut tables = self.db.write().await;
        let rating = tables.ratings.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        if let Some(value) = value {
            rating.rating = value;
        }
        if let Some(comment) = comment {
            rating.comment = clean_comment(comment);
        }
        let rating = rating.clone();
        tables.log(ActivityKind::Rating, format!("Rating {id} updated"));
        Ok(rating)
    }

    /// Delete a rating.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the rating does not exist.
    pub async fn delete(&self, id: RatingId) -> Result<Rating, RepositoryError> {
        let mut tables = self.db.write().await;
        let rating = tables.ratings.remove(&id).ok_or(RepositoryError::NotFound)?;
        tables.log(ActivityKind::Rating, format!("Rating {id} removed"));
        Ok(rating)
    }
}

fn clean_comment(comment: String) -> Option<String> {
    let trimmed = comment.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == comment.len() {
        Some(comment)
    } else {
        Some(trimmed.to_string())
    }
}

fn find(tables: &Tables, user_id: UserId, store_id: StoreId) -> Option<&Rating> {
    tables
        .ratings
        .values()
        .find(|r| r.user_id == user_id && r.store_id == store_id)
}

fn newest_first(a: &Rating, b: &Rating) -> std::cmp::Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::{NewStore, NewUser};
    use store_ratings_core::{Email, Role, StoreCategory};

    async fn fixture(db: &Database) -> (UserId, StoreId) {
        let owner = db
            .users()
            .create(NewUser {
                name: "Owner".to_string(),
                email: Email::parse("owner@example.com").unwrap(),
                address: String::new(),
                role: Role::StoreOwner,
                password_hash: None,
            })
            .await
            .unwrap();
        let rater = db
            .users()
            .create(NewUser {
                name: "Rater".to_string(),
                email: Email::parse("rater@example.com").unwrap(),
                address: String::new(),
                role: Role::User,
                password_hash: None,
            })
            .await
            .unwrap();
        let store = db
            .stores()
            .create(NewStore {
                name: "Pet Palace".to_string(),
                address: "404 Furry Friends Blvd".to_string(),
                category: StoreCategory::PetSupplies,
                phone: String::new(),
                website: String::new(),
                owner_id: owner.id,
            })
            .await
            .unwrap();
        (rater.id, store.id)
    }

    fn value(v: i64) -> RatingValue {
        RatingValue::new(v).unwrap()
    }

    #[tokio::test]
    async fn test_second_rating_replaces_first() {
        let db = Database::new();
        let (user, store) = fixture(&db).await;

        let (first, created) = db
            .ratings()
            .upsert(user, store, value(2), Some("meh".to_string()))
            .await
            .unwrap();
        assert!(created);

        let (second, created) = db.ratings().upsert(user, store, value(5), None).await.unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
        assert_eq!(second.rating.get(), 5);
        assert_eq!(second.comment, None);

        assert_eq!(db.ratings().count().await, 1);
        let store = db.stores().get(store).await.unwrap();
        assert_eq!(store.total_ratings, 1);
        assert!((store.avg_rating - 5.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_unknown_store_or_user() {
        let db = Database::new();
        let (user, store) = fixture(&db).await;
        assert!(matches!(
            db.ratings().upsert(user, StoreId::new(77), value(3), None).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            db.ratings().upsert(UserId::new(77), store, value(3), None).await,
            Err(RepositoryError::NotFound)
        ));
        assert!(matches!(
            db.ratings().for_store(StoreId::new(77)).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = Database::new();
        let (user, store) = fixture(&db).await;
        let (rating, _) = db.ratings().upsert(user, store, value(1), None).await.unwrap();

        let updated = db
            .ratings()
            .update(rating.id, Some(value(4)), Some("better now".to_string()))
            .await
            .unwrap();
        assert_eq!(updated.rating.get(), 4);
        assert_eq!(updated.comment.as_deref(), Some("better now"));

        // comment left alone when not supplied
        let updated = db.ratings().update(rating.id, Some(value(3)), None).await.unwrap();
        assert_eq!(updated.comment.as_deref(), Some("better now"));

        db.ratings().delete(rating.id).await.unwrap();
        assert!(db.ratings().find(user, store).await.is_none());
        assert!(matches!(
            db.ratings().delete(rating.id).await,
            Err(RepositoryError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_comments_are_trimmed_and_blank_clears() {
        let db = Database::new();
        let (user, store) = fixture(&db).await;

        let (rating, _) = db
            .ratings()
            .upsert(user, store, value(4), Some("  cosy shop \n".to_string()))
            .await
            .unwrap();
        assert_eq!(rating.comment.as_deref(), Some("cosy shop"));

        let updated = db
            .ratings()
            .update(rating.id, None, Some("   ".to_string()))
            .await
            .unwrap();
        assert_eq!(updated.comment, None);

        let (again, _) = db
            .ratings()
            .upsert(user, store, value(4), Some("\t".to_string()))
            .await
            .unwrap();
        assert_eq!(again.comment, None);
    }

    #[tokio::test]
    async fn test_joined_listings() {
        let db = Database::new();
        let (user, store) = fixture(&db).await;
        db.ratings().upsert(user, store, value(4), None).await.unwrap();

        let by_store = db.ratings().for_store_with_users(store).await.unwrap();
        assert_eq!(by_store.len(), 1);
        assert_eq!(by_store[0].user.name, "Rater");

        let by_user = db.ratings().for_user_with_stores(user).await.unwrap();
        assert_eq!(by_user[0].store.name, "Pet Palace");
        assert_eq!(by_user[0].store.total_ratings, 1);
    }
}
