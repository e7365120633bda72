//! Store form checking shared by the admin pages and the JSON API.

use store_ratings_core::validation::{Field, FieldErrors, StoreDraft, messages, validate_store};
use store_ratings_core::{StoreCategory, StoreCreate, UserId};

use crate::db::{Database, NewStore};

/// Validates store payloads against the current set of store owners.
pub struct StoreService<'a> {
    db: &'a Database,
}

impl<'a> StoreService<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Check `input` and turn it into a row ready to insert.
    ///
    /// # Errors
    ///
    /// Returns the field messages when a rule fails, including an owner that
    /// does not exist or is not a store owner.
    pub async fn prepare(&self, input: &StoreCreate) -> Result<NewStore, FieldErrors> {
        let owners: Vec<UserId> = self
            .db
            .users()
            .store_owners()
            .await
            .iter()
            .map(|u| u.id)
            .collect();

        let draft = StoreDraft {
            name: &input.name,
            address: &input.address,
            category: &input.category,
            owner_id: input.owner_id,
        };
        validate_store(&draft, |id| owners.contains(&id)).into_result()?;

        let category = input
            .category
            .trim()
            .parse::<StoreCategory>()
            .map_err(|_| single(Field::Category, messages::MISSING_CATEGORY))?;
        let owner_id = input
            .owner_id
            .ok_or_else(|| single(Field::OwnerId, messages::MISSING_OWNER))?;

        Ok(NewStore {
            name: input.name.clone(),
            address: input.address.clone(),
            category,
            phone: input.phone.trim().to_string(),
            website: input.website.trim().to_string(),
            owner_id,
        })
    }
}

fn single(field: Field, message: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    errors.insert(field, message);
    errors
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::seed::demo_database;

    fn input(owner: Option<i32>, category: &str) -> StoreCreate {
        StoreCreate {
            name: "Riverside Hardware Emporium".to_string(),
            address: "12 River Road".to_string(),
            category: category.to_string(),
            phone: " (555) 000-1111 ".to_string(),
            website: String::new(),
            owner_id: owner.map(UserId::new),
        }
    }

    #[tokio::test]
    async fn test_prepare_accepts_store_owner() {
        let db = demo_database().await.unwrap();
        let owner = db.users().store_owners().await[0].id;
        let store = StoreService::new(&db)
            .prepare(&input(Some(owner.as_i32()), "Furniture"))
            .await
            .unwrap();
        assert_eq!(store.category, StoreCategory::Furniture);
        assert_eq!(store.phone, "(555) 000-1111");
    }

    #[tokio::test]
    async fn test_prepare_rejects_plain_user_as_owner() {
        let db = demo_database().await.unwrap();
        let errors = StoreService::new(&db)
            .prepare(&input(Some(1), "Furniture"))
            .await
            .unwrap_err();
        assert_eq!(errors.get(Field::OwnerId), Some(messages::MISSING_OWNER));
    }

    #[tokio::test]
    async fn test_prepare_reports_missing_category_and_owner() {
        let db = demo_database().await.unwrap();
        let errors = StoreService::new(&db).prepare(&input(None, "")).await.unwrap_err();
        assert!(errors.contains(Field::Category));
        assert!(errors.contains(Field::OwnerId));
    }
}
