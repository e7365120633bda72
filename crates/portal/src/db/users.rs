//! User repository.

use store_ratings_core::search::filter_users;
use store_ratings_core::{Email, Role, User, UserId};

use super::{ActivityKind, Database, RepositoryError, UserRow};

/// Data for a new user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    pub address: String,
    pub role: Role,
    /// Argon2 PHC string. `None` for accounts that cannot log in.
    pub password_hash: Option<String>,
}

/// Profile fields an edit replaces. The password is never touched.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub email: Email,
    pub address: String,
    pub role: Role,
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// All users ordered by id.
    pub async fn list(&self) -> Vec<User> {
        let tables = self.db.read().await;
        tables.users.values().map(|row| tables.user(row)).collect()
    }

    /// Users whose name, email or address contains `term`.
    pub async fn search(&self, term: &str) -> Vec<User> {
        filter_users(self.list().await, term)
    }

    /// Users with the `store_owner` role.
    pub async fn store_owners(&self) -> Vec<User> {
        let tables = self.db.read().await;
        tables
            .users
            .values()
            .filter(|row| row.role == Role::StoreOwner)
            .map(|row| tables.user(row))
            .collect()
    }

    pub async fn count(&self) -> usize {
        self.db.read().await.users.len()
    }

    /// Get a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such user exists.
    pub async fn get(&self, id: UserId) -> Result<User, RepositoryError> {
        let tables = self.db.read().await;
        tables
            .users
            .get(&id)
            .map(|row| tables.user(row))
            .ok_or(RepositoryError::NotFound)
    }

    /// Whether `id` names a user with the `store_owner` role.
    pub async fn is_store_owner(&self, id: UserId) -> bool {
        self.db
            .read()
            .await
            .users
            .get(&id)
            .is_some_and(|row| row.role == Role::StoreOwner)
    }

    /// Get a user together with their password hash, for login.
    ///
    /// Email comparison is case-insensitive. Users without a password are
    /// reported as absent.
    pub async fn get_password_hash(&self, email: &Email) -> Option<(User, String)> {
        let tables = self.db.read().await;
        tables
            .users
            .values()
            .find(|row| row.email.matches(email.as_str()))
            .and_then(|row| {
                row.password_hash
                    .clone()
                    .map(|hash| (tables.user(row), hash))
            })
    }

    /// Insert a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already in use.
    pub async fn create(&self, new: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.db.write().await;
        if tables.email_taken(&new.email, None) {
            return Err(RepositoryError::Conflict(format!(
                "email {} is already registered",
                new.email
            )));
        }

        let row = UserRow {
            id: tables.next_user_id(),
            name: new.name,
            email: new.email,
            address: new.address,
            role: new.role,
            password_hash: new.password_hash,
        };
        tables.log(
            ActivityKind::User,
            format!("New {} registered: {}", row.role.label().to_lowercase(), row.name),
        );
        let user = tables.user(&row);
        tables.users.insert(row.id, row);
        Ok(user)
    }

    /// Replace a user's profile fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist,
    /// `RepositoryError::Conflict` if the email belongs to someone else or
    /// if a store owner who still owns stores would lose the role.
    pub async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, RepositoryError> {
        let mut tables = self.db.write().await;
        if !tables.users.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        if tables.email_taken(&changes.email, Some(id)) {
            return Err(RepositoryError::Conflict(format!(
                "email {} is already registered",
                changes.email
            )));
        }
        if changes.role != Role::StoreOwner && tables.stores.values().any(|s| s.owner_id == id) {
            return Err(RepositoryError::Conflict(
                "user still owns stores and must remain a store owner".to_string(),
            ));
        }

        tables.log(ActivityKind::User, format!("User updated: {}", changes.name));
        let row = tables.users.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        row.name = changes.name;
        row.email = changes.email;
        row.address = changes.address;
        row.role = changes.role;
        let row = row.clone();
        Ok(tables.user(&row))
    }

    /// Delete a user and every rating they submitted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist, or
    /// `RepositoryError::Conflict` if they still own stores.
    pub async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let mut tables = self.db.write().await;
        if tables.stores.values().any(|s| s.owner_id == id) {
            return Err(RepositoryError::Conflict(
                "user still owns stores; reassign or delete them first".to_string(),
            ));
        }
        let row = tables.users.remove(&id).ok_or(RepositoryError::NotFound)?;
        let removed = tables.remove_ratings(|r| r.user_id == id);
        tracing::debug!(user_id = %id, ratings = removed, "deleted user ratings");
        tables.log(ActivityKind::User, format!("User deleted: {}", row.name));
        Ok(())
    }
}
