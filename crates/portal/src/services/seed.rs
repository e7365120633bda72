//! Mock data loaded on startup.
//!
//! Eight stores with their owners, a handful of shoppers with ratings, and
//! three demo accounts that can log in:
//!
//! | Email               | Password    | Role          |
//! |---------------------|-------------|---------------|
//! | `admin@example.com` | `Admin@123` | admin         |
//! | `store@example.com` | `Store@123` | store owner   |
//! | `user@example.com`  | `User@123`  | user          |
//!
//! The demo store owner manages the first store. Other seeded accounts have
//! no password and cannot log in.

use std::collections::HashMap;

use store_ratings_core::{
    Email, EmailError, RatingError, RatingValue, Role, StoreCategory, UserId,
};

use super::auth::{AuthError, hash_password};
use crate::db::{Database, NewStore, NewUser, RepositoryError};

/// Errors raised while loading the mock data.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("invalid seed email: {0}")]
    Email(#[from] EmailError),

    #[error("invalid seed rating: {0}")]
    Rating(#[from] RatingError),

    #[error("seed data references unknown {0}")]
    UnknownReference(String),
}

/// A seeded account that can log in, listed on the login page.
#[derive(Debug, Clone, Copy)]
pub struct DemoAccount {
    pub email: &'static str,
    pub password: &'static str,
    pub role: Role,
}

/// Demo accounts, in the order shown on the login page.
pub const DEMO_ACCOUNTS: [DemoAccount; 3] = [
    DemoAccount {
        email: "admin@example.com",
        password: "Admin@123",
        role: Role::Admin,
    },
    DemoAccount {
        email: "store@example.com",
        password: "Store@123",
        role: Role::StoreOwner,
    },
    DemoAccount {
        email: "user@example.com",
        password: "User@123",
        role: Role::User,
    },
];

struct SeedUser {
    name: &'static str,
    email: &'static str,
    address: &'static str,
    role: Role,
    password: Option<&'static str>,
}

const fn account(
    name: &'static str,
    email: &'static str,
    address: &'static str,
    role: Role,
) -> SeedUser {
    SeedUser {
        name,
        email,
        address,
        role,
        password: None,
    }
}

#[rustfmt::skip]
const USERS: &[SeedUser] = &[
    account("John Doe", "john.doe@example.com", "123 Main St, Anytown, CA 94111", Role::User),
    account("Jane Smith", "jane.smith@example.com", "456 Oak Ave, Somewhere, NY 10001", Role::User),
    account("Tech Gadgets Inc.", "info@techgadgets.com", "789 Tech Blvd, Silicon Valley, CA 94043", Role::StoreOwner),
    account("Michael Johnson", "michael.j@example.com", "101 Pine Rd, Elsewhere, TX 75001", Role::Admin),
    account("Sarah Williams", "sarah.w@example.com", "202 Cedar St, Nowhere, WA 98001", Role::User),
    account("Gourmet Foods", "contact@gourmetfoods.com", "303 Culinary Ave, Foodtown, IL 60007", Role::StoreOwner),
    account("Robert Martinez", "robert.m@example.com", "404 Elm St, Someplace, FL 33101", Role::User),
    account("Emily Brown", "emily.b@example.com", "505 Maple Dr, Anywhere, CO 80001", Role::User),
    account("Style Masters", "support@stylemasters.com", "", Role::StoreOwner),
    account("Home Living LLC", "info@homeliving.com", "", Role::StoreOwner),
    account("Book Haven", "hello@bookhaven.com", "", Role::StoreOwner),
    account("Active Sports Co.", "contact@activesports.com", "", Role::StoreOwner),
    account("Pet Lovers Inc.", "care@petlovers.com", "", Role::StoreOwner),
    account("Taste Creators", "hello@tastecreators.com", "", Role::StoreOwner),
    SeedUser {
        name: "Portal Administrator Account",
        email: "admin@example.com",
        address: "1 Admin Plaza, Capital City, DC 20001",
        role: Role::Admin,
        password: Some("Admin@123"),
    },
    SeedUser {
        name: "Demonstration Store Owner",
        email: "store@example.com",
        address: "123 Tech Boulevard, Silicon Valley, CA 94025",
        role: Role::StoreOwner,
        password: Some("Store@123"),
    },
    SeedUser {
        name: "Demonstration Shopper Account",
        email: "user@example.com",
        address: "77 Market Square, Springfield, IL 62701",
        role: Role::User,
        password: Some("User@123"),
    },
];

struct SeedStore {
    name: &'static str,
    address: &'static str,
    category: StoreCategory,
    phone: &'static str,
    website: &'static str,
    owner_email: &'static str,
}

const STORES: &[SeedStore] = &[
    SeedStore {
        name: "Tech Gadgets Plus",
        address: "123 Tech Boulevard, Silicon Valley, CA 94025",
        category: StoreCategory::Electronics,
        phone: "(555) 123-4567",
        website: "www.techgadgetsplus.com",
        owner_email: "store@example.com",
    },
    SeedStore {
        name: "Fresh Grocery Market",
        address: "456 Farmer Lane, Greenfield, OR 97403",
        category: StoreCategory::Grocery,
        phone: "(555) 234-5678",
        website: "www.freshgrocerymarket.com",
        owner_email: "contact@gourmetfoods.com",
    },
    SeedStore {
        name: "Fashion Forward",
        address: "789 Style Street, Trendy Town, NY 10001",
        category: StoreCategory::Clothing,
        phone: "(555) 345-6789",
        website: "www.fashionforward.com",
        owner_email: "support@stylemasters.com",
    },
    SeedStore {
        name: "Home Essentials",
        address: "101 Comfort Lane, Homely Hills, FL 33101",
        category: StoreCategory::HomeGoods,
        phone: "(555) 456-7890",
        website: "www.homeessentials.com",
        owner_email: "info@homeliving.com",
    },
    SeedStore {
        name: "Bookworm Paradise",
        address: "202 Reading Road, Literary Lane, WA 98001",
        category: StoreCategory::Books,
        phone: "(555) 567-8901",
        website: "www.bookwormparadise.com",
        owner_email: "hello@bookhaven.com",
    },
    SeedStore {
        name: "Sports Zone",
        address: "303 Athletic Avenue, Fitness Field, CO 80001",
        category: StoreCategory::SportingGoods,
        phone: "(555) 678-9012",
        website: "www.sportszone.com",
        owner_email: "contact@activesports.com",
    },
    SeedStore {
        name: "Pet Palace",
        address: "404 Furry Friends Blvd, Petville, OR 97401",
        category: StoreCategory::PetSupplies,
        phone: "(555) 789-0123",
        website: "www.petpalace.com",
        owner_email: "care@petlovers.com",
    },
    SeedStore {
        name: "Gourmet Delights",
        address: "505 Flavor Drive, Tastetown, IL 60007",
        category: StoreCategory::FoodAndDining,
        phone: "(555) 890-1234",
        website: "www.gourmetdelights.com",
        owner_email: "hello@tastecreators.com",
    },
];

/// (rater email, store position in `STORES`, stars, comment)
#[rustfmt::skip]
const RATINGS: &[(&str, usize, i64, Option<&str>)] = &[
    ("john.doe@example.com", 0, 5, Some("Great selection of gadgets and very helpful staff.")),
    ("jane.smith@example.com", 0, 4, None),
    ("john.doe@example.com", 1, 4, None),
    ("sarah.w@example.com", 1, 5, Some("Always fresh produce.")),
    ("robert.m@example.com", 1, 4, None),
    ("emily.b@example.com", 1, 4, None),
    ("user@example.com", 1, 4, Some("Good prices, a bit crowded on weekends.")),
    ("jane.smith@example.com", 2, 5, None),
    ("sarah.w@example.com", 2, 5, Some("Love the new collection!")),
    ("emily.b@example.com", 2, 4, None),
    ("john.doe@example.com", 3, 4, None),
    ("robert.m@example.com", 3, 3, Some("Decent, but limited stock.")),
    ("emily.b@example.com", 3, 5, None),
    ("jane.smith@example.com", 3, 4, None),
    ("sarah.w@example.com", 4, 5, Some("A reader's dream.")),
    ("jane.smith@example.com", 4, 5, None),
    ("john.doe@example.com", 4, 5, None),
    ("emily.b@example.com", 4, 4, None),
    ("robert.m@example.com", 5, 4, None),
    ("john.doe@example.com", 5, 5, Some("Huge range of equipment.")),
    ("sarah.w@example.com", 5, 4, None),
    ("emily.b@example.com", 6, 5, None),
    ("jane.smith@example.com", 6, 4, Some("My dog loves this place.")),
    ("user@example.com", 6, 5, None),
    ("sarah.w@example.com", 7, 5, None),
    ("robert.m@example.com", 7, 5, Some("Best dinner in town.")),
    ("john.doe@example.com", 7, 5, None),
    ("jane.smith@example.com", 7, 5, None),
    ("emily.b@example.com", 7, 4, None),
    ("user@example.com", 7, 5, None),
];

/// Insert the mock data into `db`.
///
/// # Errors
///
/// Returns `SeedError` if a password cannot be hashed or a row is rejected.
pub async fn seed_demo_data(db: &Database) -> Result<(), SeedError> {
    let mut users: HashMap<&str, UserId> = HashMap::new();
    for seed in USERS {
        let password_hash = seed.password.map(hash_password).transpose()?;
        let user = db
            .users()
            .create(NewUser {
                name: seed.name.to_string(),
                email: Email::parse(seed.email)?,
                address: seed.address.to_string(),
                role: seed.role,
                password_hash,
            })
            .await?;
        users.insert(seed.email, user.id);
    }

    let mut stores = Vec::with_capacity(STORES.len());
    for seed in STORES {
        let owner_id = lookup(&users, seed.owner_email)?;
        let store = db
            .stores()
            .create(NewStore {
                name: seed.name.to_string(),
                address: seed.address.to_string(),
                category: seed.category,
                phone: seed.phone.to_string(),
                website: seed.website.to_string(),
                owner_id,
            })
            .await?;
        stores.push(store.id);
    }

    for &(email, store, stars, comment) in RATINGS {
        let user_id = lookup(&users, email)?;
        let store_id = stores
            .get(store)
            .copied()
            .ok_or_else(|| SeedError::UnknownReference(format!("store #{store}")))?;
        let value = RatingValue::new(stars)?;
        db.ratings()
            .upsert(user_id, store_id, value, comment.map(str::to_string))
            .await?;
    }

    tracing::info!(
        users = USERS.len(),
        stores = STORES.len(),
        ratings = RATINGS.len(),
        "Demo data loaded"
    );
    Ok(())
}

/// A fresh database holding the mock data.
///
/// # Errors
///
/// Returns `SeedError` if seeding fails.
pub async fn demo_database() -> Result<Database, SeedError> {
    let db = Database::new();
    seed_demo_data(&db).await?;
    Ok(db)
}

fn lookup(users: &HashMap<&str, UserId>, email: &str) -> Result<UserId, SeedError> {
    users
        .get(email)
        .copied()
        .ok_or_else(|| SeedError::UnknownReference(format!("user {email}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use store_ratings_core::StoreId;

    #[tokio::test]
    async fn test_demo_data_shape() {
        let db = demo_database().await.unwrap();
        assert_eq!(db.users().count().await, USERS.len());
        assert_eq!(db.stores().count().await, 8);
        assert_eq!(db.ratings().count().await, RATINGS.len());

        let first = db.stores().get(StoreId::new(1)).await.unwrap();
        assert_eq!(first.name, "Tech Gadgets Plus");
        assert_eq!(first.total_ratings, 2);
        assert!((first.avg_rating - 4.5).abs() < f64::EPSILON);

        let owner = db.users().get(first.owner_id).await.unwrap();
        assert_eq!(owner.email.as_str(), "store@example.com");
    }

    #[test]
    fn test_demo_accounts_have_matching_seed_users() {
        for demo in DEMO_ACCOUNTS {
            let seed = USERS.iter().find(|u| u.email == demo.email).unwrap();
            assert_eq!(seed.password, Some(demo.password));
            assert_eq!(seed.role, demo.role);
        }
    }

    #[tokio::test]
    async fn test_top_rated_seed_store() {
        let db = demo_database().await.unwrap();
        let top = db.stores().top_rated(1).await;
        assert_eq!(top[0].name, "Gourmet Delights");
    }
}
