//! One service per API entity.
//!
//! Each service borrows the [`crate::ApiClient`] it was created from, in the
//! same way repositories borrow the portal database.

mod auth;
mod ratings;
mod stores;
mod users;

pub use auth::AuthService;
pub use ratings::RatingService;
pub use stores::StoreService;
pub use users::UserService;

/// Search-box query, omitted when blank.
fn search_query(search: Option<&str>) -> Vec<(&str, &str)> {
    search
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(|term| vec![("q", term)])
        .unwrap_or_default()
}
