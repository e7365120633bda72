//! Search-box filtering and ranking.
//!
//! Matching is a case-insensitive substring test on the trimmed term; a blank
//! term matches everything.

use std::cmp::Ordering;

use crate::models::{Store, User};

/// Whether any of `fields` contains `term`.
#[must_use]
pub fn matches_term(term: &str, fields: &[&str]) -> bool {
    let term = term.trim().to_lowercase();
    term.is_empty() || fields.iter().any(|f| f.to_lowercase().contains(&term))
}

/// Users whose name, email or address contains `term`.
#[must_use]
pub fn filter_users(users: Vec<User>, term: &str) -> Vec<User> {
    users
        .into_iter()
        .filter(|u| matches_term(term, &[&u.name, u.email.as_str(), &u.address]))
        .collect()
}

/// Stores whose name, address or category contains `term`.
#[must_use]
pub fn filter_stores(stores: Vec<Store>, term: &str) -> Vec<Store> {
    stores
        .into_iter()
        .filter(|s| matches_term(term, &[&s.name, &s.address, s.category.name()]))
        .collect()
}

/// Highest average first, then most ratings, then name.
#[must_use]
pub fn compare_by_rating(a: &Store, b: &Store) -> Ordering {
    b.avg_rating
        .total_cmp(&a.avg_rating)
        .then_with(|| b.total_ratings.cmp(&a.total_ratings))
        .then_with(|| a.name.cmp(&b.name))
}

/// The `limit` best-rated stores that have at least one rating.
#[must_use]
pub fn top_rated(mut stores: Vec<Store>, limit: usize) -> Vec<Store> {
    stores.retain(|s| s.total_ratings > 0);
    stores.sort_by(compare_by_rating);
    stores.truncate(limit);
    stores
}
