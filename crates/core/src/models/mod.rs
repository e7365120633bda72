//! Domain models and request payloads.
//!
//! All types serialize with camelCase field names, matching the JSON API.
//! Request payloads keep raw strings so a bad value becomes a field error
//! from [`crate::validation`] instead of a deserialization failure.

pub mod auth;
pub mod rating;
pub mod store;
pub mod user;

pub use auth::{AuthResponse, LoginRequest, RegisterRequest};
pub use rating::{Rating, RatingCreate, RatingError, RatingSummary, RatingUpdate, RatingValue};
pub use store::{Store, StoreCreate, StoreUpdate};
pub use user::{User, UserCreate, UserUpdate};
