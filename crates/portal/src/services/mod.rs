//! Business logic services for the portal.
//!
//! # Services
//!
//! - `auth` - Password login, registration and session identity
//! - `stores` - Store form checking against the current store owners
//! - `tokens` - Bearer tokens for the JSON API
//! - `seed` - Mock stores, users and demo accounts

pub mod auth;
pub mod seed;
pub mod stores;
pub mod tokens;
