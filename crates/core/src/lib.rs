//! Store Ratings Core - Shared types and rules.
//!
//! This crate provides the types and pure logic used across all Store Ratings
//! components:
//! - `portal` - Role-specific dashboards and the JSON API
//! - `client` - REST client for the JSON API
//! - `cli` - Command-line front-end over the client
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure functions - no network
//! access, no HTTP clients, no filesystem. Session persistence goes through the
//! [`session::SessionStorage`] trait so callers decide where data lives.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, roles and store categories
//! - [`models`] - Users, stores, ratings and their request payloads
//! - [`validation`] - Field validation for user, store, signup and rating forms
//! - [`stars`] - Star-rating glyph rendering
//! - [`session`] - Local session store and role guard
//! - [`search`] - Search-box filtering and ranking

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod models;
pub mod search;
pub mod session;
pub mod stars;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
