//! Store Ratings Client - REST client for the portal's JSON API.
//!
//! # Example
//!
//! ```rust,ignore
//! use secrecy::SecretString;
//! use store_ratings_client::{ApiClient, ClientConfig, FileStorage};
//!
//! let config = ClientConfig::from_env()?;
//! let client = ApiClient::new(&config.api_url, FileStorage::new(&config.session_file))?;
//!
//! client
//!     .auth()
//!     .login("user@example.com", &SecretString::from("User@123"))
//!     .await?;
//! let stores = client.stores().list(Some("grocery")).await?;
//! ```
//!
//! # Modules
//!
//! - [`config`] - Environment configuration
//! - [`error`] - [`ApiError`] and the crate `Result`
//! - [`services`] - Auth, user, store and rating services
//! - [`storage`] - JSON-file session storage

#![cfg_attr(not(test), forbid(unsafe_code))]

mod client;
pub mod config;
pub mod error;
pub mod services;
pub mod storage;

pub use client::ApiClient;
pub use config::{ClientConfig, ConfigError};
pub use error::{ApiError, Result};
pub use storage::FileStorage;
