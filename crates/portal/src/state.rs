//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::PortalConfig;
use crate::db::Database;
use crate::services::seed::{SeedError, seed_demo_data};
use crate::services::tokens::TokenStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the in-memory database, issued API tokens and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PortalConfig,
    db: Database,
    tokens: TokenStore,
}

impl AppState {
    /// Create application state around an existing database.
    #[must_use]
    pub fn new(config: PortalConfig, db: Database) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                db,
                tokens: TokenStore::new(),
            }),
        }
    }

    /// Create application state, loading the demo data when the
    /// configuration asks for it.
    ///
    /// # Errors
    ///
    /// Returns `SeedError` if the demo data cannot be loaded.
    pub async fn initialize(config: PortalConfig) -> Result<Self, SeedError> {
        let db = Database::new();
        if config.seed_demo_data {
            seed_demo_data(&db).await?;
        }
        Ok(Self::new(config, db))
    }

    /// Get a reference to the portal configuration.
    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    /// Get a reference to the in-memory database.
    #[must_use]
    pub fn db(&self) -> &Database {
        &self.inner.db
    }

    /// Get a reference to the API token table.
    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }
}
