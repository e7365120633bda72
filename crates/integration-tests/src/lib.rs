//! Integration tests for Store Ratings.
//!
//! Each test starts its own portal, seeded with the demo data, on an
//! ephemeral port and talks to it over real HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p store-ratings-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `api_crud` - JSON API through the REST client
//! - `portal_roles` - HTML portal login and role guards

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;

use secrecy::SecretString;
use store_ratings_client::ApiClient;
use store_ratings_core::session::MemoryStorage;
use store_ratings_portal::config::PortalConfig;
use store_ratings_portal::state::AppState;

/// Seeded demo accounts as `(email, password)`.
pub const ADMIN: (&str, &str) = ("admin@example.com", "Admin@123");
pub const STORE_OWNER: (&str, &str) = ("store@example.com", "Store@123");
pub const SHOPPER: (&str, &str) = ("user@example.com", "User@123");

/// A running portal.
pub struct TestServer {
    addr: SocketAddr,
}

impl TestServer {
    /// Start a seeded portal in the background.
    ///
    /// # Panics
    ///
    /// Panics if the demo data cannot be loaded or no port can be bound.
    pub async fn start() -> Self {
        let config = PortalConfig::default();
        let state = AppState::initialize(config)
            .await
            .unwrap_or_else(|e| panic!("Failed to seed portal: {e}"));
        let app = store_ratings_portal::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap_or_else(|e| panic!("Failed to bind test port: {e}"));
        let addr = listener
            .local_addr()
            .unwrap_or_else(|e| panic!("Failed to read test port: {e}"));

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                panic!("Test server stopped: {e}");
            }
        });

        Self { addr }
    }

    /// Absolute URL of a portal path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Base URL of the JSON API.
    #[must_use]
    pub fn api_url(&self) -> String {
        self.url("/api")
    }

    /// A REST client with an empty in-memory session.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client(&self) -> ApiClient<MemoryStorage> {
        ApiClient::new(&self.api_url(), MemoryStorage::new())
            .unwrap_or_else(|e| panic!("Failed to build client: {e}"))
    }

    /// A REST client already logged in as `account`.
    ///
    /// # Panics
    ///
    /// Panics if the login is rejected.
    pub async fn client_as(&self, account: (&str, &str)) -> ApiClient<MemoryStorage> {
        let client = self.client();
        client
            .auth()
            .login(account.0, &SecretString::from(account.1))
            .await
            .unwrap_or_else(|e| panic!("Login as {} failed: {e}", account.0));
        client
    }

    /// A browser-like HTTP client that keeps cookies and does not follow
    /// redirects.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn browser(&self) -> reqwest::Client {
        reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|e| panic!("Failed to create HTTP client: {e}"))
    }
}
