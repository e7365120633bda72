//! HTTP plumbing shared by the entity services.

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use store_ratings_core::session::{SessionStorage, SessionStore};

use crate::error::{ApiError, Result};
use crate::services::{AuthService, RatingService, StoreService, UserService};

/// REST client for the Store Ratings JSON API.
///
/// Requests go to `base_url` + path. When the session holds a token it is
/// sent as `Authorization: Bearer <token>`. Non-2xx responses become
/// [`ApiError::Api`]; nothing is retried.
#[derive(Debug)]
pub struct ApiClient<S> {
    http: reqwest::Client,
    base_url: String,
    session: SessionStore<S>,
}

impl<S: SessionStorage> ApiClient<S> {
    /// Create a client for the API at `base_url` (e.g. `http://localhost:3000/api`).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client fails to build.
    pub fn new(base_url: &str, storage: S) -> Result<Self> {
        Url::parse(base_url)?;
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session: SessionStore::new(storage),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The session this client reads its token from.
    #[must_use]
    pub const fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    #[must_use]
    pub const fn auth(&self) -> AuthService<'_, S> {
        AuthService::new(self)
    }

    #[must_use]
    pub const fn users(&self) -> UserService<'_, S> {
        UserService::new(self)
    }

    #[must_use]
    pub const fn stores(&self) -> StoreService<'_, S> {
        StoreService::new(self)
    }

    #[must_use]
    pub const fn ratings(&self) -> RatingService<'_, S> {
        RatingService::new(self)
    }

    // =========================================================================
    // Request helpers
    // =========================================================================

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.url(path, query)?;
        let body = self.send(self.request(Method::GET, url)).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub(crate) async fn post<B, T>(&self, path: &str, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path, &[])?;
        let body = self
            .send(self.request(Method::POST, url).json(payload))
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub(crate) async fn patch<B, T>(&self, path: &str, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path, &[])?;
        let body = self
            .send(self.request(Method::PATCH, url).json(payload))
            .await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Bodiless `POST` whose success body, if any, is ignored.
    pub(crate) async fn post_empty(&self, path: &str) -> Result<()> {
        let url = self.url(path, &[])?;
        self.send(self.request(Method::POST, url)).await?;
        Ok(())
    }

    /// `DELETE` whose success body, if any, is ignored.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path, &[])?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{path}", self.base_url))?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match self.session.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>> {
        let response = request.send().await?;
        let status = response.status();
        let url = response.url().clone();
        let body = response.bytes().await?.to_vec();

        if status.is_success() {
            tracing::debug!(%url, status = status.as_u16(), "API request succeeded");
            return Ok(body);
        }

        let body = serde_json::from_slice::<Value>(&body)
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()));
        tracing::debug!(%url, status = status.as_u16(), "API request failed");
        Err(ApiError::Api {
            status: status.as_u16(),
            body,
        })
    }
}
