//! Bearer tokens for the JSON API.
//!
//! Tokens are 32 random bytes, base64url encoded, mapped to a user id in
//! memory. They do not expire; logout and account deletion revoke them.

use std::collections::HashMap;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;

use store_ratings_core::UserId;

const TOKEN_BYTES: usize = 32;

/// In-memory token table.
#[derive(Debug, Default)]
pub struct TokenStore {
    tokens: RwLock<HashMap<String, UserId>>,
}

impl TokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a fresh token for `user_id`.
    pub async fn issue(&self, user_id: UserId) -> SecretString {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        let token = URL_SAFE_NO_PAD.encode(bytes);

        self.tokens.write().await.insert(token.clone(), user_id);
        SecretString::from(token)
    }

    /// The user a token was issued to.
    pub async fn resolve(&self, token: &str) -> Option<UserId> {
        self.tokens.read().await.get(token).copied()
    }

    /// Forget a single token.
    pub async fn revoke(&self, token: &SecretString) {
        self.tokens.write().await.remove(token.expose_secret());
    }

    /// Forget every token of a user.
    pub async fn revoke_user(&self, user_id: UserId) {
        self.tokens.write().await.retain(|_, owner| *owner != user_id);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_issue_and_resolve() {
        let store = TokenStore::new();
        let a = store.issue(UserId::new(1)).await;
        let b = store.issue(UserId::new(1)).await;
        assert_ne!(a.expose_secret(), b.expose_secret());
        assert_eq!(a.expose_secret().len(), 43);
        assert_eq!(store.resolve(a.expose_secret()).await, Some(UserId::new(1)));
        assert_eq!(store.resolve("nope").await, None);
    }

    #[tokio::test]
    async fn test_revocation() {
        let store = TokenStore::new();
        let a = store.issue(UserId::new(1)).await;
        let b = store.issue(UserId::new(1)).await;
        let c = store.issue(UserId::new(2)).await;

        store.revoke(&a).await;
        assert_eq!(store.resolve(a.expose_secret()).await, None);
        assert!(store.resolve(b.expose_secret()).await.is_some());

        store.revoke_user(UserId::new(1)).await;
        assert_eq!(store.resolve(b.expose_secret()).await, None);
        assert_eq!(store.resolve(c.expose_secret()).await, Some(UserId::new(2)));
    }
}
