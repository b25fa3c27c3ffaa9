//! Bearer token cache.
//!
//! A provider instance keeps at most one token. Callers are serialized on
//! the cache lock, so an expired token is refreshed by exactly one request
//! while everyone else waits for the result.

use std::future::Future;
use time::OffsetDateTime;
use tokio::sync::Mutex;

/// Token lifetime assumed when the vendor's expiry cannot be parsed.
pub const DEFAULT_TOKEN_TTL: time::Duration = time::Duration::minutes(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthToken {
    pub token: String,
    pub expires_at: OffsetDateTime,
}

impl AuthToken {
    pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Default)]
pub struct TokenCache {
    slot: Mutex<Option<AuthToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached token while it is valid, otherwise run `fetch`
    /// and cache its result.
    ///
    /// A failed fetch leaves the cache empty.
    pub async fn get_or_refresh<F, Fut, E>(&self, fetch: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<AuthToken, E>>,
    {
        let mut slot = self.slot.lock().await;
        let now = OffsetDateTime::now_utc();
        if let Some(cached) = slot.as_ref().filter(|t| t.is_valid_at(now)) {
            return Ok(cached.token.clone());
        }

        *slot = None;
        let fresh = fetch().await?;
        let token = fresh.token.clone();
        *slot = Some(fresh);
        Ok(token)
    }
}
