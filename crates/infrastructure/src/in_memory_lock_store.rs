use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use turnstile_application::LockStore;
use turnstile_core::AppResult;

#[derive(Debug, Clone)]
struct LockEntry {
    token: String,
    expires_at: Instant,
}

impl LockEntry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at > now
    }
}

/// In-process lock store adapter.
///
/// Only serializes callers sharing this instance; multi-process deployments
/// need [`crate::RedisLockStore`].
#[derive(Default)]
pub struct InMemoryLockStore {
    entries: Mutex<HashMap<String, LockEntry>>,
}

impl InMemoryLockStore {
    /// Creates an empty in-memory lock store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the token currently holding `key`, ignoring expired entries.
    #[cfg(test)]
    pub(crate) async fn holder(&self, key: &str) -> Option<String> {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.token.clone())
    }
}

#[async_trait]
impl LockStore for InMemoryLockStore {
    async fn set_if_absent_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> AppResult<bool> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, entry| entry.is_live(now));

        if entries.contains_key(key) {
            return Ok(false);
        }

        let expires_at = now.checked_add(ttl).unwrap_or(now);
        entries.insert(
            key.to_owned(),
            LockEntry {
                token: value.to_owned(),
                expires_at,
            },
        );

        Ok(true)
    }

    async fn compare_and_delete(&self, key: &str, expected_value: &str) -> AppResult<bool> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        let owned = entries
            .get(key)
            .is_some_and(|entry| entry.is_live(now) && entry.token == expected_value);
        if owned {
            entries.remove(key);
        }

        Ok(owned)
    }
}
