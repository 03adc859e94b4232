//! Redis-backed lock store.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::Script;
use redis::aio::ConnectionManager;
use tokio::sync::OnceCell;
use turnstile_application::LockStore;
use tracing::warn;
use turnstile_core::{AppError, AppResult};

const COMPARE_AND_DELETE_SCRIPT: &str = r#"
if redis.call('GET', KEYS[1]) == ARGV[1] then
  return redis.call('DEL', KEYS[1])
else
  return 0
end
"#;

/// Redis implementation of the lock store port.
///
/// Acquisition is a single `SET key value NX PX ttl`; release runs a Lua
/// script so the ownership check and the delete happen in one step.
///
/// One reconnecting connection is opened on first use and shared by all
/// clones of the store.
#[derive(Clone)]
pub struct RedisLockStore {
    client: redis::Client,
    manager: Arc<OnceCell<ConnectionManager>>,
}

impl RedisLockStore {
    /// Creates one store adapter.
    #[must_use]
    pub fn new(client: redis::Client) -> Self {
        Self {
            client,
            manager: Arc::new(OnceCell::new()),
        }
    }

    async fn connection(&self) -> AppResult<ConnectionManager> {
        self.manager
            .get_or_try_init(|| async {
                ConnectionManager::new(self.client.clone())
                    .await
                    .map_err(|error| {
                        warn!(error = %error, "redis lock store connection failed");
                        AppError::Internal(format!("failed to connect to redis: {error}"))
                    })
            })
            .await
            .cloned()
    }
}

#[async_trait]
impl LockStore for RedisLockStore {
    async fn set_if_absent_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> AppResult<bool> {
        let ttl_millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
        let mut connection = self.connection().await?;

        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("NX")
            .arg("PX")
            .arg(ttl_millis)
            .query_async(&mut connection)
            .await
            .map_err(|error| AppError::Internal(format!("failed to acquire lock: {error}")))?;

        Ok(reply.is_some())
    }

    async fn compare_and_delete(&self, key: &str, expected_value: &str) -> AppResult<bool> {
        let script = Script::new(COMPARE_AND_DELETE_SCRIPT);
        let mut connection = self.connection().await?;

        let deleted = script
            .key(key)
            .arg(expected_value)
            .invoke_async::<i64>(&mut connection)
            .await
            .map_err(|error| AppError::Internal(format!("failed to release lock: {error}")))?;

        Ok(deleted == 1)
    }
}

#[cfg(test)]
mod tests;
