use std::time::Duration;

use async_trait::async_trait;
use turnstile_core::AppResult;

/// Shared key-value store port with the two atomic primitives locking needs.
///
/// Implementations must surface connectivity failures as errors so callers can
/// tell an unreachable store apart from a busy lock.
#[async_trait]
pub trait LockStore: Send + Sync {
    /// Stores `value` at `key` with the given expiry only if `key` is absent.
    ///
    /// Returns `true` when this call created the entry.
    async fn set_if_absent_with_expiry(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> AppResult<bool>;

    /// Deletes `key` in one atomic step if it currently holds `expected_value`.
    ///
    /// Returns `true` only when this call removed the entry.
    async fn compare_and_delete(&self, key: &str, expected_value: &str) -> AppResult<bool>;
}
