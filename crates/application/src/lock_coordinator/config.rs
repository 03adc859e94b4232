use std::time::Duration;

use turnstile_core::{AppError, AppResult};

/// Prefix prepended to every resource key.
pub const DEFAULT_LOCK_KEY_PREFIX: &str = "lock:";

/// Lifetime of a lock entry absent explicit release.
pub const DEFAULT_LOCK_TTL: Duration = Duration::from_secs(30);

/// How long `acquire` keeps polling before giving up.
pub const DEFAULT_LOCK_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause between two acquisition attempts.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Per-call acquisition parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOptions {
    /// Expiry written with the lock entry.
    pub lock_ttl: Duration,
    /// Maximum time spent polling for the lock.
    pub wait_timeout: Duration,
}

impl LockOptions {
    /// Creates acquisition options.
    #[must_use]
    pub fn new(lock_ttl: Duration, wait_timeout: Duration) -> Self {
        Self {
            lock_ttl,
            wait_timeout,
        }
    }

    pub(super) fn validate(&self) -> AppResult<()> {
        if self.lock_ttl.is_zero() {
            return Err(AppError::Validation(
                "lock ttl must be greater than zero".to_owned(),
            ));
        }

        Ok(())
    }
}

impl Default for LockOptions {
    fn default() -> Self {
        Self::new(DEFAULT_LOCK_TTL, DEFAULT_LOCK_WAIT_TIMEOUT)
    }
}

/// Construction-time configuration of a lock coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockCoordinatorConfig {
    /// Namespace prepended to resource keys, e.g. `lock:`.
    pub key_prefix: String,
    /// Expiry used by [`super::LockCoordinator::acquire`].
    pub default_lock_ttl: Duration,
    /// Wait timeout used by [`super::LockCoordinator::acquire`].
    pub default_wait_timeout: Duration,
    /// Fixed pause between acquisition attempts.
    pub poll_interval: Duration,
}

impl LockCoordinatorConfig {
    /// Rejects configurations that would make acquisition meaningless.
    pub fn validate(&self) -> AppResult<()> {
        if self.key_prefix.trim().is_empty() {
            return Err(AppError::Validation(
                "lock key prefix must not be empty".to_owned(),
            ));
        }

        if self.poll_interval.is_zero() {
            return Err(AppError::Validation(
                "lock poll interval must be greater than zero".to_owned(),
            ));
        }

        self.default_options().validate()
    }

    /// Returns the acquisition options implied by the configured defaults.
    #[must_use]
    pub fn default_options(&self) -> LockOptions {
        LockOptions::new(self.default_lock_ttl, self.default_wait_timeout)
    }
}

impl Default for LockCoordinatorConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_LOCK_KEY_PREFIX.to_owned(),
            default_lock_ttl: DEFAULT_LOCK_TTL,
            default_wait_timeout: DEFAULT_LOCK_WAIT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
