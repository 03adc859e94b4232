use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, info};
use turnstile_core::{AppError, AppResult};
use uuid::Uuid;

use super::config::{LockCoordinatorConfig, LockOptions};
use super::ports::LockStore;
use super::state::{AcquireMachine, AcquireOutcome, PollStep};

/// Result of one acquisition, owned by the caller that requested it.
///
/// Only a handle whose outcome is [`AcquireOutcome::Acquired`] carries a token.
#[derive(Debug, PartialEq, Eq)]
pub struct LockHandle {
    key: String,
    token: Option<String>,
    outcome: AcquireOutcome,
}

impl LockHandle {
    fn acquired(key: String, token: String) -> Self {
        Self {
            key,
            token: Some(token),
            outcome: AcquireOutcome::Acquired,
        }
    }

    fn not_acquired(key: String, outcome: AcquireOutcome) -> Self {
        Self {
            key,
            token: None,
            outcome,
        }
    }

    /// Returns the fully-qualified lock key, prefix included.
    #[must_use]
    pub fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Returns the ownership token when the lock was acquired.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Returns how the acquisition ended.
    #[must_use]
    pub fn outcome(&self) -> AcquireOutcome {
        self.outcome
    }

    /// Returns whether this handle owns the lock.
    #[must_use]
    pub fn is_acquired(&self) -> bool {
        self.outcome == AcquireOutcome::Acquired
    }
}

/// Acquire/release coordinator for named resources.
#[derive(Clone)]
pub struct LockCoordinator {
    store: Arc<dyn LockStore>,
    config: LockCoordinatorConfig,
}

impl LockCoordinator {
    /// Creates a coordinator after validating its configuration.
    pub fn new(store: Arc<dyn LockStore>, config: LockCoordinatorConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    /// Returns the coordinator configuration.
    #[must_use]
    pub fn config(&self) -> &LockCoordinatorConfig {
        &self.config
    }

    /// Returns the store key guarding `resource_key`.
    #[must_use]
    pub fn lock_key(&self, resource_key: &str) -> String {
        format!("{}{resource_key}", self.config.key_prefix)
    }

    /// Acquires the lock for `resource_key` with the configured defaults.
    pub async fn acquire(&self, resource_key: &str) -> AppResult<LockHandle> {
        self.acquire_with(resource_key, self.config.default_options())
            .await
    }

    /// Acquires the lock for `resource_key` with explicit ttl and wait timeout.
    ///
    /// A busy lock is not an error: the handle reports
    /// [`AcquireOutcome::TimedOut`]. Errors are reserved for invalid input and
    /// store faults.
    pub async fn acquire_with(
        &self,
        resource_key: &str,
        options: LockOptions,
    ) -> AppResult<LockHandle> {
        self.poll_for_lock(resource_key, options, None).await
    }

    /// Acquires like [`Self::acquire_with`] but stops once `cancel` turns `true`.
    ///
    /// Cancellation is observed between attempts and right after each store
    /// call. A store call is never abandoned halfway; if it wrote the entry
    /// after cancellation was requested, the entry is deleted again before
    /// returning [`AcquireOutcome::Cancelled`].
    pub async fn acquire_cancellable(
        &self,
        resource_key: &str,
        options: LockOptions,
        cancel: watch::Receiver<bool>,
    ) -> AppResult<LockHandle> {
        self.poll_for_lock(resource_key, options, Some(cancel))
            .await
    }

    /// Releases `lock_key` if it is still owned by `token`.
    ///
    /// Returns `false` when the entry expired, was already released, or
    /// belongs to another token.
    pub async fn release(&self, lock_key: &str, token: &str) -> AppResult<bool> {
        let released = self.store.compare_and_delete(lock_key, token).await?;
        if !released {
            debug!(lock_key, "lock entry was no longer owned at release");
        }

        Ok(released)
    }

    /// Releases the lock held by `handle`; a handle that never acquired is a no-op.
    pub async fn release_handle(&self, handle: &LockHandle) -> AppResult<bool> {
        match handle.token() {
            Some(token) => self.release(handle.key(), token).await,
            None => Ok(false),
        }
    }

    async fn poll_for_lock(
        &self,
        resource_key: &str,
        options: LockOptions,
        mut cancel: Option<watch::Receiver<bool>>,
    ) -> AppResult<LockHandle> {
        if resource_key.trim().is_empty() {
            return Err(AppError::Validation(
                "lock resource key must not be empty".to_owned(),
            ));
        }
        options.validate()?;

        let key = self.lock_key(resource_key);
        let token = Uuid::new_v4().to_string();
        let started_at = Instant::now();
        let mut machine = AcquireMachine::new(options.wait_timeout, self.config.poll_interval);

        loop {
            let acquired = self
                .store
                .set_if_absent_with_expiry(key.as_str(), token.as_str(), options.lock_ttl)
                .await?;

            if is_cancelled(cancel.as_ref()) {
                if acquired {
                    self.store
                        .compare_and_delete(key.as_str(), token.as_str())
                        .await?;
                }
                return Ok(cancelled_handle(key, &mut machine));
            }

            match machine.record_attempt(acquired, started_at.elapsed()) {
                PollStep::Finish(AcquireOutcome::Acquired) => {
                    debug!(lock_key = %key, attempts = machine.attempts(), "lock acquired");
                    return Ok(LockHandle::acquired(key, token));
                }
                PollStep::Finish(outcome) => {
                    debug!(
                        lock_key = %key,
                        attempts = machine.attempts(),
                        waited_ms = started_at.elapsed().as_millis(),
                        "lock acquisition timed out"
                    );
                    return Ok(LockHandle::not_acquired(key, outcome));
                }
                PollStep::Sleep(pause) => {
                    if pause_unless_cancelled(pause, cancel.as_mut()).await {
                        return Ok(cancelled_handle(key, &mut machine));
                    }
                }
            }
        }
    }
}

fn cancelled_handle(key: String, machine: &mut AcquireMachine) -> LockHandle {
    let outcome = machine.cancel();
    info!(lock_key = %key, attempts = machine.attempts(), "lock acquisition cancelled");
    LockHandle::not_acquired(key, outcome)
}

fn is_cancelled(cancel: Option<&watch::Receiver<bool>>) -> bool {
    cancel.is_some_and(|receiver| *receiver.borrow())
}

/// Sleeps for `pause`; returns `true` if cancellation arrived first.
async fn pause_unless_cancelled(
    pause: Duration,
    cancel: Option<&mut watch::Receiver<bool>>,
) -> bool {
    let Some(cancel) = cancel else {
        tokio::time::sleep(pause).await;
        return false;
    };

    // A dropped sender disables the first branch, leaving a plain sleep.
    tokio::select! {
        biased;
        Ok(_) = cancel.wait_for(|cancelled| *cancelled) => true,
        () = tokio::time::sleep(pause) => false,
    }
}
