//! User management ports and application service.
//!
//! Creation is guarded by a distributed lock on the user's name so that
//! concurrent requests for the same name do one existence check and one
//! write at a time. The repository's uniqueness constraint stays the final
//! arbiter when the lock is bypassed or expires early.

mod creation;
mod inputs;
mod ports;
mod records;


use std::sync::Arc;

use turnstile_core::AppError;
use turnstile_domain::{UserId, UserName};

use crate::{LockCoordinator, LockOptions};

pub use inputs::{UpsertOutcome, UpsertUserInput, UserInput};
pub use ports::UserRepository;

/// Namespace of the lock taken while creating a user.
pub const DEFAULT_CREATION_LOCK_NAMESPACE: &str = "user_creation";

/// Configuration of the user service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserServiceConfig {
    /// Namespace joined with the user name to form the lock resource key.
    pub creation_lock_namespace: String,
    /// Acquisition options; `None` uses the coordinator defaults.
    pub lock_options: Option<LockOptions>,
}

impl Default for UserServiceConfig {
    fn default() -> Self {
        Self {
            creation_lock_namespace: DEFAULT_CREATION_LOCK_NAMESPACE.to_owned(),
            lock_options: None,
        }
    }
}

/// Application service for user records.
#[derive(Clone)]
pub struct UserService {
    user_repository: Arc<dyn UserRepository>,
    lock_coordinator: LockCoordinator,
    config: UserServiceConfig,
}

impl UserService {
    /// Creates a new user service.
    #[must_use]
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        lock_coordinator: LockCoordinator,
        config: UserServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            lock_coordinator,
            config,
        }
    }

    fn creation_resource_key(&self, name: &UserName) -> String {
        format!("{}:{name}", self.config.creation_lock_namespace)
    }

    fn lock_options(&self) -> LockOptions {
        self.config
            .lock_options
            .unwrap_or_else(|| self.lock_coordinator.config().default_options())
    }
}

fn already_exists(name: &UserName) -> AppError {
    AppError::Conflict(format!("user with name '{name}' already exists"))
}

fn not_found(id: UserId) -> AppError {
    AppError::NotFound(format!("user not found with id: {id}"))
}

/// Maps a storage uniqueness violation onto the business conflict.
fn conflict_as_already_exists(error: AppError, name: &UserName) -> AppError {
    match error {
        AppError::Conflict(_) => already_exists(name),
        other => other,
    }
}
