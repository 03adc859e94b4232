//! Application services and ports.

#![forbid(unsafe_code)]

mod lock_coordinator;
mod user_service;

#[cfg(test)]
mod test_support;

pub use lock_coordinator::{
    AcquireOutcome, DEFAULT_LOCK_KEY_PREFIX, DEFAULT_LOCK_TTL, DEFAULT_LOCK_WAIT_TIMEOUT,
    DEFAULT_POLL_INTERVAL, LockCoordinator, LockCoordinatorConfig, LockHandle, LockOptions,
    LockStore,
};
pub use user_service::{
    DEFAULT_CREATION_LOCK_NAMESPACE, UpsertOutcome, UpsertUserInput, UserInput, UserRepository,
    UserService, UserServiceConfig,
};
