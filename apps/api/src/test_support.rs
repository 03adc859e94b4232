use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use turnstile_application::{
    LockCoordinator, LockCoordinatorConfig, UserService, UserServiceConfig,
};
use turnstile_infrastructure::{InMemoryLockStore, InMemoryUserRepository};

use crate::state::AppState;

/// Nothing listens on port 1, so database checks fail fast.
const UNREACHABLE_DATABASE_URL: &str = "postgres://turnstile@127.0.0.1:1/turnstile";

/// State backed by in-memory adapters and a pool that never connects.
pub(crate) fn in_memory_state() -> AppState {
    let lock_coordinator = LockCoordinator::new(
        Arc::new(InMemoryLockStore::new()),
        LockCoordinatorConfig::default(),
    )
    .unwrap_or_else(|error| panic!("default lock config should be valid: {error}"));
    let postgres_pool = PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy(UNREACHABLE_DATABASE_URL)
        .unwrap_or_else(|error| panic!("lazy pool should build: {error}"));

    AppState {
        user_service: UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            lock_coordinator,
            UserServiceConfig::default(),
        ),
        postgres_pool,
        redis_client: None,
    }
}
