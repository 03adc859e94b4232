use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;
use turnstile_application::{LockCoordinator, LockStore, UserService, UserServiceConfig};
use turnstile_core::AppError;
use turnstile_infrastructure::{InMemoryLockStore, PostgresUserRepository, RedisLockStore};

use crate::api_config::{ApiConfig, LockBackendConfig};
use crate::state::AppState;

pub fn build_app_state(config: &ApiConfig, postgres_pool: PgPool) -> Result<AppState, AppError> {
    let (lock_store, redis_client): (Arc<dyn LockStore>, Option<redis::Client>) =
        match &config.lock_backend {
            LockBackendConfig::Redis { redis_url } => {
                let client = redis::Client::open(redis_url.as_str())
                    .map_err(|error| AppError::Validation(format!("invalid REDIS_URL: {error}")))?;
                (Arc::new(RedisLockStore::new(client.clone())), Some(client))
            }
            LockBackendConfig::InMemory => (Arc::new(InMemoryLockStore::new()), None),
        };
    info!(
        backend = if redis_client.is_some() { "redis" } else { "in_memory" },
        key_prefix = %config.lock.key_prefix,
        "lock store configured"
    );

    let lock_coordinator = LockCoordinator::new(lock_store, config.lock.clone())?;
    let user_service = UserService::new(
        Arc::new(PostgresUserRepository::new(postgres_pool.clone())),
        lock_coordinator,
        UserServiceConfig {
            creation_lock_namespace: config.creation_lock_namespace.clone(),
            lock_options: None,
        },
    );

    Ok(AppState {
        user_service,
        postgres_pool,
        redis_client,
    })
}
