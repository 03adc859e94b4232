use sqlx::PgPool;
use turnstile_application::UserService;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub postgres_pool: PgPool,
    /// Present only when locks live in Redis.
    pub redis_client: Option<redis::Client>,
}
