use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use tracing::info;
use turnstile_core::AppError;

static MIGRATOR: Migrator = sqlx::migrate!("../../crates/infrastructure/migrations");

const MAX_CONNECTIONS: u32 = 10;

pub async fn connect_and_migrate(database_url: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;
    info!(migrations = MIGRATOR.iter().count(), "database schema is up to date");

    Ok(pool)
}
