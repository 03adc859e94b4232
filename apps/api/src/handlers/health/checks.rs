use redis::AsyncCommands;

use super::*;

fn failed(detail: String) -> HealthDependencyStatus {
    HealthDependencyStatus {
        status: "error",
        detail: Some(detail),
    }
}

pub(super) async fn check_postgres(pool: &sqlx::PgPool) -> HealthDependencyStatus {
    match sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(pool).await {
        Ok(_) => HealthDependencyStatus {
            status: "ok",
            detail: None,
        },
        Err(error) => failed(format!("postgres check failed: {error}")),
    }
}

/// Pings the lock store; `disabled` when locks are kept in process.
pub(super) async fn check_redis(redis_client: Option<redis::Client>) -> HealthDependencyStatus {
    let Some(redis_client) = redis_client else {
        return HealthDependencyStatus {
            status: "disabled",
            detail: None,
        };
    };

    let mut connection = match redis_client.get_multiplexed_async_connection().await {
        Ok(connection) => connection,
        Err(error) => return failed(format!("redis connection failed: {error}")),
    };

    match connection.ping::<String>().await {
        Ok(value) if value.eq_ignore_ascii_case("pong") => HealthDependencyStatus {
            status: "ok",
            detail: None,
        },
        Ok(value) => failed(format!("unexpected redis ping response: {value}")),
        Err(error) => failed(format!("redis ping failed: {error}")),
    }
}
