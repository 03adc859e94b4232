//! Turnstile API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod dto;
mod error;
mod handlers;
mod state;

#[cfg(test)]
mod test_support;

use tracing::info;
use turnstile_core::AppError;

use crate::api_config::{ApiConfig, init_tracing};
use crate::api_router::build_router;
use crate::api_services::{build_app_state, connect_and_migrate};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let pool = connect_and_migrate(&config.database_url).await?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let app_state = build_app_state(&config, pool)?;
    let app = build_router(app_state, config.cors_allowed_origin.as_deref())?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "turnstile-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
