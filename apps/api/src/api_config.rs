use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use turnstile_application::{
    DEFAULT_CREATION_LOCK_NAMESPACE, DEFAULT_LOCK_KEY_PREFIX, DEFAULT_LOCK_TTL,
    DEFAULT_LOCK_WAIT_TIMEOUT, DEFAULT_POLL_INTERVAL, LockCoordinatorConfig,
};
use turnstile_core::AppError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockBackendConfig {
    Redis { redis_url: String },
    InMemory,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub migrate_only: bool,
    pub database_url: String,
    pub api_host: String,
    pub api_port: u16,
    pub cors_allowed_origin: Option<String>,
    pub lock_backend: LockBackendConfig,
    pub lock: LockCoordinatorConfig,
    pub creation_lock_namespace: String,
}

impl ApiConfig {
    pub fn load() -> Result<Self, AppError> {
        let migrate_only = env::args().nth(1).as_deref() == Some("migrate");

        let database_url = required_env("DATABASE_URL")?;
        let api_host = env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_owned());
        let api_port = env::var("API_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3001);
        let cors_allowed_origin = env::var("CORS_ALLOWED_ORIGIN")
            .ok()
            .filter(|value| !value.trim().is_empty());

        let lock_backend = match env::var("LOCK_BACKEND")
            .unwrap_or_else(|_| "redis".to_owned())
            .as_str()
        {
            "redis" => LockBackendConfig::Redis {
                redis_url: required_non_empty_env("REDIS_URL")?,
            },
            "in_memory" => LockBackendConfig::InMemory,
            other => {
                return Err(AppError::Validation(format!(
                    "LOCK_BACKEND must be either 'redis' or 'in_memory', got '{other}'"
                )));
            }
        };

        let lock = LockCoordinatorConfig {
            key_prefix: env::var("LOCK_KEY_PREFIX")
                .unwrap_or_else(|_| DEFAULT_LOCK_KEY_PREFIX.to_owned()),
            default_lock_ttl: millis_env("LOCK_TTL_MS", DEFAULT_LOCK_TTL)?,
            default_wait_timeout: millis_env("LOCK_WAIT_TIMEOUT_MS", DEFAULT_LOCK_WAIT_TIMEOUT)?,
            poll_interval: millis_env("LOCK_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL)?,
        };
        lock.validate()?;

        let creation_lock_namespace = env::var("USER_CREATION_LOCK_NAMESPACE")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CREATION_LOCK_NAMESPACE.to_owned());

        Ok(Self {
            migrate_only,
            database_url,
            api_host,
            api_port,
            cors_allowed_origin,
            lock_backend,
            lock,
            creation_lock_namespace,
        })
    }

    pub fn socket_address(&self) -> Result<SocketAddr, AppError> {
        let host = IpAddr::from_str(&self.api_host).map_err(|error| {
            AppError::Internal(format!("invalid API_HOST '{}': {error}", self.api_host))
        })?;
        Ok(SocketAddr::from((host, self.api_port)))
    }
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

fn required_env(name: &str) -> Result<String, AppError> {
    env::var(name).map_err(|_| AppError::Validation(format!("{name} is required")))
}

fn required_non_empty_env(name: &str) -> Result<String, AppError> {
    let value = required_env(name)?;
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{name} must not be empty")));
    }

    Ok(value)
}

fn millis_env(name: &str, default: Duration) -> Result<Duration, AppError> {
    parse_millis(name, env::var(name).ok(), default)
}

fn parse_millis(name: &str, raw: Option<String>, default: Duration) -> Result<Duration, AppError> {
    let Some(raw) = raw.filter(|value| !value.trim().is_empty()) else {
        return Ok(default);
    };

    raw.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|error| AppError::Validation(format!("invalid {name} '{raw}': {error}")))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use turnstile_core::AppError;

    use super::{ApiConfig, LockBackendConfig, parse_millis};

    #[test]
    fn unset_millis_fall_back_to_default() {
        let parsed = parse_millis("LOCK_TTL_MS", None, Duration::from_secs(30));
        assert!(matches!(parsed, Ok(value) if value == Duration::from_secs(30)));

        let blank = parse_millis("LOCK_TTL_MS", Some(" ".to_owned()), Duration::from_secs(30));
        assert!(matches!(blank, Ok(value) if value == Duration::from_secs(30)));
    }

    #[test]
    fn millis_are_parsed_as_durations() {
        let parsed = parse_millis("LOCK_POLL_INTERVAL_MS", Some("250".to_owned()), Duration::ZERO);
        assert!(matches!(parsed, Ok(value) if value == Duration::from_millis(250)));
    }

    #[test]
    fn malformed_millis_are_rejected() {
        let parsed = parse_millis("LOCK_TTL_MS", Some("soon".to_owned()), Duration::ZERO);
        assert!(matches!(
            parsed,
            Err(AppError::Validation(message)) if message.starts_with("invalid LOCK_TTL_MS")
        ));
    }

    #[test]
    fn socket_address_rejects_hostnames() {
        let config = ApiConfig {
            migrate_only: false,
            database_url: "postgres://localhost/turnstile".to_owned(),
            api_host: "localhost".to_owned(),
            api_port: 3001,
            cors_allowed_origin: None,
            lock_backend: LockBackendConfig::InMemory,
            lock: Default::default(),
            creation_lock_namespace: "user_creation".to_owned(),
        };

        assert!(config.socket_address().is_err());
        let loopback = ApiConfig {
            api_host: "127.0.0.1".to_owned(),
            ..config
        };
        assert!(matches!(
            loopback.socket_address(),
            Ok(address) if address.port() == 3001
        ));
    }
}
