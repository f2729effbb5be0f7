use std::str::FromStr;
use std::time::Duration;

use tripwire_core::evaluation::EvaluatorConfig;

use crate::auth::jwt::JwtConfig;

/// A configuration value was missing or malformed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// All fields except the database URL and the token secret have defaults
/// suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `5000`).
    pub port: u16,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Pool size (default: `20`).
    pub database_max_connections: u32,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on draining background tasks at shutdown (default: `5`).
    pub shutdown_timeout_secs: u64,
    /// Token verification settings.
    pub jwt: JwtConfig,
    /// Broadcast buffer for live notifications (default: `1024`).
    pub event_bus_capacity: usize,
    /// Upper bound on each storage call made during evaluation (default: `5000`).
    pub store_timeout_ms: u64,
    /// Serialize trigger decisions per rule (default: `true`).
    pub serialize_rule_triggers: bool,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                  |
    /// |----------------------------|--------------------------|
    /// | `HOST`                     | `0.0.0.0`                |
    /// | `PORT`                     | `5000`                   |
    /// | `DATABASE_URL`             | required                 |
    /// | `DATABASE_MAX_CONNECTIONS` | `20`                     |
    /// | `CORS_ORIGINS`             | `http://localhost:3000`  |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS`    | `5`                      |
    /// | `JWT_SECRET`               | required                 |
    /// | `EVENT_BUS_CAPACITY`       | `1024`                   |
    /// | `STORE_TIMEOUT_MS`         | `5000`                   |
    /// | `SERIALIZE_RULE_TRIGGERS`  | `true`                   |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host,
            port: parse_or(&lookup, "PORT", 5000)?,
            database_url,
            database_max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                tripwire_db::DEFAULT_MAX_CONNECTIONS,
            )?,
            cors_origins,
            request_timeout_secs: parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?,
            shutdown_timeout_secs: parse_or(&lookup, "SHUTDOWN_TIMEOUT_SECS", 5)?,
            jwt: JwtConfig::from_lookup(&lookup)?,
            event_bus_capacity: parse_or(
                &lookup,
                "EVENT_BUS_CAPACITY",
                tripwire_events::DEFAULT_CAPACITY,
            )?,
            store_timeout_ms: parse_or(&lookup, "STORE_TIMEOUT_MS", 5000)?,
            serialize_rule_triggers: parse_or(&lookup, "SERIALIZE_RULE_TRIGGERS", true)?,
        })
    }

    /// Engine settings derived from this configuration.
    pub fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            store_timeout: Duration::from_millis(self.store_timeout_ms),
            serialize_per_rule: self.serialize_rule_triggers,
        }
    }
}

/// Parse `name` if set, otherwise use `default`.
pub(crate) fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value: raw,
        }),
    }
}
