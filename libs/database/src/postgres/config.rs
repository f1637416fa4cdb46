use sea_orm::ConnectOptions;
use std::time::Duration;
use tracing::log::LevelFilter;

#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, lookup_parsed, lookup_required};

/// PostgreSQL connection pool settings
///
/// Built manually or, with the `config` feature, from the environment:
///
/// ```ignore
/// let config = PostgresConfig::from_env()?;
/// let db = database::postgres::connect_from_config(config).await?;
/// ```
#[derive(Clone, Debug)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    /// Log every statement through sqlx
    pub sqlx_logging: bool,
    pub sqlx_logging_level: LevelFilter,
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_pool_size(url: impl Into<String>, max_connections: u32, min_connections: u32) -> Self {
        Self {
            max_connections,
            min_connections,
            ..Self::new(url)
        }
    }

    pub fn into_connect_options(self) -> ConnectOptions {
        let mut opt = ConnectOptions::new(&self.url);
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
            .idle_timeout(Duration::from_secs(self.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(self.max_lifetime_secs))
            .sqlx_logging(self.sqlx_logging)
            .sqlx_logging_level(self.sqlx_logging_level);
        opt
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: 20,
            min_connections: 2,
            connect_timeout_secs: 8,
            acquire_timeout_secs: 8,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
            sqlx_logging: false,
            sqlx_logging_level: LevelFilter::Debug,
        }
    }
}

/// Environment variables:
/// - `DATABASE_URL` (required)
/// - `DB_MAX_CONNECTIONS` (default: 20)
/// - `DB_MIN_CONNECTIONS` (default: 2)
/// - `DB_CONNECT_TIMEOUT_SECS` (default: 8)
/// - `DB_ACQUIRE_TIMEOUT_SECS` (default: 8)
/// - `DB_IDLE_TIMEOUT_SECS` (default: 300)
/// - `DB_MAX_LIFETIME_SECS` (default: 1800)
/// - `DB_SQLX_LOGGING` (default: false)
#[cfg(feature = "config")]
impl FromEnv for PostgresConfig {
    fn from_lookup<L>(lookup: &L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            url: lookup_required(lookup, "DATABASE_URL")?,
            max_connections: lookup_parsed(lookup, "DB_MAX_CONNECTIONS", "20")?,
            min_connections: lookup_parsed(lookup, "DB_MIN_CONNECTIONS", "2")?,
            connect_timeout_secs: lookup_parsed(lookup, "DB_CONNECT_TIMEOUT_SECS", "8")?,
            acquire_timeout_secs: lookup_parsed(lookup, "DB_ACQUIRE_TIMEOUT_SECS", "8")?,
            idle_timeout_secs: lookup_parsed(lookup, "DB_IDLE_TIMEOUT_SECS", "300")?,
            max_lifetime_secs: lookup_parsed(lookup, "DB_MAX_LIFETIME_SECS", "1800")?,
            sqlx_logging: lookup_parsed(lookup, "DB_SQLX_LOGGING", "false")?,
            sqlx_logging_level: LevelFilter::Debug,
        })
    }
}
