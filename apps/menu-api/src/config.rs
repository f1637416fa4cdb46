use axum_helpers::CorsPolicy;
use block_storage::StorageConfig;
use core_config::{AppInfo, ConfigError, FromEnv, app_info, lookup_parsed, server::ServerConfig};
use database::postgres::PostgresConfig;
use std::time::Duration;

pub use core_config::Environment;

/// Menu API configuration, composed from the shared config components
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub environment: Environment,
    /// Upper bound for a single request, `API_ROUTE_TIMEOUT_MS`
    pub route_timeout: Duration,
    pub cors: CorsPolicy,
    /// Apply pending migrations before serving
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        Ok(Self::from_lookup(&core_config::process_env)?)
    }

    /// - DATABASE_URL: required
    /// - API_ROUTE_TIMEOUT_MS: defaults to 10000
    /// - CORS_ALLOWED_ORIGIN: comma-separated; blank means any origin outside production
    /// - RUN_MIGRATIONS: defaults to true
    pub fn from_lookup<L>(lookup: &L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_lookup(lookup);
        let timeout_ms: u64 = lookup_parsed(lookup, "API_ROUTE_TIMEOUT_MS", "10000")?;
        let cors = CorsPolicy::from_origins(
            &lookup("CORS_ALLOWED_ORIGIN").unwrap_or_default(),
            environment.is_development(),
        );

        Ok(Self {
            app: app_info!(),
            database: PostgresConfig::from_lookup(lookup)?,
            server: ServerConfig::from_lookup(lookup)?,
            storage: StorageConfig::from_lookup(lookup)?,
            route_timeout: Duration::from_millis(timeout_ms),
            cors,
            run_migrations: lookup_parsed(lookup, "RUN_MIGRATIONS", "true")?,
            environment,
        })
    }
}
