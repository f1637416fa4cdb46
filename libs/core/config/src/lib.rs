pub mod server;
pub mod tracing;

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Static identity of the running binary, exposed by the health endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppInfo {
    pub name: &'static str,
    pub version: &'static str,
}

/// Builds an [`AppInfo`] from the calling crate's package metadata.
#[macro_export]
macro_rules! app_info {
    () => {
        $crate::AppInfo {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
        }
    };
}

/// Application environment
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn from_env() -> Self {
        Self::from_lookup(&process_env)
    }

    /// Reads `APP_ENV`; anything other than "production" is development.
    pub fn from_lookup<L>(lookup: &L) -> Self
    where
        L: Fn(&str) -> Option<String>,
    {
        let app_env = lookup_or_default(lookup, "APP_ENV", "development");

        if app_env.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Configuration that can be parsed from key/value settings.
///
/// Implementors only write [`FromEnv::from_lookup`], a pure function of the
/// lookup it is given. [`FromEnv::from_env`] feeds it the process environment,
/// while tests can feed it a map.
pub trait FromEnv: Sized {
    fn from_lookup<L>(lookup: &L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>;

    fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&process_env)
    }
}

/// Lookup backed by `std::env`.
pub fn process_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Value for `key`, or `default` when the lookup has none
pub fn lookup_or_default<L>(lookup: &L, key: &str, default: &str) -> String
where
    L: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Value for `key`, or [`ConfigError::MissingEnvVar`]
pub fn lookup_required<L>(lookup: &L, key: &str) -> Result<String, ConfigError>
where
    L: Fn(&str) -> Option<String>,
{
    lookup(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parses `key` (falling back to `default`) into `T`.
pub fn lookup_parsed<L, T>(lookup: &L, key: &str, default: &str) -> Result<T, ConfigError>
where
    L: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    lookup_or_default(lookup, key, default)
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        })
}

/// Helper to load an environment variable with a default value
pub fn env_or_default(key: &str, default: &str) -> String {
    lookup_or_default(&process_env, key, default)
}

/// Helper to load an environment variable or return an error
pub fn env_required(key: &str) -> Result<String, ConfigError> {
    lookup_required(&process_env, key)
}
