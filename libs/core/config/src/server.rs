use crate::{lookup_or_default, lookup_parsed, ConfigError, FromEnv};
use std::net::Ipv4Addr;

/// Server configuration for HTTP APIs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: String, port: u16) -> Self {
        Self { host, port }
    }

    /// Get the server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl FromEnv for ServerConfig {
    /// - HOST: defaults to 0.0.0.0
    /// - PORT: defaults to 8080
    fn from_lookup<L>(lookup: &L) -> Result<Self, ConfigError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let host = lookup_or_default(lookup, "HOST", &Ipv4Addr::UNSPECIFIED.to_string());
        let port = lookup_parsed(lookup, "PORT", "8080")?;

        Ok(Self { host, port })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::UNSPECIFIED.to_string(),
            port: 8080,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_from_env_with_defaults() {
        temp_env::with_vars([("HOST", None::<&str>), ("PORT", None::<&str>)], || {
            let config = ServerConfig::from_env().unwrap();
            assert_eq!(config.address(), "0.0.0.0:8080");
        });
    }

    #[test]
    fn test_server_config_from_lookup_with_custom_values() {
        let lookup = |key: &str| match key {
            "HOST" => Some("127.0.0.1".to_string()),
            "PORT" => Some("3000".to_string()),
            _ => None,
        };
        let config = ServerConfig::from_lookup(&lookup).unwrap();
        assert_eq!(config, ServerConfig::new("127.0.0.1".to_string(), 3000));
    }

    #[test]
    fn test_server_config_port_out_of_range() {
        let lookup = |key: &str| (key == "PORT").then(|| "99999".to_string());
        let err = ServerConfig::from_lookup(&lookup).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, Ipv4Addr::UNSPECIFIED.to_string());
        assert_eq!(config.port, 8080);
    }
}
