//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. `main` loads an optional `.env` file first.
//!
//! | Variable             | Default             |
//! |----------------------|---------------------|
//! | `DB_FILE`            | `./data/app.sqlite` |
//! | `PORT`               | `3000`              |
//! | `BIND_ADDR`          | `0.0.0.0`           |
//! | `DB_MAX_CONNECTIONS` | `5`                 |

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use atelier_db::DbConfig;

/// Server configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// SQLite database path (`:memory:` for a throwaway database)
    pub db_file: String,

    /// HTTP port
    pub port: u16,

    /// Address to bind the listener to
    pub bind_addr: IpAddr,

    /// Connection pool size
    pub db_max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            db_file: "./data/app.sqlite".to_string(),
            port: 3000,
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            db_max_connections: 5,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    ///
    /// Missing keys take their defaults; present but unparsable values are
    /// an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ServerConfig::default();

        let config = ServerConfig {
            db_file: lookup("DB_FILE")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.db_file),

            port: parse_or(&lookup, "PORT", defaults.port)?,

            bind_addr: parse_or(&lookup, "BIND_ADDR", defaults.bind_addr)?,

            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.db_max_connections)?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Address the HTTP listener binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// Database pool configuration for this server.
    pub fn db_config(&self) -> DbConfig {
        if self.db_file == atelier_db::pool::IN_MEMORY_PATH {
            DbConfig::in_memory()
        } else {
            DbConfig::new(&self.db_file).max_connections(self.db_max_connections)
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("DB_FILE", "/tmp/atelier.sqlite"),
            ("PORT", "8080"),
            ("BIND_ADDR", "127.0.0.1"),
            ("DB_MAX_CONNECTIONS", "8"),
        ]))
        .unwrap();

        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:8080");
        assert_eq!(config.db_config().max_connections, 8);
    }

    #[test]
    fn test_invalid_port() {
        let err = ServerConfig::from_lookup(lookup(&[("PORT", "eighty")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for PORT");
    }

    #[test]
    fn test_zero_pool_size_rejected() {
        assert!(ServerConfig::from_lookup(lookup(&[("DB_MAX_CONNECTIONS", "0")])).is_err());
    }

    #[test]
    fn test_memory_database() {
        let config = ServerConfig::from_lookup(lookup(&[("DB_FILE", ":memory:")])).unwrap();
        assert!(config.db_config().is_in_memory());
    }
}
