//! Server configuration read from the process environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use noteful_core::{Error, Result};
use noteful_db::PoolConfig;

/// Default connection string when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/noteful-app";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 8080;

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Directory served for unmatched GET requests.
    pub public_dir: PathBuf,
    /// `APP_ENV=development`: error responses carry the underlying detail.
    pub development: bool,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    /// Raw `ALLOWED_ORIGINS` value, parsed by [`crate::parse_allowed_origins`].
    pub allowed_origins: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            public_dir: PathBuf::from("public"),
            development: false,
            db_max_connections: 2,
            db_min_connections: 1,
            allowed_origins: None,
        }
    }
}

impl ServerConfig {
    /// Read configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |---|---|
    /// | `DATABASE_URL` | `postgres://localhost/noteful-app` |
    /// | `HOST` | `0.0.0.0` |
    /// | `PORT` | `8080` |
    /// | `PUBLIC_DIR` | `public` |
    /// | `APP_ENV` | unset (production) |
    /// | `DB_MAX_CONNECTIONS` | `2` |
    /// | `DB_MIN_CONNECTIONS` | `1` |
    /// | `ALLOWED_ORIGINS` | `http://localhost:8080,http://localhost:3000` |
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_number(&lookup, "PORT", defaults.port)?,
            public_dir: lookup("PUBLIC_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.public_dir),
            development: lookup("APP_ENV").is_some_and(|v| v == "development"),
            db_max_connections: parse_number(
                &lookup,
                "DB_MAX_CONNECTIONS",
                defaults.db_max_connections,
            )?,
            db_min_connections: parse_number(
                &lookup,
                "DB_MIN_CONNECTIONS",
                defaults.db_min_connections,
            )?,
            allowed_origins: lookup("ALLOWED_ORIGINS"),
        };

        if config.db_max_connections == 0 {
            return Err(Error::Config(
                "DB_MAX_CONNECTIONS must be at least 1".to_string(),
            ));
        }
        if config.db_min_connections > config.db_max_connections {
            return Err(Error::Config(format!(
                "DB_MIN_CONNECTIONS ({}) exceeds DB_MAX_CONNECTIONS ({})",
                config.db_min_connections, config.db_max_connections
            )));
        }

        Ok(config)
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid HOST/PORT '{}:{}': {}", self.host, self.port, e)))
    }

    /// Pool settings derived from the `DB_*` variables.
    pub fn pool_config(&self) -> PoolConfig {
        PoolConfig::new()
            .max_connections(self.db_max_connections)
            .min_connections(self.db_min_connections)
    }
}

fn parse_number<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid {} '{}': {}", key, raw, e))),
    }
}
