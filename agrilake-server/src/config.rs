//! Process configuration - compiled-in defaults with environment overrides
//!
//! Environment variables:
//! - `AGRILAKE_BIND`: listen address (default: 0.0.0.0:8081)
//! - `AGRILAKE_FARM_DATABASE_URL`: farm store (default: postgres://localhost/farmdb)
//! - `AGRILAKE_LAKE_DATABASE_URL`: lake store (default: postgres://localhost/datalake)
//! - `AGRILAKE_FARM_COLLECTION`: farm collection name (default: farms)
//! - `AGRILAKE_LAKE_COLLECTION`: lake collection name (default: lake)
//! - `AGRILAKE_BODY_LIMIT`: max request body in bytes (default: 64 MiB)

use std::net::SocketAddr;

use crate::store::ConnectOptions;

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_FARM_DATABASE_URL: &str = "postgres://localhost/farmdb";
pub const DEFAULT_LAKE_DATABASE_URL: &str = "postgres://localhost/datalake";
pub const DEFAULT_FARM_COLLECTION: &str = "farms";
pub const DEFAULT_LAKE_COLLECTION: &str = "lake";
pub const DEFAULT_BODY_LIMIT: usize = 64 * 1024 * 1024;

/// HTTP listener configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (default: 0.0.0.0:8081)
    pub bind_addr: SocketAddr,
    /// Largest accepted request body in bytes; replaces axum's 2 MiB default
    pub body_limit: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

/// One store connection and the collection it serves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreTarget {
    pub database_url: String,
    pub collection: String,
}

/// Backing store selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreBackend {
    #[default]
    Postgres,
    /// Volatile in-process store; data is lost on exit
    Memory,
}

/// Farm and lake store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    pub farm: StoreTarget,
    pub lake: StoreTarget,
    pub connect: ConnectOptions,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Postgres,
            farm: StoreTarget {
                database_url: DEFAULT_FARM_DATABASE_URL.to_string(),
                collection: DEFAULT_FARM_COLLECTION.to_string(),
            },
            lake: StoreTarget {
                database_url: DEFAULT_LAKE_DATABASE_URL.to_string(),
                collection: DEFAULT_LAKE_COLLECTION.to_string(),
            },
            connect: ConnectOptions::default(),
        }
    }
}

/// Full process configuration
#[derive(Debug, Clone, Default)]
pub struct AgrilakeConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

impl AgrilakeConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup (for testing)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(bind) = get("AGRILAKE_BIND") {
            config.server.bind_addr = bind.parse().map_err(|e| ConfigError::Invalid {
                var: "AGRILAKE_BIND",
                reason: format!("{}", e),
            })?;
        }
        if let Some(limit) = get("AGRILAKE_BODY_LIMIT") {
            config.server.body_limit = limit.trim().parse().map_err(|e| ConfigError::Invalid {
                var: "AGRILAKE_BODY_LIMIT",
                reason: format!("{}", e),
            })?;
        }
        if let Some(url) = get("AGRILAKE_FARM_DATABASE_URL") {
            config.store.farm.database_url = url;
        }
        if let Some(url) = get("AGRILAKE_LAKE_DATABASE_URL") {
            config.store.lake.database_url = url;
        }
        if let Some(name) = get("AGRILAKE_FARM_COLLECTION") {
            config.store.farm.collection = name;
        }
        if let Some(name) = get("AGRILAKE_LAKE_COLLECTION") {
            config.store.lake.collection = name;
        }

        Ok(config)
    }
}
