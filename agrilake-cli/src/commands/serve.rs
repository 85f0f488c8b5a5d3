//! HTTP server command
//!
//! Connects the farm and lake stores, then serves the API until shutdown.

use std::net::SocketAddr;

use agrilake_server::{AgrilakeConfig, StoreBackend};
use anyhow::{Context, Result};
use clap::Parser;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (default: 0.0.0.0:8081)
    #[arg(long, short = 'b', env = "AGRILAKE_BIND")]
    pub bind: Option<SocketAddr>,

    /// Farm store connection string
    #[arg(long, env = "AGRILAKE_FARM_DATABASE_URL")]
    pub farm_database_url: Option<String>,

    /// Data lake store connection string
    #[arg(long, env = "AGRILAKE_LAKE_DATABASE_URL")]
    pub lake_database_url: Option<String>,

    /// Use a volatile in-memory store instead of PostgreSQL
    #[arg(long)]
    pub memory: bool,
}

impl ServeArgs {
    /// Layer CLI flags over environment-derived configuration
    pub fn apply(&self, config: &mut AgrilakeConfig) {
        if let Some(bind) = self.bind {
            config.server.bind_addr = bind;
        }
        if let Some(url) = &self.farm_database_url {
            config.store.farm.database_url = url.clone();
        }
        if let Some(url) = &self.lake_database_url {
            config.store.lake.database_url = url.clone();
        }
        if self.memory {
            config.store.backend = StoreBackend::Memory;
        }
    }
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut config = AgrilakeConfig::from_env().context("Invalid configuration")?;
    args.apply(&mut config);

    tracing::info!(
        bind = %config.server.bind_addr,
        backend = ?config.store.backend,
        "Starting agrilake server"
    );

    // Blocks until shutdown; store connection failure ends the process here
    agrilake_server::serve(config)
        .await
        .context("Server error")?;

    Ok(())
}
