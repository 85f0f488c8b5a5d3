//! agrilake-server: farm records and agriculture data lake over HTTP
//!
//! Persists farm watering records and forwards upstream records
//! (IndexedDB, Neo4j) into a shared data lake collection.

pub mod config;
pub mod http;
pub mod models;
pub mod state;
pub mod store;

use std::sync::Arc;

pub use config::{AgrilakeConfig, ServerConfig, StoreBackend, StoreConfig, StoreTarget};
pub use http::{build_router, ApiError};
pub use state::AppState;

use store::{DocumentStore, MemoryStore, PgDocumentStore, StoreError};

/// Failure before the server starts accepting requests
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to connect to {store} store: {source}")]
    Store {
        store: &'static str,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Server(#[from] http::ServerError),
}

/// Open both stores. Any failure is fatal.
pub async fn connect_stores(config: &StoreConfig) -> Result<AppState, StartupError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store - data is lost on exit");
            Ok(AppState::new(
                Arc::new(MemoryStore::new()),
                config.farm.collection.clone(),
                Arc::new(MemoryStore::new()),
                config.lake.collection.clone(),
            ))
        }
        StoreBackend::Postgres => {
            let farms = PgDocumentStore::connect(&config.farm.database_url, &config.connect)
                .await
                .map_err(|source| StartupError::Store { store: "farm", source })?;
            tracing::info!(collection = %config.farm.collection, "Connected to farm store");

            let lake = PgDocumentStore::connect(&config.lake.database_url, &config.connect).await;
            let lake = match lake {
                Ok(lake) => lake,
                Err(source) => {
                    farms.close().await;
                    return Err(StartupError::Store { store: "lake", source });
                }
            };
            tracing::info!(collection = %config.lake.collection, "Connected to lake store");

            Ok(AppState::new(
                Arc::new(farms),
                config.farm.collection.clone(),
                Arc::new(lake),
                config.lake.collection.clone(),
            ))
        }
    }
}

/// Connect, serve until shutdown, then release the stores.
///
/// The listener is only bound after both stores are reachable.
pub async fn serve(config: AgrilakeConfig) -> Result<(), StartupError> {
    let state = connect_stores(&config.store).await?;

    let result = http::run_server(state.clone(), &config.server).await;

    state.close().await;
    tracing::info!("Disconnected from stores");

    result.map_err(StartupError::from)
}
