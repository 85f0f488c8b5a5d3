//! Application state shared across handlers

use std::sync::Arc;

use crate::store::DocumentStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    farms: Arc<dyn DocumentStore>,
    farm_collection: String,
    lake: Arc<dyn DocumentStore>,
    lake_collection: String,
}

impl AppState {
    pub fn new(
        farms: Arc<dyn DocumentStore>,
        farm_collection: impl Into<String>,
        lake: Arc<dyn DocumentStore>,
        lake_collection: impl Into<String>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                farms,
                farm_collection: farm_collection.into(),
                lake,
                lake_collection: lake_collection.into(),
            }),
        }
    }

    /// Same store for both collections (memory runs, tests)
    pub fn single(store: Arc<dyn DocumentStore>) -> Self {
        Self::new(
            Arc::clone(&store),
            crate::config::DEFAULT_FARM_COLLECTION,
            store,
            crate::config::DEFAULT_LAKE_COLLECTION,
        )
    }

    pub fn farms(&self) -> &dyn DocumentStore {
        self.inner.farms.as_ref()
    }

    pub fn farm_collection(&self) -> &str {
        &self.inner.farm_collection
    }

    pub fn lake(&self) -> &dyn DocumentStore {
        self.inner.lake.as_ref()
    }

    pub fn lake_collection(&self) -> &str {
        &self.inner.lake_collection
    }

    /// Release both stores. Best effort; errors are not surfaced.
    pub async fn close(&self) {
        self.inner.farms.close().await;
        self.inner.lake.close().await;
    }
}
