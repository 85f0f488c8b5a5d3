//! Shared "validate non-empty batch, map, bulk-write" skeleton
//!
//! Used by farm bulk inserts, the sample seeding route, and both lake
//! ingestion routes. Only the mapping step and target collection differ.

use serde::Serialize;
use serde_json::Value;

use super::error::ApiError;
use crate::models::ValidationError;
use crate::store::{timed, DocumentId, DocumentStore, StoreError, STORE_OP_TIMEOUT};

/// Ids reported back for a batch write
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchInserted {
    pub inserted_ids: Vec<DocumentId>,
    pub count: usize,
}

impl From<Vec<DocumentId>> for BatchInserted {
    fn from(inserted_ids: Vec<DocumentId>) -> Self {
        let count = inserted_ids.len();
        Self { inserted_ids, count }
    }
}

/// Reject an empty batch, map each item to a document, and write them in one call.
pub async fn insert_batch<T, F>(
    store: &dyn DocumentStore,
    collection: &str,
    items: Vec<T>,
    on_empty: ValidationError,
    context: &'static str,
    map: F,
) -> Result<BatchInserted, ApiError>
where
    F: FnMut(T) -> serde_json::Result<Value>,
{
    if items.is_empty() {
        return Err(on_empty.into());
    }

    let docs = items
        .into_iter()
        .map(map)
        .collect::<serde_json::Result<Vec<_>>>()
        .map_err(|e| ApiError::store(context)(StoreError::Encode(e)))?;

    let ids = timed(
        STORE_OP_TIMEOUT,
        "insert_many",
        store.insert_many(collection, docs),
    )
    .await
    .map_err(ApiError::store(context))?;

    Ok(BatchInserted::from(ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Filter, MemoryStore};
    use serde_json::json;

    #[tokio::test]
    async fn empty_batch_is_rejected_without_store_access() {
        let store = MemoryStore::new();
        store.close().await;

        let err = insert_batch(
            &store,
            "farms",
            Vec::<Value>::new(),
            ValidationError::no_farm_data(),
            "Failed to insert farm data",
            Ok,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ApiError::Validation(ValidationError::EmptyBatch { .. })));
    }

    #[tokio::test]
    async fn maps_then_writes_every_item() {
        let store = MemoryStore::new();

        let inserted = insert_batch(
            &store,
            "lake",
            vec![1, 2, 3],
            ValidationError::no_data(),
            "Failed to push to data lake",
            |n| Ok(json!({ "n": n, "wrapped": true })),
        )
        .await
        .unwrap();

        assert_eq!(inserted.count, 3);
        assert_eq!(inserted.inserted_ids.len(), 3);

        let docs = store.find("lake", &Filter::All).await.unwrap();
        assert!(docs.iter().all(|d| d.body["wrapped"] == true));
    }

    #[tokio::test]
    async fn store_failure_carries_context() {
        let store = MemoryStore::new();
        store.close().await;

        let err = insert_batch(
            &store,
            "farms",
            vec![json!({})],
            ValidationError::no_farm_data(),
            "Failed to insert farm data",
            Ok,
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.message(),
            "Failed to insert farm data: store unavailable: store is closed"
        );
    }

    #[test]
    fn serializes_camel_case() {
        let value = serde_json::to_value(BatchInserted::from(vec![uuid::Uuid::nil()])).unwrap();
        assert_eq!(value["count"], 1);
        assert_eq!(value["insertedIds"][0], "00000000-0000-0000-0000-000000000000");
    }
}
