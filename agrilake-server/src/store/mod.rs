//! Document store - named collections of JSON documents
//!
//! Handlers talk to the store through [`DocumentStore`] so the backing
//! database can be swapped (PostgreSQL JSONB in production, memory in tests).
//!
//! Every call is a single store operation; callers wrap it in [`timed`] to
//! bound it with a per-request deadline.

pub mod memory;
pub mod pg;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

pub use memory::MemoryStore;
pub use pg::{ConnectOptions, PgDocumentStore};

/// Store-assigned document identifier
pub type DocumentId = Uuid;

/// Deadline for a single-document insert
pub const INSERT_ONE_TIMEOUT: Duration = Duration::from_secs(5);

/// Deadline for batch inserts and reads
pub const STORE_OP_TIMEOUT: Duration = Duration::from_secs(10);

/// Store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("connection failed: {0}")]
    Connect(String),

    #[error("ping failed: {0}")]
    Ping(String),

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("{} timed out after {}s", .op, .limit.as_secs())]
    Timeout { op: &'static str, limit: Duration },

    #[error("failed to encode document: {0}")]
    Encode(serde_json::Error),

    #[error("failed to decode document: {0}")]
    Decode(serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Query filter over a collection
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Filter {
    /// Every document in the collection
    #[default]
    All,

    /// Documents whose top-level `field` equals `value` exactly
    Eq { field: String, value: Value },
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Optional equality filter; `None` and empty strings mean "everything"
    pub fn eq_if_present(field: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => Self::eq(field, v),
            _ => Self::All,
        }
    }

    pub fn matches(&self, doc: &Value) -> bool {
        match self {
            Self::All => true,
            Self::Eq { field, value } => doc.get(field) == Some(value),
        }
    }

    /// JSON object usable for containment queries (`body @> filter`)
    pub fn as_containment(&self) -> Option<Value> {
        match self {
            Self::All => None,
            Self::Eq { field, value } => {
                let mut obj = Map::new();
                obj.insert(field.clone(), value.clone());
                Some(Value::Object(obj))
            }
        }
    }
}

/// A document as read back from the store
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub body: Value,
}

impl StoredDocument {
    /// Body with the store id merged in as `_id` (objects only)
    pub fn into_json_with_id(self) -> Value {
        match self.body {
            Value::Object(mut obj) => {
                obj.insert("_id".to_string(), Value::String(self.id.to_string()));
                Value::Object(obj)
            }
            other => other,
        }
    }
}

/// Insert/query capability over named collections.
///
/// Implementations must be safe to share across concurrent requests.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert_one(&self, collection: &str, doc: Value) -> Result<DocumentId, StoreError>;

    /// Insert all documents or none; ids are returned in input order.
    async fn insert_many(
        &self,
        collection: &str,
        docs: Vec<Value>,
    ) -> Result<Vec<DocumentId>, StoreError>;

    /// Matching documents in insertion order
    async fn find(&self, collection: &str, filter: &Filter)
        -> Result<Vec<StoredDocument>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    /// Best-effort disconnect
    async fn close(&self);
}

/// Run a store operation under a deadline.
pub async fn timed<T, F>(limit: Duration, op: &'static str, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, StoreError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(op, limit_secs = limit.as_secs(), "store operation timed out");
            Err(StoreError::Timeout { op, limit })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn eq_filter_matches_exactly() {
        let filter = Filter::eq("farmer", "Ada");
        assert!(filter.matches(&json!({"farmer": "Ada"})));
        assert!(!filter.matches(&json!({"farmer": "ada"})));
        assert!(!filter.matches(&json!({"farmer": "Ada "})));
        assert!(!filter.matches(&json!({"other": "Ada"})));
        assert!(Filter::All.matches(&json!({})));
    }

    #[test]
    fn empty_query_value_means_all() {
        assert_eq!(Filter::eq_if_present("sourceDB", Some("")), Filter::All);
        assert_eq!(Filter::eq_if_present("sourceDB", None), Filter::All);
        assert_eq!(
            Filter::eq_if_present("sourceDB", Some("Neo4j")),
            Filter::eq("sourceDB", "Neo4j")
        );
    }

    #[test]
    fn containment_object() {
        assert_eq!(Filter::All.as_containment(), None);
        assert_eq!(
            Filter::eq("farmer", "Ada").as_containment(),
            Some(json!({"farmer": "Ada"}))
        );
    }

    #[test]
    fn id_is_merged_into_object_bodies() {
        let id = Uuid::nil();
        let doc = StoredDocument {
            id,
            body: json!({"sourceDB": "Neo4j"}),
        };
        let value = doc.into_json_with_id();
        assert_eq!(value["_id"], id.to_string());
        assert_eq!(value["sourceDB"], "Neo4j");
    }

    #[tokio::test(start_paused = true)]
    async fn timed_reports_timeout() {
        let result: Result<(), StoreError> = timed(Duration::from_secs(5), "insert_one", async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(())
        })
        .await;

        match result {
            Err(StoreError::Timeout { op, limit }) => {
                assert_eq!(op, "insert_one");
                assert_eq!(limit, Duration::from_secs(5));
            }
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn timed_passes_through_results() {
        let value = timed(STORE_OP_TIMEOUT, "find", async { Ok::<_, StoreError>(7) })
            .await
            .unwrap();
        assert_eq!(value, 7);
    }
}
