//! PostgreSQL-backed document store
//!
//! Collections live in a single JSONB table keyed by collection name.
//! Equality filters are answered with JSONB containment (`body @> $filter`),
//! which for scalar fields is exact equality.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{timed, DocumentId, DocumentStore, Filter, StoreError, StoredDocument};

/// Default maximum connections for the pool.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Default bound on connect + ping at startup.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Options for opening a store connection
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// Document store over a PostgreSQL pool
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Connect, ping, and make sure the documents table exists.
    ///
    /// Each step (connect, ping, schema bootstrap) is bounded by
    /// `options.connect_timeout`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = PgDocumentStore::connect("postgres://localhost/farmdb", &ConnectOptions::default()).await?;
    /// ```
    pub async fn connect(database_url: &str, options: &ConnectOptions) -> Result<Self, StoreError> {
        let limit = options.connect_timeout;

        let pool = tokio::time::timeout(
            limit,
            PgPoolOptions::new()
                .max_connections(options.max_connections)
                .acquire_timeout(limit)
                .connect(database_url),
        )
        .await
        .map_err(|_| StoreError::Connect(format!("timed out after {}s", limit.as_secs())))?
        .map_err(|e| StoreError::Connect(e.to_string()))?;

        let store = Self { pool };

        tokio::time::timeout(limit, store.ping())
            .await
            .map_err(|_| StoreError::Ping(format!("timed out after {}s", limit.as_secs())))??;

        timed(limit, "ensure_schema", store.ensure_schema()).await?;

        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                seq BIGSERIAL PRIMARY KEY,
                id UUID NOT NULL UNIQUE,
                collection TEXT NOT NULL,
                body JSONB NOT NULL,
                inserted_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS documents_collection_idx ON documents (collection, seq)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert_one(&self, collection: &str, doc: Value) -> Result<DocumentId, StoreError> {
        let id = Uuid::new_v4();

        sqlx::query("INSERT INTO documents (id, collection, body) VALUES ($1, $2, $3)")
            .bind(id)
            .bind(collection)
            .bind(doc)
            .execute(&self.pool)
            .await?;

        Ok(id)
    }

    async fn insert_many(
        &self,
        collection: &str,
        docs: Vec<Value>,
    ) -> Result<Vec<DocumentId>, StoreError> {
        let ids: Vec<Uuid> = docs.iter().map(|_| Uuid::new_v4()).collect();

        // Single statement: all rows land or none do
        sqlx::query(
            r#"
            INSERT INTO documents (id, collection, body)
            SELECT t.id, $1, t.body
            FROM UNNEST($2::uuid[], $3::jsonb[]) WITH ORDINALITY AS t(id, body, ord)
            ORDER BY t.ord
            "#,
        )
        .bind(collection)
        .bind(&ids)
        .bind(&docs)
        .execute(&self.pool)
        .await?;

        Ok(ids)
    }

    async fn find(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> Result<Vec<StoredDocument>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, body
            FROM documents
            WHERE collection = $1
              AND ($2::jsonb IS NULL OR body @> $2::jsonb)
            ORDER BY seq
            "#,
        )
        .bind(collection)
        .bind(filter.as_containment())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| StoredDocument {
                id: r.get("id"),
                body: r.get("body"),
            })
            .collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Ping(e.to_string()))?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p agrilake-server -- --ignored

    fn unique_collection(prefix: &str) -> String {
        format!("{}-{}", prefix, Uuid::new_v4())
    }

    #[tokio::test]
    async fn unreachable_database_fails_fast() {
        let options = ConnectOptions {
            max_connections: 1,
            connect_timeout: Duration::from_millis(500),
        };

        let result = PgDocumentStore::connect("postgres://agrilake@127.0.0.1:1/farmdb", &options).await;
        assert!(matches!(result, Err(StoreError::Connect(_))));
    }

    #[tokio::test]
    async fn silent_server_is_bounded_by_connect_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        // Accept and hold connections without ever speaking the protocol
        let _holder = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let options = ConnectOptions {
            max_connections: 1,
            connect_timeout: Duration::from_millis(300),
        };
        let started = tokio::time::Instant::now();
        let url = format!("postgres://agrilake@127.0.0.1:{}/farmdb", port);
        let result = PgDocumentStore::connect(&url, &options).await;

        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn insert_many_then_find_in_order() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let store = PgDocumentStore::connect(&url, &ConnectOptions::default())
            .await
            .expect("connect failed");
        let collection = unique_collection("farms");

        let ids = store
            .insert_many(
                &collection,
                vec![json!({"farmer": "Ada", "n": 1}), json!({"farmer": "Bo", "n": 2})],
            )
            .await
            .expect("insert failed");
        assert_eq!(ids.len(), 2);

        let all = store.find(&collection, &Filter::All).await.expect("find failed");
        assert_eq!(all.iter().map(|d| d.id).collect::<Vec<_>>(), ids);

        let ada = store
            .find(&collection, &Filter::eq("farmer", "Ada"))
            .await
            .expect("find failed");
        assert_eq!(ada.len(), 1);
        assert_eq!(ada[0].body["n"], 1);

        store.close().await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_inserts_share_pool() {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let store = PgDocumentStore::connect(&url, &ConnectOptions::default())
            .await
            .expect("connect failed");
        let collection = unique_collection("lake");

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let store = store.clone();
                let collection = collection.clone();
                tokio::spawn(async move {
                    store
                        .insert_one(&collection, json!({ "i": i }))
                        .await
                        .expect("concurrent insert failed")
                })
            })
            .collect();

        for handle in handles {
            handle.await.expect("task panicked");
        }

        let docs = store.find(&collection, &Filter::All).await.expect("find failed");
        assert_eq!(docs.len(), 10);
    }
}
