//! Data lake endpoints
//!
//! Both ingestion routes share one handler body; the path only picks the
//! source label, default tags and record kind.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::instrument;

use crate::http::batch::insert_batch;
use crate::http::error::ApiError;
use crate::http::extractors::{first_param, ValidJson, ValidQuery};
use crate::models::{
    IngestRequest, Provenance, ResponseEnvelope, SourceSystem, ValidationError, SOURCE_FIELD,
};
use crate::state::AppState;
use crate::store::{timed, Filter, StoredDocument, STORE_OP_TIMEOUT};

type EnvelopeResult = Result<(StatusCode, Json<ResponseEnvelope>), ApiError>;

/// POST /lake/indexeddb
async fn ingest_indexeddb(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<IngestRequest>,
) -> EnvelopeResult {
    ingest(&state, SourceSystem::IndexedDb, req).await
}

/// POST /lake/neo4j
async fn ingest_neo4j(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<IngestRequest>,
) -> EnvelopeResult {
    ingest(&state, SourceSystem::Neo4j, req).await
}

#[instrument(skip(state, req), fields(source = %source, count = req.data.len()))]
async fn ingest(state: &AppState, source: SourceSystem, req: IngestRequest) -> EnvelopeResult {
    let provenance = Provenance::new(source, req.tags, Utc::now());

    let inserted = insert_batch(
        state.lake(),
        state.lake_collection(),
        req.data,
        ValidationError::no_data(),
        "Failed to push to data lake",
        |payload| serde_json::to_value(provenance.wrap(payload)),
    )
    .await?;

    tracing::info!(
        source = %source,
        count = inserted.count,
        ingested_at = %provenance.ingested_at,
        "records pushed to data lake"
    );

    Ok(ResponseEnvelope::ok(
        format!(
            "Successfully pushed {} records from {} to data lake",
            inserted.count, source
        ),
        json!({
            "insertedIds": inserted.inserted_ids,
            "count": inserted.count,
            "sourceDB": source.label(),
            "ingestedAt": provenance.ingested_at,
        }),
    )
    .with_status(StatusCode::CREATED))
}

/// GET /lake - all lake documents, optionally filtered by `?sourceDB=`
///
/// A repeated `sourceDB` uses its first value; an empty one means no filter.
#[instrument(skip(state))]
async fn list_lake(
    State(state): State<AppState>,
    ValidQuery(params): ValidQuery<Vec<(String, String)>>,
) -> EnvelopeResult {
    let filter = Filter::eq_if_present(SOURCE_FIELD, first_param(&params, SOURCE_FIELD));

    let docs = timed(
        STORE_OP_TIMEOUT,
        "find",
        state.lake().find(state.lake_collection(), &filter),
    )
    .await
    .map_err(ApiError::store("Failed to fetch data lake records"))?;

    let records: Vec<Value> = docs
        .into_iter()
        .map(StoredDocument::into_json_with_id)
        .collect();
    let count = records.len();

    Ok(ResponseEnvelope::ok(
        "Data lake records retrieved successfully",
        json!({ "records": records, "count": count }),
    )
    .with_status(StatusCode::OK))
}

/// Lake routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lake", get(list_lake))
        .route("/lake/indexeddb", post(ingest_indexeddb))
        .route("/lake/neo4j", post(ingest_neo4j))
}
