//! Farm record endpoints

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::instrument;

use crate::http::batch::insert_batch;
use crate::http::error::ApiError;
use crate::http::extractors::{ValidJson, ValidPath};
use crate::models::{sample_farms, FarmRecord, ResponseEnvelope, ValidationError, FARMER_FIELD};
use crate::state::AppState;
use crate::store::{timed, Filter, StoreError, INSERT_ONE_TIMEOUT, STORE_OP_TIMEOUT};

type EnvelopeResult = Result<(StatusCode, Json<ResponseEnvelope>), ApiError>;

const INSERT_FAILED: &str = "Failed to insert farm data";

/// POST /farms - insert a single record
#[instrument(skip(state, farm), fields(farmer = %farm.farmer_name))]
async fn insert_farm(
    State(state): State<AppState>,
    ValidJson(farm): ValidJson<FarmRecord>,
) -> EnvelopeResult {
    let doc = serde_json::to_value(&farm)
        .map_err(|e| ApiError::store(INSERT_FAILED)(StoreError::Encode(e)))?;

    let id = timed(
        INSERT_ONE_TIMEOUT,
        "insert_one",
        state.farms().insert_one(state.farm_collection(), doc),
    )
    .await
    .map_err(ApiError::store(INSERT_FAILED))?;

    tracing::info!(inserted_id = %id, "farm record inserted");

    Ok(ResponseEnvelope::ok(
        "Farm data inserted successfully",
        json!({ "insertedId": id, "farm": farm }),
    )
    .with_status(StatusCode::CREATED))
}

/// POST /farms/bulk - insert many records in one call
#[instrument(skip(state, farms), fields(count = farms.len()))]
async fn insert_farms(
    State(state): State<AppState>,
    ValidJson(farms): ValidJson<Vec<FarmRecord>>,
) -> EnvelopeResult {
    let inserted = insert_batch(
        state.farms(),
        state.farm_collection(),
        farms,
        ValidationError::no_farm_data(),
        INSERT_FAILED,
        |farm| serde_json::to_value(farm),
    )
    .await?;

    tracing::info!(count = inserted.count, "farm records inserted");

    Ok(ResponseEnvelope::ok(
        format!("Successfully inserted {} farm records", inserted.count),
        json!(inserted),
    )
    .with_status(StatusCode::CREATED))
}

/// POST /farms/sample - seed the fixed demonstration records
#[instrument(skip(state))]
async fn insert_sample(State(state): State<AppState>) -> EnvelopeResult {
    let inserted = insert_batch(
        state.farms(),
        state.farm_collection(),
        sample_farms(),
        ValidationError::no_farm_data(),
        "Failed to insert sample data",
        |farm| serde_json::to_value(farm),
    )
    .await?;

    Ok(ResponseEnvelope::ok(
        format!("Successfully inserted {} sample farm records", inserted.count),
        json!(inserted),
    )
    .with_status(StatusCode::CREATED))
}

/// GET /farms - every record
#[instrument(skip(state))]
async fn list_farms(State(state): State<AppState>) -> EnvelopeResult {
    let farms = fetch_farms(&state, Filter::All).await?;

    Ok(ResponseEnvelope::ok("Farms retrieved successfully", json!(farms))
        .with_status(StatusCode::OK))
}

/// GET /farms/farmer/{farmer} - exact-match on farmer name
#[instrument(skip(state))]
async fn list_farms_by_farmer(
    State(state): State<AppState>,
    ValidPath(farmer): ValidPath<String>,
) -> EnvelopeResult {
    let farms = fetch_farms(&state, Filter::eq(FARMER_FIELD, farmer.as_str())).await?;

    Ok(ResponseEnvelope::ok(
        format!("Farms for farmer '{}' retrieved successfully", farmer),
        json!(farms),
    )
    .with_status(StatusCode::OK))
}

async fn fetch_farms(state: &AppState, filter: Filter) -> Result<Vec<FarmRecord>, ApiError> {
    let docs = timed(
        STORE_OP_TIMEOUT,
        "find",
        state.farms().find(state.farm_collection(), &filter),
    )
    .await
    .map_err(ApiError::store("Failed to fetch farms"))?;

    docs.into_iter()
        .map(|doc| serde_json::from_value(doc.body))
        .collect::<serde_json::Result<Vec<FarmRecord>>>()
        .map_err(|e| ApiError::store("Failed to decode farms")(StoreError::Decode(e)))
}

/// Farm routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/farms", get(list_farms).post(insert_farm))
        .route("/farms/bulk", post(insert_farms))
        .route("/farms/sample", post(insert_sample))
        .route("/farms/farmer/{farmer}", get(list_farms_by_farmer))
}
