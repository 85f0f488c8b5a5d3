//! Health check endpoint

use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde_json::json;

use crate::models::ResponseEnvelope;

/// GET /health - never touches the store
async fn health() -> Json<ResponseEnvelope> {
    Json(ResponseEnvelope::ok(
        "API is running successfully",
        json!({
            "timestamp": Utc::now().to_rfc3339(),
            "status": "healthy",
        }),
    ))
}

/// Health routes
pub fn router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health))
}
