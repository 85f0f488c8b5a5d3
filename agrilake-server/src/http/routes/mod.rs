//! Route handlers
//!
//! - health: liveness, no store access
//! - farms: farm record inserts and reads
//! - lake: data lake ingestion and listing

pub mod farms;
pub mod health;
pub mod lake;

use axum::Router;

use crate::state::AppState;

/// Base path every route is nested under
pub const API_PREFIX: &str = "/api/v1";

/// All API routes, relative to [`API_PREFIX`]
pub fn api_router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(farms::router())
        .merge(lake::router())
}

/// Route table, logged at startup
pub const ROUTES: &[(&str, &str, &str)] = &[
    ("GET", "/health", "Health check"),
    ("POST", "/farms", "Insert single farm"),
    ("POST", "/farms/bulk", "Insert multiple farms"),
    ("POST", "/farms/sample", "Insert sample data"),
    ("GET", "/farms", "Get all farms"),
    ("GET", "/farms/farmer/{farmer}", "Get farms by farmer"),
    ("POST", "/lake/indexeddb", "Push IndexedDB data to lake"),
    ("POST", "/lake/neo4j", "Push Neo4j data to lake"),
    ("GET", "/lake", "Get data lake records (?sourceDB= to filter)"),
];
