use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service version and how much data the store holds.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME"),
        "candidates": state.store.person_ids().len(),
        "jobs": state.store.job_ids().len(),
        "market_rows": state.store.market().roles.len(),
    }))
}
