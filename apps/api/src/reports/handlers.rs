use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::errors::AppError;
use crate::reports::ReportKey;
use crate::state::AppState;

/// GET /api/v1/reports/:person_id/:job_id
///
/// Returns the merged report saved by the last run for the pair.
pub async fn handle_get_report(
    State(state): State<AppState>,
    Path((person_id, job_id)): Path<(String, String)>,
) -> Result<Json<Value>, AppError> {
    let key = ReportKey::orchestrated(&person_id, &job_id);
    state
        .sink
        .load(&key)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No report stored for {person_id} / {job_id}")))
}
