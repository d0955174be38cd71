use axum::{extract::State, Json};
use serde::Deserialize;

use crate::agents::handlers::require;
use crate::errors::AppError;
use crate::orchestration::{run, OrchestratedReport, RunContext};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RunRequest {
    pub person_id: String,
    pub job_id: String,
}

/// POST /api/v1/runs
///
/// Runs all four agents for the pair. Agent failures are reported inside the
/// body, so this only errors on invalid input.
pub async fn handle_run(
    State(state): State<AppState>,
    Json(request): Json<RunRequest>,
) -> Result<Json<OrchestratedReport>, AppError> {
    let person_id = require("person_id", &request.person_id)?;
    let job_id = require("job_id", &request.job_id)?;

    let ctx = RunContext {
        store: &state.store,
        llm: state.llm.as_ref(),
        sink: state.sink.as_ref(),
        profiler_use_ai: state.profiler_use_ai,
    };
    let report = run(&ctx, person_id, job_id).await;

    Ok(Json(report))
}
