//! Axum route handlers for running a single agent.

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::Value;
use tracing::error;

use crate::agents::{assessment, behavioral, market, profiler};
use crate::errors::AppError;
use crate::reports::ReportKey;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CandidateRequest {
    pub person_id: String,
    #[serde(default)]
    pub job_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct JobRequest {
    pub job_id: String,
}

/// Trimmed identifier, or a validation error when nothing is left.
pub(crate) fn require<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(value)
}

/// Blank `job_id` means no job.
fn job_filter(job_id: &Option<String>) -> Option<&str> {
    job_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/agents/profile
///
/// Generates the talent intelligence report and saves it under its TIR key.
/// A failed save is logged; the report is still returned.
pub async fn handle_profile(
    State(state): State<AppState>,
    Json(request): Json<CandidateRequest>,
) -> Result<Json<profiler::TalentReport>, AppError> {
    let person_id = require("person_id", &request.person_id)?;
    let job_id = job_filter(&request.job_id);

    let report = profiler::generate_tir(
        &state.store,
        state.llm.as_ref(),
        state.profiler_use_ai,
        person_id,
        job_id,
    )
    .await?;

    let key = ReportKey::talent_intelligence(person_id, job_id);
    match serde_json::to_value(&report) {
        Ok(value) => {
            if let Err(e) = state.sink.store(&key, &value).await {
                error!("Failed to persist {key}: {e}");
            }
        }
        Err(e) => error!("Failed to encode {key}: {e}"),
    }

    Ok(Json(report))
}

/// POST /api/v1/agents/assessment
pub async fn handle_assessment(
    State(state): State<AppState>,
    Json(request): Json<CandidateRequest>,
) -> Result<Json<Value>, AppError> {
    let person_id = require("person_id", &request.person_id)?;

    let challenges = assessment::generate_assessment(
        &state.store,
        state.llm.as_ref(),
        person_id,
        job_filter(&request.job_id),
    )
    .await?;

    Ok(Json(challenges))
}

/// POST /api/v1/agents/behavioral
pub async fn handle_behavioral(
    State(state): State<AppState>,
    Json(request): Json<CandidateRequest>,
) -> Result<Json<Value>, AppError> {
    let person_id = require("person_id", &request.person_id)?;
    let analysis = behavioral::analyze(&state.store, state.llm.as_ref(), person_id).await?;
    Ok(Json(analysis))
}

/// POST /api/v1/agents/market
///
/// A degraded summary or a job without market rows still answers 200; the
/// report carries the fallback or its `error` field.
pub async fn handle_market(
    State(state): State<AppState>,
    Json(request): Json<JobRequest>,
) -> Result<Json<market::MarketReport>, AppError> {
    let job_id = require("job_id", &request.job_id)?;
    let analysis = market::analyze(&state.store, state.llm.as_ref(), job_id).await?;
    Ok(Json(analysis.report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_job_id_is_no_job() {
        assert_eq!(job_filter(&None), None);
        assert_eq!(job_filter(&Some("  ".to_string())), None);
        assert_eq!(job_filter(&Some("JD001".to_string())), Some("JD001"));
    }

    #[test]
    fn test_require_rejects_whitespace() {
        assert!(matches!(
            require("person_id", " \t"),
            Err(AppError::Validation(ref m)) if m == "person_id cannot be empty"
        ));
        assert_eq!(require("person_id", " CAND001\n").unwrap(), "CAND001");
    }
}
