//! Read-only data viewers over the record store.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::orchestration::{list_jds, list_profiles};
use crate::records::{Collection, RecordStore};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct CandidateListResponse {
    pub person_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct JobListResponse {
    pub job_ids: Vec<String>,
}

/// Everything on file for one candidate. Sources without a record carry an
/// `info` placeholder instead.
#[derive(Debug, Serialize)]
pub struct CandidateDataResponse {
    pub person_id: String,
    pub resume: Value,
    pub candidate_text: Value,
    pub linkedin: Value,
    pub github: Value,
    pub leetcode: Value,
}

fn record_or_info(store: &RecordStore, collection: Collection, person_id: &str, label: &str) -> Value {
    match store.get(collection, person_id) {
        Some(record) => Value::Object(record.clone()),
        None => json!({ "info": format!("No {label} data found") }),
    }
}

pub fn candidate_data(store: &RecordStore, person_id: &str) -> Result<CandidateDataResponse, AppError> {
    let resume = store
        .get(Collection::Resumes, person_id)
        .ok_or_else(|| AppError::NotFound(format!("No resume data found for {person_id}")))?;

    Ok(CandidateDataResponse {
        person_id: person_id.to_string(),
        resume: Value::Object(resume.clone()),
        candidate_text: record_or_info(store, Collection::CandidateText, person_id, "candidate text"),
        linkedin: record_or_info(store, Collection::Linkedin, person_id, "LinkedIn"),
        github: record_or_info(store, Collection::Github, person_id, "GitHub"),
        leetcode: record_or_info(store, Collection::Leetcode, person_id, "LeetCode"),
    })
}

/// GET /api/v1/candidates
pub async fn handle_list_candidates(State(state): State<AppState>) -> Json<CandidateListResponse> {
    Json(CandidateListResponse {
        person_ids: list_profiles(&state.store),
    })
}

/// GET /api/v1/jobs
pub async fn handle_list_jobs(State(state): State<AppState>) -> Json<JobListResponse> {
    Json(JobListResponse {
        job_ids: list_jds(&state.store),
    })
}

/// GET /api/v1/candidates/:person_id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(person_id): Path<String>,
) -> Result<Json<CandidateDataResponse>, AppError> {
    Ok(Json(candidate_data(&state.store, &person_id)?))
}

/// GET /api/v1/jobs/:job_id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    state
        .store
        .job(&job_id)
        .map(|job| Json(Value::Object(job.clone())))
        .ok_or_else(|| AppError::NotFound(format!("No job data found for {job_id}")))
}
