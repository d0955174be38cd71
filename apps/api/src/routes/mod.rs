pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::agents::handlers as agents;
use crate::orchestration::handlers as runs;
use crate::records::handlers as records;
use crate::reports::handlers as reports;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Data viewers
        .route("/api/v1/candidates", get(records::handle_list_candidates))
        .route(
            "/api/v1/candidates/:person_id",
            get(records::handle_get_candidate),
        )
        .route("/api/v1/jobs", get(records::handle_list_jobs))
        .route("/api/v1/jobs/:job_id", get(records::handle_get_job))
        // Orchestration
        .route("/api/v1/runs", post(runs::handle_run))
        .route(
            "/api/v1/reports/:person_id/:job_id",
            get(reports::handle_get_report),
        )
        // Single agents
        .route("/api/v1/agents/profile", post(agents::handle_profile))
        .route("/api/v1/agents/assessment", post(agents::handle_assessment))
        .route("/api/v1/agents/behavioral", post(agents::handle_behavioral))
        .route("/api/v1/agents/market", post(agents::handle_market))
        .with_state(state)
}
