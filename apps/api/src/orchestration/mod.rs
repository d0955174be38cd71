//! Orchestrator: runs every agent for one candidate/job pair and merges the
//! results into a single report.
//!
//! Agents run one after another. A failing agent is recorded as unavailable
//! and never stops the ones after it; a failing sink is logged and reflected
//! in `persisted`.

pub mod handlers;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::agents::{
    assessment, behavioral, market, profiler, AgentError, AgentName, AgentOutput,
};
use crate::llm_client::CompletionClient;
use crate::records::RecordStore;
use crate::reports::{ReportKey, ReportSink};

/// What a run needs; borrowed from `AppState` by the handler.
pub struct RunContext<'a> {
    pub store: &'a RecordStore,
    pub llm: &'a dyn CompletionClient,
    pub sink: &'a dyn ReportSink,
    pub profiler_use_ai: bool,
}

/// The merged output of one orchestration run.
#[derive(Debug, Clone, Serialize)]
pub struct OrchestratedReport {
    pub run_id: Uuid,
    pub person_id: String,
    pub job_id: String,
    pub job_info: Value,
    /// RFC 3339, UTC
    pub generated_at: String,
    pub tir: AgentOutput,
    pub assessment: AgentOutput,
    pub behavioral_analysis: AgentOutput,
    pub market_intelligence: AgentOutput,
    pub persisted: bool,
}

impl OrchestratedReport {
    pub fn outputs(&self) -> [&AgentOutput; 4] {
        [
            &self.tir,
            &self.assessment,
            &self.behavioral_analysis,
            &self.market_intelligence,
        ]
    }
}

/// Runs profiler, assessment, behavioral and market agents for the pair and
/// persists the TIR and the merged report.
pub async fn run(ctx: &RunContext<'_>, person_id: &str, job_id: &str) -> OrchestratedReport {
    let run_id = Uuid::new_v4();
    info!("Run {run_id}: orchestrating {person_id} / {job_id}");

    let mut tir_value = None;
    let tir = match profiler::generate_tir(
        ctx.store,
        ctx.llm,
        ctx.profiler_use_ai,
        person_id,
        Some(job_id),
    )
    .await
    .and_then(|report| to_value(&report))
    {
        Ok(value) => {
            tir_value = Some(value.clone());
            AgentOutput::ok(AgentName::CandidateProfiler, value)
        }
        Err(e) => unavailable(AgentName::CandidateProfiler, e),
    };

    let assessment =
        match assessment::generate_assessment(ctx.store, ctx.llm, person_id, Some(job_id)).await {
            Ok(value) => AgentOutput::ok(AgentName::AssessmentDesigner, value),
            Err(e) => unavailable(AgentName::AssessmentDesigner, e),
        };

    let behavioral_analysis = match behavioral::analyze(ctx.store, ctx.llm, person_id).await {
        Ok(value) => AgentOutput::ok(AgentName::BehavioralAnalyzer, value),
        Err(e) => unavailable(AgentName::BehavioralAnalyzer, e),
    };

    let market_intelligence = match market::analyze(ctx.store, ctx.llm, job_id).await {
        Ok(analysis) => match (to_value(&analysis.report), analysis.degraded) {
            (Ok(value), None) => AgentOutput::ok(AgentName::MarketOptimizer, value),
            (Ok(value), Some(reason)) => {
                AgentOutput::degraded(AgentName::MarketOptimizer, value, reason)
            }
            (Err(e), _) => unavailable(AgentName::MarketOptimizer, e),
        },
        Err(e) => unavailable(AgentName::MarketOptimizer, e),
    };

    let job_info = ctx
        .store
        .job(job_id)
        .cloned()
        .map(Value::Object)
        .unwrap_or_else(|| Value::Object(Default::default()));

    let mut persisted = true;
    if let Some(tir) = &tir_value {
        let key = ReportKey::talent_intelligence(person_id, Some(job_id));
        if let Err(e) = ctx.sink.store(&key, tir).await {
            error!("Run {run_id}: failed to persist {key}: {e}");
            persisted = false;
        }
    }

    let mut report = OrchestratedReport {
        run_id,
        person_id: person_id.to_string(),
        job_id: job_id.to_string(),
        job_info,
        generated_at: Utc::now().to_rfc3339(),
        tir,
        assessment,
        behavioral_analysis,
        market_intelligence,
        persisted,
    };

    let key = ReportKey::orchestrated(person_id, job_id);
    let stored = match serde_json::to_value(&report) {
        Ok(value) => ctx.sink.store(&key, &value).await.map_err(|e| e.to_string()),
        Err(e) => Err(e.to_string()),
    };
    if let Err(e) = stored {
        error!("Run {run_id}: failed to persist {key}: {e}");
        report.persisted = false;
    }

    let failed = report
        .outputs()
        .iter()
        .filter(|o| o.result.is_none())
        .count();
    info!(
        "Run {run_id} complete: {failed} of 4 agents unavailable, persisted={}",
        report.persisted
    );
    report
}

fn unavailable(agent: AgentName, error: AgentError) -> AgentOutput {
    warn!("{agent} unavailable: {error}");
    AgentOutput::unavailable(agent, &error)
}

fn to_value<T: Serialize>(value: &T) -> Result<Value, AgentError> {
    serde_json::to_value(value).map_err(|e| AgentError::Encode(e.to_string()))
}

/// Candidate ids available for a run.
pub fn list_profiles(store: &RecordStore) -> Vec<String> {
    store.person_ids()
}

/// Job ids available for a run.
pub fn list_jds(store: &RecordStore) -> Vec<String> {
    store.job_ids()
}
