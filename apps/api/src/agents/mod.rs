// Recruitment agents.
// Each agent: look up records → build prompt → one completion at a time →
// normalize → typed result. All completion calls go through `CompletionClient`.

pub mod assessment;
pub mod behavioral;
pub mod handlers;
pub mod market;
pub mod profiler;
pub mod prompts;
pub mod stats;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::llm_client::{CompletionClient, CompletionParams, LlmError};
use crate::normalize::{normalize, NormalizationFailure, ShapeContract};

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("No {what} data found for {id}")]
    NotFound { what: &'static str, id: String },

    #[error("Candidate text for {person_id} has neither 'text' nor 'texts'")]
    MissingText { person_id: String },

    #[error("Completion failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Model output rejected ({0})")]
    Normalization(#[from] NormalizationFailure),

    #[error("Failed to encode agent result: {0}")]
    Encode(String),
}

impl AgentError {
    pub(crate) fn not_found(what: &'static str, id: &str) -> Self {
        AgentError::NotFound {
            what,
            id: id.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentName {
    CandidateProfiler,
    AssessmentDesigner,
    BehavioralAnalyzer,
    MarketOptimizer,
}

impl std::fmt::Display for AgentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AgentName::CandidateProfiler => "candidate_profiler",
            AgentName::AssessmentDesigner => "assessment_designer",
            AgentName::BehavioralAnalyzer => "behavioral_analyzer",
            AgentName::MarketOptimizer => "market_optimizer",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentStatus {
    /// The agent produced its full artifact.
    Ok,
    /// The agent produced a result, but part of it is a fallback.
    Degraded,
    /// The agent failed; `result` is absent.
    Unavailable,
}

/// One agent's contribution to an orchestration run.
#[derive(Debug, Clone, Serialize)]
pub struct AgentOutput {
    pub agent: AgentName,
    pub status: AgentStatus,
    pub result: Option<Value>,
    pub error: Option<String>,
}

impl AgentOutput {
    pub fn ok(agent: AgentName, result: Value) -> Self {
        Self {
            agent,
            status: AgentStatus::Ok,
            result: Some(result),
            error: None,
        }
    }

    pub fn degraded(agent: AgentName, result: Value, reason: String) -> Self {
        Self {
            agent,
            status: AgentStatus::Degraded,
            result: Some(result),
            error: Some(reason),
        }
    }

    pub fn unavailable(agent: AgentName, error: &AgentError) -> Self {
        Self {
            agent,
            status: AgentStatus::Unavailable,
            result: None,
            error: Some(error.to_string()),
        }
    }
}

/// Sends `prompt` and normalizes the reply against `contract`.
/// Logs the rejected text; the normalizer itself stays silent.
pub(crate) async fn complete_json(
    llm: &dyn CompletionClient,
    agent: AgentName,
    prompt: &str,
    params: CompletionParams,
    contract: &ShapeContract,
) -> Result<Value, AgentError> {
    let raw = llm.complete(prompt, params).await?;

    match normalize(raw.as_deref(), contract) {
        Ok(value) => {
            debug!("{agent}: model output accepted");
            Ok(value)
        }
        Err(failure) => {
            warn!("{agent}: model output rejected: {failure}");
            if let Some(cleaned) = &failure.cleaned_text {
                debug!("{agent}: cleaned text was: {cleaned}");
            }
            Err(failure.into())
        }
    }
}

/// String field of a record, if present and a string.
pub(crate) fn str_field<'a>(record: &'a serde_json::Map<String, Value>, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}
