//! Behavioral Analyzer: soft skills and cultural fit from free-text candidate notes.

use serde_json::Value;
use tracing::info;

use crate::agents::prompts::BEHAVIORAL_TEMPLATE;
use crate::agents::{complete_json, AgentError, AgentName};
use crate::llm_client::prompts::{FAIRNESS_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{CompletionClient, CompletionParams};
use crate::normalize::ShapeContract;
use crate::records::{Collection, Record, RecordStore};

const TEMPERATURE: f32 = 0.7;

pub const ANALYSIS_KEYS: &[&str] = &[
    "person_id",
    "soft_skill_analysis",
    "keywords",
    "themes",
    "high_level_insights",
    "bias_mitigation_protocol",
];

pub fn contract() -> ShapeContract {
    ShapeContract::object(ANALYSIS_KEYS)
}

/// Candidate notes: `text` as-is, or `texts` joined with single spaces.
pub fn candidate_text(entry: &Record, person_id: &str) -> Result<String, AgentError> {
    if let Some(text) = entry.get("text").and_then(Value::as_str) {
        return Ok(text.to_string());
    }
    if let Some(texts) = entry.get("texts").and_then(Value::as_array) {
        let parts: Vec<&str> = texts.iter().filter_map(Value::as_str).collect();
        return Ok(parts.join(" "));
    }
    Err(AgentError::MissingText {
        person_id: person_id.to_string(),
    })
}

/// Runs the behavioral analysis and returns the model's object unchanged.
pub async fn analyze(
    store: &RecordStore,
    llm: &dyn CompletionClient,
    person_id: &str,
) -> Result<Value, AgentError> {
    let entry = store
        .get(Collection::CandidateText, person_id)
        .ok_or_else(|| AgentError::not_found("candidate text", person_id))?;
    let text = candidate_text(entry, person_id)?;
    info!("Behavioral analysis for {person_id}: {} chars of text", text.len());

    let prompt = BEHAVIORAL_TEMPLATE
        .replace("{json_only_instruction}", JSON_ONLY_INSTRUCTION)
        .replace("{fairness_instruction}", FAIRNESS_INSTRUCTION)
        .replace("{person_id}", person_id)
        .replace("{candidate_text}", &text);

    complete_json(
        llm,
        AgentName::BehavioralAnalyzer,
        &prompt,
        CompletionParams::with_temperature(TEMPERATURE),
        &contract(),
    )
    .await
}
