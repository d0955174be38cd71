//! Assessment Designer: three coding challenges tailored to the candidate and job.

use serde_json::{json, Value};
use tracing::info;

use crate::agents::prompts::ASSESSMENT_TEMPLATE;
use crate::agents::{complete_json, str_field, AgentError, AgentName};
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::{CompletionClient, CompletionParams};
use crate::normalize::ShapeContract;
use crate::records::{Collection, RecordStore};

const TEMPERATURE: f32 = 0.7;

/// Keys every generated challenge must carry.
pub const CHALLENGE_KEYS: &[&str] = &[
    "title",
    "difficulty",
    "description",
    "instructions",
    "constraints",
    "examples",
    "options",
];

pub fn contract() -> ShapeContract {
    ShapeContract::array_of_objects(CHALLENGE_KEYS)
}

/// Generates the assessment package: a JSON array of challenge objects,
/// exactly as the model produced them.
pub async fn generate_assessment(
    store: &RecordStore,
    llm: &dyn CompletionClient,
    person_id: &str,
    job_id: Option<&str>,
) -> Result<Value, AgentError> {
    let leetcode = store
        .get(Collection::Leetcode, person_id)
        .ok_or_else(|| AgentError::not_found("LeetCode", person_id))?;
    let resume = store
        .get(Collection::Resumes, person_id)
        .ok_or_else(|| AgentError::not_found("resume", person_id))?;
    let job = job_id
        .and_then(|id| store.job(id))
        .cloned()
        .map(Value::Object)
        .unwrap_or_else(|| json!({}));

    let candidate = json!({
        "person_id": person_id,
        "username": str_field(leetcode, "username"),
        "leetcode_profile": leetcode,
        "resume_profile": resume,
    });
    info!(
        "Designing assessment for {person_id} (username={:?}, name={:?})",
        str_field(leetcode, "username"),
        str_field(resume, "name")
    );

    let prompt = ASSESSMENT_TEMPLATE
        .replace("{json_only_instruction}", JSON_ONLY_INSTRUCTION)
        .replace("{job_json}", &pretty(&job))
        .replace("{candidate_json}", &pretty(&candidate));

    let challenges = complete_json(
        llm,
        AgentName::AssessmentDesigner,
        &prompt,
        CompletionParams::with_temperature(TEMPERATURE),
        &contract(),
    )
    .await?;

    info!(
        "Assessment for {person_id}: {} challenges",
        challenges.as_array().map(Vec::len).unwrap_or_default()
    );
    Ok(challenges)
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}
