//! Candidate Profiler: builds the talent intelligence report (TIR).
//!
//! Flow: resume (required) + LinkedIn/GitHub/LeetCode (optional) → evidence map
//! → per-skill confidence → work history → free-text analyses → `TalentReport`.
//!
//! The free-text analyses are not JSON and never fail the report: a failed call
//! degrades to a fixed placeholder string.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::agents::prompts::{
    CAREER_SUMMARY_TEMPLATE, INSIGHTS_TEMPLATE, JOB_COMPARISON_TEMPLATE,
    SKILL_CONFIDENCE_TEMPLATE,
};
use crate::agents::AgentError;
use crate::llm_client::prompts::FAIRNESS_INSTRUCTION;
use crate::llm_client::{CompletionClient, CompletionParams};
use crate::records::{Collection, Record, RecordStore};

pub const AI_DISABLED: &str = "AI disabled, no analysis available.";
pub const AI_NO_RESPONSE: &str = "No AI response.";
pub const AI_ERROR: &str = "AI analysis error.";

/// Used when the model's confidence reply is not a number.
const DEFAULT_CONFIDENCE: f64 = 0.5;

const CONFIDENCE_TEMPERATURE: f32 = 0.0;
const COMPARISON_TEMPERATURE: f32 = 0.4;
const SUMMARY_TEMPERATURE: f32 = 0.3;
const INSIGHTS_TEMPERATURE: f32 = 0.4;

/// How many times a skill is mentioned in each source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkillEvidence {
    pub resume: u32,
    pub linkedin: u32,
    pub github: u32,
    pub leetcode: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillConfidence {
    pub skill: String,
    /// 0.0 to 1.0, two decimals
    pub confidence: f64,
    pub evidence: SkillEvidence,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateProfile {
    pub name: Value,
    pub email: Value,
    pub social_profiles: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct OnlineActivity {
    pub linkedin: Value,
    pub github: Value,
    pub leetcode: Value,
}

/// The talent intelligence report.
#[derive(Debug, Clone, Serialize)]
pub struct TalentReport {
    pub person_id: String,
    pub job_id: Option<String>,
    pub profile: CandidateProfile,
    pub education: Value,
    #[serde(rename = "YOE")]
    pub yoe: Value,
    pub work_history: Vec<Value>,
    pub skills_analysis: Vec<SkillConfidence>,
    pub projects: Value,
    pub online_activity: OnlineActivity,
    pub career_summary: String,
    pub ai_job_comparison: Option<String>,
    pub ai_insights: String,
    pub job_info: Value,
}

/// Free-text model calls for the profiler, with placeholder fallbacks.
struct TextAnalyst<'a> {
    llm: &'a dyn CompletionClient,
    enabled: bool,
}

impl TextAnalyst<'_> {
    async fn ask(&self, prompt: &str, temperature: f32) -> String {
        if !self.enabled {
            return AI_DISABLED.to_string();
        }
        match self
            .llm
            .complete(prompt, CompletionParams::with_temperature(temperature))
            .await
        {
            Ok(Some(text)) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => AI_NO_RESPONSE.to_string(),
            Err(e) => {
                warn!("Profiler analysis call failed: {e}");
                AI_ERROR.to_string()
            }
        }
    }
}

/// Generates the TIR for `person_id`, optionally matched against `job_id`.
pub async fn generate_tir(
    store: &RecordStore,
    llm: &dyn CompletionClient,
    use_ai: bool,
    person_id: &str,
    job_id: Option<&str>,
) -> Result<TalentReport, AgentError> {
    let resume = store
        .get(Collection::Resumes, person_id)
        .ok_or_else(|| AgentError::not_found("resume", person_id))?;
    let linkedin = store.get(Collection::Linkedin, person_id);
    let github = store.get(Collection::Github, person_id);
    let leetcode = store.get(Collection::Leetcode, person_id);
    let job = job_id.and_then(|id| store.job(id));

    let analyst = TextAnalyst {
        llm,
        enabled: use_ai,
    };

    let evidence = build_evidence_map(resume, linkedin, github, leetcode);
    info!(
        "Profiling {person_id}: {} skills across sources",
        evidence.len()
    );

    let mut skills_analysis = Vec::with_capacity(evidence.len());
    for (skill, ev) in evidence {
        let confidence = if use_ai {
            let prompt = SKILL_CONFIDENCE_TEMPLATE
                .replace("{evidence_json}", &to_json(&ev))
                .replace("{skill}", &skill);
            parse_confidence(&analyst.ask(&prompt, CONFIDENCE_TEMPERATURE).await)
        } else {
            DEFAULT_CONFIDENCE
        };
        skills_analysis.push(SkillConfidence {
            skill,
            confidence,
            evidence: ev,
        });
    }

    let work_history = build_work_history(resume, linkedin);
    let yoe = resume.get("YOE").cloned().unwrap_or(Value::Null);
    let projects = resume
        .get("projects")
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()));
    let job_info = job.cloned().map(Value::Object).unwrap_or_else(empty_object);

    let work_history_json = to_pretty_json(&work_history);
    let projects_json = to_pretty_json(&projects);

    let ai_job_comparison = match job {
        Some(job) => {
            let prompt = JOB_COMPARISON_TEMPLATE
                .replace("{skills_json}", &to_pretty_json(&skills_analysis))
                .replace("{job_json}", &to_pretty_json(job))
                .replace("{projects_json}", &projects_json)
                .replace("{work_history_json}", &work_history_json);
            Some(analyst.ask(&prompt, COMPARISON_TEMPERATURE).await)
        }
        None => None,
    };

    let career_summary = {
        let prompt = CAREER_SUMMARY_TEMPLATE
            .replace("{yoe}", &yoe.to_string())
            .replace("{projects_json}", &projects_json)
            .replace("{work_history_json}", &work_history_json);
        analyst.ask(&prompt, SUMMARY_TEMPERATURE).await
    };

    let ai_insights = {
        let prompt = INSIGHTS_TEMPLATE
            .replace("{fairness_instruction}", FAIRNESS_INSTRUCTION)
            .replace("{yoe}", &yoe.to_string())
            .replace("{job_json}", &to_pretty_json(&job_info))
            .replace("{linkedin_json}", &optional_json(linkedin))
            .replace("{github_json}", &optional_json(github))
            .replace("{leetcode_json}", &optional_json(leetcode))
            .replace("{work_history_json}", &work_history_json)
            .replace("{resume_json}", &to_pretty_json(resume));
        analyst.ask(&prompt, INSIGHTS_TEMPERATURE).await
    };

    Ok(TalentReport {
        person_id: person_id.to_string(),
        job_id: job_id.map(String::from),
        profile: CandidateProfile {
            name: resume.get("name").cloned().unwrap_or(Value::Null),
            email: resume.get("email").cloned().unwrap_or(Value::Null),
            social_profiles: resume
                .get("social_profiles")
                .cloned()
                .unwrap_or_else(empty_object),
        },
        education: resume
            .get("education")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new())),
        yoe,
        work_history,
        skills_analysis,
        projects,
        online_activity: OnlineActivity {
            linkedin: object_or_empty(linkedin),
            github: object_or_empty(github),
            leetcode: object_or_empty(leetcode),
        },
        career_summary,
        ai_job_comparison,
        ai_insights,
        job_info,
    })
}

/// Counts skill mentions per source, keyed by skill name in sorted order.
pub fn build_evidence_map(
    resume: &Record,
    linkedin: Option<&Record>,
    github: Option<&Record>,
    leetcode: Option<&Record>,
) -> BTreeMap<String, SkillEvidence> {
    let mut map: BTreeMap<String, SkillEvidence> = BTreeMap::new();

    for skill in string_items(Some(resume), "skills") {
        map.entry(skill).or_default().resume += 1;
    }
    for skill in string_items(linkedin, "skills") {
        map.entry(skill).or_default().linkedin += 1;
    }
    for skill in string_items(github, "top_languages") {
        map.entry(skill).or_default().github += 1;
    }
    for skill in string_items(leetcode, "strengths") {
        map.entry(skill).or_default().leetcode += 1;
    }

    map
}

/// Resume `experience` followed by LinkedIn `jobs`.
pub fn build_work_history(resume: &Record, linkedin: Option<&Record>) -> Vec<Value> {
    let mut history = array_items(Some(resume), "experience");
    history.extend(array_items(linkedin, "jobs"));
    history
}

/// Parses a confidence reply. Non-numeric replies fall back to 0.5; numbers
/// are clamped to [0, 1] and rounded to two decimals.
pub fn parse_confidence(reply: &str) -> f64 {
    let trimmed = reply.trim().trim_end_matches('.');
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => (value.clamp(0.0, 1.0) * 100.0).round() / 100.0,
        _ => DEFAULT_CONFIDENCE,
    }
}

fn string_items(record: Option<&Record>, key: &str) -> Vec<String> {
    record
        .and_then(|r| r.get(key))
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}

fn array_items(record: Option<&Record>, key: &str) -> Vec<Value> {
    record
        .and_then(|r| r.get(key))
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn empty_object() -> Value {
    Value::Object(Record::new())
}

fn object_or_empty(record: Option<&Record>) -> Value {
    record.cloned().map(Value::Object).unwrap_or_else(empty_object)
}

fn optional_json(record: Option<&Record>) -> String {
    match record {
        Some(r) => to_pretty_json(r),
        None => "null".to_string(),
    }
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

fn to_pretty_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::fake::FakeCompletionClient;
    use crate::llm_client::LlmError;
    use crate::records::tests::fixture_store;

    fn scripted_llm() -> FakeCompletionClient {
        FakeCompletionClient::new(|prompt, _| {
            let reply = if prompt.starts_with("Rate proficiency") {
                if prompt.contains("'Rust'") {
                    "not sure"
                } else if prompt.contains("'Python'") {
                    "0.876"
                } else {
                    "1.7"
                }
            } else if prompt.starts_with("Compare") {
                "Match: 80%"
            } else if prompt.starts_with("Summarize") {
                "  Backend engineer with 4 years.  "
            } else {
                "Strong fundamentals."
            };
            Ok(Some(reply.to_string()))
        })
    }

    #[test]
    fn test_evidence_map_counts_per_source() {
        let store = fixture_store();
        let map = build_evidence_map(
            store.get(Collection::Resumes, "CAND001").unwrap(),
            store.get(Collection::Linkedin, "CAND001"),
            store.get(Collection::Github, "CAND001"),
            store.get(Collection::Leetcode, "CAND001"),
        );
        assert_eq!(
            map.keys().collect::<Vec<_>>(),
            vec!["Dynamic Programming", "Leadership", "Python", "Rust", "SQL"]
        );
        assert_eq!(
            map["Python"],
            SkillEvidence {
                resume: 1,
                linkedin: 1,
                github: 1,
                leetcode: 0
            }
        );
        assert_eq!(map["Dynamic Programming"].leetcode, 1);
    }

    #[test]
    fn test_work_history_appends_linkedin_jobs() {
        let store = fixture_store();
        let history = build_work_history(
            store.get(Collection::Resumes, "CAND001").unwrap(),
            store.get(Collection::Linkedin, "CAND001"),
        );
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["company"], "Acme");
        assert_eq!(history[1]["company"], "Initech");
    }

    #[test]
    fn test_parse_confidence() {
        assert_eq!(parse_confidence("0.876"), 0.88);
        assert_eq!(parse_confidence(" 0.7.\n"), 0.7);
        assert_eq!(parse_confidence("1.7"), 1.0);
        assert_eq!(parse_confidence("-3"), 0.0);
        assert_eq!(parse_confidence("high"), 0.5);
        assert_eq!(parse_confidence("NaN"), 0.5);
    }

    #[tokio::test]
    async fn test_generate_tir_with_job() {
        let store = fixture_store();
        let llm = scripted_llm();

        let tir = generate_tir(&store, &llm, true, "CAND001", Some("JD001"))
            .await
            .unwrap();

        assert_eq!(tir.person_id, "CAND001");
        assert_eq!(tir.job_id.as_deref(), Some("JD001"));
        assert_eq!(tir.profile.name, "Asha Rao");
        assert_eq!(tir.yoe, 4);
        assert_eq!(tir.work_history.len(), 2);
        assert_eq!(tir.ai_job_comparison.as_deref(), Some("Match: 80%"));
        assert_eq!(tir.career_summary, "Backend engineer with 4 years.");
        assert_eq!(tir.ai_insights, "Strong fundamentals.");
        assert_eq!(tir.job_info["role_title"], "Backend Engineer");

        let python = tir.skills_analysis.iter().find(|s| s.skill == "Python").unwrap();
        assert_eq!(python.confidence, 0.88);
        let rust = tir.skills_analysis.iter().find(|s| s.skill == "Rust").unwrap();
        assert_eq!(rust.confidence, 0.5);
        let sql = tir.skills_analysis.iter().find(|s| s.skill == "SQL").unwrap();
        assert_eq!(sql.confidence, 1.0);

        // 5 confidence calls + comparison + summary + insights
        let calls = llm.calls();
        assert_eq!(calls.len(), 8);
        assert!(calls
            .iter()
            .filter(|(p, _)| p.starts_with("Rate proficiency"))
            .all(|(_, params)| params.temperature == 0.0));
    }

    #[tokio::test]
    async fn test_generate_tir_without_job_skips_comparison() {
        let store = fixture_store();
        let llm = scripted_llm();

        let tir = generate_tir(&store, &llm, true, "CAND002", None).await.unwrap();

        assert!(tir.ai_job_comparison.is_none());
        assert_eq!(tir.job_info, serde_json::json!({}));
        assert_eq!(tir.online_activity.github, serde_json::json!({}));
        assert_eq!(tir.yoe, Value::Null);
        // 1 confidence call + summary + insights
        assert_eq!(llm.calls().len(), 3);

        let json = serde_json::to_value(&tir).unwrap();
        assert!(json.get("YOE").is_some());
        assert!(json.get("yoe").is_none());
    }

    #[tokio::test]
    async fn test_generate_tir_ai_disabled_makes_no_calls() {
        let store = fixture_store();
        let llm = FakeCompletionClient::failing();

        let tir = generate_tir(&store, &llm, false, "CAND001", Some("JD001"))
            .await
            .unwrap();

        assert!(llm.calls().is_empty());
        assert_eq!(tir.career_summary, AI_DISABLED);
        assert_eq!(tir.ai_job_comparison.as_deref(), Some(AI_DISABLED));
        assert!(tir.skills_analysis.iter().all(|s| s.confidence == 0.5));
    }

    #[tokio::test]
    async fn test_generate_tir_failed_calls_degrade_to_placeholders() {
        let store = fixture_store();
        let llm = FakeCompletionClient::new(|prompt, _| {
            if prompt.starts_with("Summarize") {
                Ok(None)
            } else {
                Err(LlmError::RateLimited { retries: 3 })
            }
        });

        let tir = generate_tir(&store, &llm, true, "CAND001", None).await.unwrap();

        assert_eq!(tir.career_summary, AI_NO_RESPONSE);
        assert_eq!(tir.ai_insights, AI_ERROR);
        assert!(tir.skills_analysis.iter().all(|s| s.confidence == 0.5));
    }

    #[tokio::test]
    async fn test_generate_tir_missing_resume() {
        let store = fixture_store();
        let llm = FakeCompletionClient::always("0.5");
        let err = generate_tir(&store, &llm, true, "CAND404", None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "No resume data found for CAND404");
        assert!(llm.calls().is_empty());
    }
}
