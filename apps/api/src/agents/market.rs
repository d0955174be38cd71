//! Market Optimizer: compensation benchmarks, talent trends and sourcing channels
//! for a job, plus a model-written summary.
//!
//! The numbers are computed locally; only the summary comes from the model.
//! A rejected summary degrades to the raw model text rather than failing.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::agents::prompts::MARKET_SUMMARY_TEMPLATE;
use crate::agents::stats::{compensation_benchmarks, CompensationBenchmarks};
use crate::agents::{complete_json, str_field, AgentError, AgentName};
use crate::llm_client::prompts::{FAIRNESS_INSTRUCTION, JSON_ONLY_INSTRUCTION};
use crate::llm_client::{CompletionClient, CompletionParams};
use crate::normalize::ShapeContract;
use crate::records::{MarketRole, Record, RecordStore};

const TEMPERATURE: f32 = 0.7;
const DEFAULT_SENIORITY: &str = "Mid";
pub const NO_MARKET_DATA: &str = "No market data found";

pub const SUMMARY_KEYS: &[&str] = &["summary", "recommendations"];

pub fn contract() -> ShapeContract {
    ShapeContract::object(SUMMARY_KEYS)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hotspot {
    pub location: String,
    pub openings: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TalentTrends {
    pub total_openings: u64,
    pub avg_talent_supply_index: f64,
    pub hotspots: Vec<Hotspot>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelScore {
    pub channel: String,
    pub effectiveness: f64,
}

/// Market intelligence for one job. When no market rows match, only the
/// role fields and `error` are present.
#[derive(Debug, Clone, Serialize)]
pub struct MarketReport {
    pub job_id: String,
    pub role: String,
    pub location: String,
    pub seniority: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compensation: Option<CompensationBenchmarks>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub talent_trends: Option<TalentTrends>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_channels: Option<Vec<ChannelScore>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A market report plus the reason it is degraded, if it is.
#[derive(Debug, Clone)]
pub struct MarketAnalysis {
    pub report: MarketReport,
    pub degraded: Option<String>,
}

/// The role/location/seniority triple market rows are matched on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleQuery {
    pub role: String,
    pub location: String,
    pub seniority: String,
}

impl RoleQuery {
    /// Role from `role_title`, then `title`, then `role`; seniority defaults to "Mid".
    pub fn from_job(job: &Record) -> Self {
        let role = ["role_title", "title", "role"]
            .iter()
            .filter_map(|key| str_field(job, key))
            .find(|s| !s.is_empty())
            .unwrap_or_default();
        let seniority = str_field(job, "seniority")
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_SENIORITY);
        Self {
            role: role.to_string(),
            location: str_field(job, "location").unwrap_or_default().to_string(),
            seniority: seniority.to_string(),
        }
    }

    /// Case-insensitive match on all three fields.
    pub fn matches(&self, row: &MarketRole) -> bool {
        row.role.to_lowercase() == self.role.to_lowercase()
            && row.location.to_lowercase() == self.location.to_lowercase()
            && row.seniority.to_lowercase() == self.seniority.to_lowercase()
    }
}

pub fn talent_trends(rows: &[&MarketRole]) -> TalentTrends {
    let total_openings = rows.iter().map(|r| r.openings).sum();
    let avg_talent_supply_index = if rows.is_empty() {
        0.0
    } else {
        rows.iter().map(|r| r.talent_supply_index).sum::<f64>() / rows.len() as f64
    };
    let mut hotspots: Vec<Hotspot> = rows
        .iter()
        .map(|r| Hotspot {
            location: r.location.clone(),
            openings: r.openings,
        })
        .collect();
    // Stable sort keeps file order among equal openings.
    hotspots.sort_by(|a, b| b.openings.cmp(&a.openings));

    TalentTrends {
        total_openings,
        avg_talent_supply_index,
        hotspots,
    }
}

/// Mean effectiveness per channel across rows, highest first.
pub fn rank_channels(rows: &[&MarketRole]) -> Vec<ChannelScore> {
    let mut scores: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in rows {
        for (channel, score) in &row.channels {
            scores.entry(channel.as_str()).or_default().push(*score);
        }
    }
    let mut ranked: Vec<ChannelScore> = scores
        .into_iter()
        .map(|(channel, values)| ChannelScore {
            channel: channel.to_string(),
            effectiveness: values.iter().sum::<f64>() / values.len() as f64,
        })
        .collect();
    ranked.sort_by(|a, b| b.effectiveness.total_cmp(&a.effectiveness));
    ranked
}

/// Builds the market report for `job_id`.
pub async fn analyze(
    store: &RecordStore,
    llm: &dyn CompletionClient,
    job_id: &str,
) -> Result<MarketAnalysis, AgentError> {
    let job = store
        .job(job_id)
        .ok_or_else(|| AgentError::not_found("job", job_id))?;
    let query = RoleQuery::from_job(job);

    let rows: Vec<&MarketRole> = store
        .market()
        .roles
        .iter()
        .filter(|row| query.matches(row))
        .collect();

    if rows.is_empty() {
        warn!(
            "No market rows for {job_id} ({} / {} / {})",
            query.role, query.location, query.seniority
        );
        return Ok(MarketAnalysis {
            report: MarketReport {
                job_id: job_id.to_string(),
                role: query.role,
                location: query.location,
                seniority: query.seniority,
                compensation: None,
                talent_trends: None,
                recommended_channels: None,
                ai_summary: None,
                updated_at: None,
                error: Some(NO_MARKET_DATA.to_string()),
            },
            degraded: Some(NO_MARKET_DATA.to_string()),
        });
    }

    let samples: Vec<f64> = rows
        .iter()
        .flat_map(|r| r.salary_samples_inr_lpa.iter().copied())
        .collect();
    let compensation = compensation_benchmarks(&samples);
    let trends = talent_trends(&rows);
    let channels = rank_channels(&rows);
    info!(
        "Market for {job_id}: {} rows, {} salary samples, {} channels",
        rows.len(),
        compensation.sample_size,
        channels.len()
    );

    let prompt = MARKET_SUMMARY_TEMPLATE
        .replace("{json_only_instruction}", JSON_ONLY_INSTRUCTION)
        .replace("{fairness_instruction}", FAIRNESS_INSTRUCTION)
        .replace("{p25}", &compensation.p25.to_string())
        .replace("{median}", &compensation.median.to_string())
        .replace("{p75}", &compensation.p75.to_string())
        .replace("{total_openings}", &trends.total_openings.to_string())
        .replace("{avg_tsi}", &format!("{:.2}", trends.avg_talent_supply_index))
        .replace("{hotspots_json}", &to_json(&trends.hotspots))
        .replace("{channels_json}", &to_json(&channels))
        .replace("{job_id}", job_id)
        .replace("{role}", &query.role)
        .replace("{location}", &query.location)
        .replace("{seniority}", &query.seniority);

    let (ai_summary, degraded) = match complete_json(
        llm,
        AgentName::MarketOptimizer,
        &prompt,
        CompletionParams::with_temperature(TEMPERATURE),
        &contract(),
    )
    .await
    {
        Ok(summary) => (summary, None),
        Err(AgentError::Normalization(failure)) => {
            let fallback = json!({
                "job_id": job_id,
                "summary": failure.raw_text.trim(),
                "recommendations": [],
            });
            (fallback, Some(failure.to_string()))
        }
        Err(e) => return Err(e),
    };

    Ok(MarketAnalysis {
        report: MarketReport {
            job_id: job_id.to_string(),
            role: query.role,
            location: query.location,
            seniority: query.seniority,
            compensation: Some(compensation),
            talent_trends: Some(trends),
            recommended_channels: Some(channels),
            ai_summary: Some(ai_summary),
            updated_at: store.market().updated_at.clone(),
            error: None,
        },
        degraded,
    })
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::fake::FakeCompletionClient;
    use crate::records::tests::fixture_store;

    fn job(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_role_query_fallbacks() {
        let q = RoleQuery::from_job(&job(json!({"title": "SRE", "location": "Pune"})));
        assert_eq!(q.role, "SRE");
        assert_eq!(q.location, "Pune");
        assert_eq!(q.seniority, "Mid");

        let q = RoleQuery::from_job(&job(json!({"role_title": "", "role": "Data Engineer"})));
        assert_eq!(q.role, "Data Engineer");
        assert_eq!(q.location, "");
    }

    #[test]
    fn test_trends_and_channels() {
        let store = fixture_store();
        let query = RoleQuery::from_job(store.job("JD001").unwrap());
        let rows: Vec<&MarketRole> = store
            .market()
            .roles
            .iter()
            .filter(|r| query.matches(r))
            .collect();
        assert_eq!(rows.len(), 2);

        let trends = talent_trends(&rows);
        assert_eq!(trends.total_openings, 80);
        assert!((trends.avg_talent_supply_index - 0.5).abs() < 1e-9);
        assert_eq!(trends.hotspots[0].openings, 50);

        let channels = rank_channels(&rows);
        assert_eq!(channels[0].channel, "Referrals");
        assert!((channels[0].effectiveness - 0.9).abs() < 1e-9);
        assert_eq!(channels[1].channel, "LinkedIn");
        assert!((channels[1].effectiveness - 0.6).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_analyze_with_valid_summary() {
        let store = fixture_store();
        let llm = FakeCompletionClient::always(
            "```json\n{\"job_id\": \"JD001\", \"summary\": \"Competitive market.\", \"recommendations\": [\"Use referrals\"],}\n```",
        );

        let analysis = analyze(&store, &llm, "JD001").await.unwrap();
        assert!(analysis.degraded.is_none());

        let report = serde_json::to_value(&analysis.report).unwrap();
        assert_eq!(report["compensation"]["p25"], 20.0);
        assert_eq!(report["compensation"]["median"], 25.0);
        assert_eq!(report["compensation"]["p75"], 30.0);
        assert_eq!(report["compensation"]["sample_size"], 4);
        assert_eq!(report["ai_summary"]["summary"], "Competitive market.");
        assert_eq!(report["updated_at"], "2025-09-01");
        assert!(report.get("error").is_none());

        let (prompt, _) = &llm.calls()[0];
        assert!(prompt.contains("p25 20, median 25, p75 30"));
        assert!(prompt.contains("Avg Talent Supply Index: 0.50"));
    }

    #[tokio::test]
    async fn test_analyze_falls_back_to_raw_summary() {
        let store = fixture_store();
        let llm = FakeCompletionClient::always("The market is tight; use referrals.");

        let analysis = analyze(&store, &llm, "JD001").await.unwrap();

        assert!(analysis.degraded.unwrap().contains("malformed JSON"));
        let summary = analysis.report.ai_summary.unwrap();
        assert_eq!(
            summary,
            json!({
                "job_id": "JD001",
                "summary": "The market is tight; use referrals.",
                "recommendations": []
            })
        );
    }

    #[tokio::test]
    async fn test_analyze_without_market_rows_skips_model() {
        let llm = FakeCompletionClient::always("{}");
        let mut collections = std::collections::HashMap::new();
        collections.insert(
            crate::records::Collection::Jobs,
            vec![job(json!({"job_id": "JD009", "title": "Designer", "location": "Goa"}))],
        );
        let store = RecordStore::from_parts(collections, crate::records::MarketData::default());

        let analysis = analyze(&store, &llm, "JD009").await.unwrap();

        assert!(llm.calls().is_empty());
        assert_eq!(analysis.degraded.as_deref(), Some(NO_MARKET_DATA));
        let report = serde_json::to_value(&analysis.report).unwrap();
        assert_eq!(
            report,
            json!({
                "job_id": "JD009",
                "role": "Designer",
                "location": "Goa",
                "seniority": "Mid",
                "error": "No market data found"
            })
        );
    }

    #[tokio::test]
    async fn test_analyze_unknown_job() {
        let store = fixture_store();
        let llm = FakeCompletionClient::always("{}");
        let err = analyze(&store, &llm, "JD404").await.unwrap_err();
        assert!(matches!(err, AgentError::NotFound { what: "job", .. }));
    }

    #[tokio::test]
    async fn test_analyze_transport_failure_is_terminal() {
        let store = fixture_store();
        let llm = FakeCompletionClient::failing();
        let err = analyze(&store, &llm, "JD001").await.unwrap_err();
        assert!(matches!(err, AgentError::Llm(_)));
    }
}
