use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A flat record from one of the data files, keyed by `person_id` or `job_id`.
pub type Record = Map<String, Value>;

/// The named record collections loaded from the data directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Resumes,
    Linkedin,
    Github,
    Leetcode,
    CandidateText,
    Jobs,
}

impl Collection {
    pub const ALL: [Collection; 6] = [
        Collection::Resumes,
        Collection::Linkedin,
        Collection::Github,
        Collection::Leetcode,
        Collection::CandidateText,
        Collection::Jobs,
    ];

    pub fn file_name(self) -> &'static str {
        match self {
            Collection::Resumes => "resume.json",
            Collection::Linkedin => "linkedin.json",
            Collection::Github => "github.json",
            Collection::Leetcode => "leetcode.json",
            Collection::CandidateText => "candidate_text.json",
            Collection::Jobs => "jd.json",
        }
    }

    /// The identifier field records in this collection are keyed by.
    pub fn id_field(self) -> &'static str {
        match self {
            Collection::Jobs => "job_id",
            _ => "person_id",
        }
    }
}

/// One row of `market_intelligence.json` → `roles`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketRole {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub seniority: String,
    #[serde(default)]
    pub openings: u64,
    #[serde(default)]
    pub talent_supply_index: f64,
    #[serde(default)]
    pub salary_samples_inr_lpa: Vec<f64>,
    /// Sourcing channel name → effectiveness score.
    #[serde(default)]
    pub channels: BTreeMap<String, f64>,
}

/// Contents of `market_intelligence.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub updated_at: Option<Value>,
    #[serde(default)]
    pub roles: Vec<MarketRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_role_defaults_missing_fields() {
        let role: MarketRole =
            serde_json::from_str(r#"{"role": "Backend Engineer", "openings": 12}"#).unwrap();
        assert_eq!(role.role, "Backend Engineer");
        assert_eq!(role.openings, 12);
        assert!(role.salary_samples_inr_lpa.is_empty());
        assert!(role.channels.is_empty());
    }

    #[test]
    fn test_market_data_deserializes() {
        let json = r#"{
            "updated_at": "2025-09-01",
            "roles": [{
                "role": "Backend Engineer",
                "location": "Bengaluru, IN",
                "seniority": "Mid",
                "openings": 40,
                "talent_supply_index": 0.62,
                "salary_samples_inr_lpa": [18, 22.5, 30],
                "channels": {"LinkedIn": 0.8, "Referrals": 0.9}
            }]
        }"#;
        let data: MarketData = serde_json::from_str(json).unwrap();
        assert_eq!(data.roles.len(), 1);
        assert_eq!(data.roles[0].salary_samples_inr_lpa, vec![18.0, 22.5, 30.0]);
        assert_eq!(data.roles[0].channels.get("Referrals"), Some(&0.9));
        assert_eq!(data.updated_at, Some(Value::from("2025-09-01")));
    }

    #[test]
    fn test_collection_id_fields() {
        assert_eq!(Collection::Jobs.id_field(), "job_id");
        assert_eq!(Collection::Leetcode.id_field(), "person_id");
    }
}
