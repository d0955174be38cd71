//! Report Sink: durable storage for generated reports.
//!
//! Keys are derived deterministically from the subject identifiers, so a
//! rerun for the same candidate/job pair overwrites the previous report.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

pub mod handlers;

#[cfg(test)]
pub mod memory;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to encode report {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },

    #[error("Stored report {key} is corrupt: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },
}

/// The kinds of report persisted, each with a deterministic storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ReportKey {
    /// Talent intelligence report: `TIR_<person>_<job|nojob>`.
    TalentIntelligence {
        person_id: String,
        job_id: Option<String>,
    },
    /// Merged multi-agent output: `<person>_<job>_orchestrated`.
    Orchestrated { person_id: String, job_id: String },
}

impl ReportKey {
    pub fn talent_intelligence(person_id: &str, job_id: Option<&str>) -> Self {
        ReportKey::TalentIntelligence {
            person_id: person_id.to_string(),
            job_id: job_id.map(String::from),
        }
    }

    pub fn orchestrated(person_id: &str, job_id: &str) -> Self {
        ReportKey::Orchestrated {
            person_id: person_id.to_string(),
            job_id: job_id.to_string(),
        }
    }

    /// Storage name, restricted to `[A-Za-z0-9_-]`.
    ///
    /// Each identifier is escaped on its own (see `escape_id`), so `_` only
    /// ever appears as a separator and distinct identifiers give distinct keys.
    pub fn as_storage_key(&self) -> String {
        match self {
            ReportKey::TalentIntelligence { person_id, job_id } => {
                let job = match job_id.as_deref() {
                    // A job literally named `nojob` must not collide with "no job".
                    Some(NO_JOB) => format!("-{:02X}{}", b'n', &NO_JOB[1..]),
                    Some(id) => escape_id(id),
                    None => NO_JOB.to_string(),
                };
                format!("TIR_{}_{job}", escape_id(person_id))
            }
            ReportKey::Orchestrated { person_id, job_id } => {
                format!("{}_{}_orchestrated", escape_id(person_id), escape_id(job_id))
            }
        }
    }
}

impl std::fmt::Display for ReportKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_storage_key())
    }
}

/// Job segment of a TIR key generated without a job.
const NO_JOB: &str = "nojob";

/// Keeps ASCII alphanumerics and writes every other byte as `-XX` (uppercase hex).
/// Reversible, and the output never contains `_`.
fn escape_id(id: &str) -> String {
    let mut out = String::with_capacity(id.len());
    for byte in id.bytes() {
        if byte.is_ascii_alphanumeric() {
            out.push(byte as char);
        } else {
            out.push_str(&format!("-{byte:02X}"));
        }
    }
    out
}

/// Persists report mappings. Implementations must be safe to share across requests.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn store(&self, key: &ReportKey, value: &Value) -> Result<(), SinkError>;

    /// Reads back a previously stored report, if any.
    async fn load(&self, key: &ReportKey) -> Result<Option<Value>, SinkError>;
}

/// Writes each report as pretty-printed JSON to `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileReportSink {
    dir: PathBuf,
}

impl FileReportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &ReportKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_storage_key()))
    }
}

#[async_trait]
impl ReportSink for FileReportSink {
    async fn store(&self, key: &ReportKey, value: &Value) -> Result<(), SinkError> {
        let body = serde_json::to_vec_pretty(value).map_err(|source| SinkError::Encode {
            key: key.to_string(),
            source,
        })?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|source| SinkError::Io {
                path: self.dir.clone(),
                source,
            })?;

        let path = self.path_for(key);
        tokio::fs::write(&path, body)
            .await
            .map_err(|source| SinkError::Io {
                path: path.clone(),
                source,
            })?;

        info!("Report saved at {}", path.display());
        Ok(())
    }

    async fn load(&self, key: &ReportKey) -> Result<Option<Value>, SinkError> {
        let path = self.path_for(key);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(SinkError::Io { path, source }),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| SinkError::Corrupt {
                key: key.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_storage_keys() {
        assert_eq!(
            ReportKey::talent_intelligence("CAND007", Some("JD001")).as_storage_key(),
            "TIR_CAND007_JD001"
        );
        assert_eq!(
            ReportKey::talent_intelligence("CAND007", None).as_storage_key(),
            "TIR_CAND007_nojob"
        );
        assert_eq!(
            ReportKey::orchestrated("CAND007", "JD001").as_storage_key(),
            "CAND007_JD001_orchestrated"
        );
    }

    #[test]
    fn test_storage_key_cannot_escape_directory() {
        let key = ReportKey::orchestrated("../../etc", "passwd");
        assert_eq!(
            key.as_storage_key(),
            "-2E-2E-2F-2E-2E-2Fetc_passwd_orchestrated"
        );
    }

    #[test]
    fn test_distinct_ids_never_share_a_key() {
        let orchestrated = [
            ReportKey::orchestrated("CAND.1", "JD001"),
            ReportKey::orchestrated("CAND-1", "JD001"),
            ReportKey::orchestrated("CAND_1", "JD001"),
            ReportKey::orchestrated("CAND", "1_JD001"),
            ReportKey::orchestrated("CAND_1_JD001", ""),
        ];
        let tir = [
            ReportKey::talent_intelligence("CAND1", None),
            ReportKey::talent_intelligence("CAND1", Some("nojob")),
            ReportKey::talent_intelligence("CAND1", Some("no job")),
        ];
        let keys: std::collections::HashSet<String> = orchestrated
            .iter()
            .chain(tir.iter())
            .map(ReportKey::as_storage_key)
            .collect();
        assert_eq!(keys.len(), orchestrated.len() + tir.len());
        for key in &keys {
            assert!(key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
        }
    }

    #[tokio::test]
    async fn test_file_sink_store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileReportSink::new(dir.path().join("reports"));
        let key = ReportKey::orchestrated("CAND001", "JD001");
        let report = json!({"person_id": "CAND001", "tir": {"YOE": 4}});

        sink.store(&key, &report).await.unwrap();

        let path = dir.path().join("reports/CAND001_JD001_orchestrated.json");
        assert!(path.exists());
        assert_eq!(sink.load(&key).await.unwrap(), Some(report));
    }

    #[tokio::test]
    async fn test_file_sink_load_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileReportSink::new(dir.path());
        let key = ReportKey::orchestrated("CAND001", "JD404");
        assert_eq!(sink.load(&key).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_sink_store_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileReportSink::new(dir.path());
        let key = ReportKey::talent_intelligence("CAND001", None);

        sink.store(&key, &json!({"v": 1})).await.unwrap();
        sink.store(&key, &json!({"v": 2})).await.unwrap();

        assert_eq!(sink.load(&key).await.unwrap(), Some(json!({"v": 2})));
    }
}
