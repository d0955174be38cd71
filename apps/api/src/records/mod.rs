//! Record Store: the candidate, job and market data every agent reads from.
//!
//! Loaded once at startup from a directory of JSON files and never mutated
//! afterwards; shared read-only through `AppState`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

pub mod handlers;
pub mod models;

pub use models::{Collection, MarketData, MarketRole, Record};

const MARKET_FILE: &str = "market_intelligence.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("{path} must contain {expected}")]
    Shape { path: PathBuf, expected: &'static str },
}

/// Read-only, in-memory view of the data directory.
#[derive(Debug, Default)]
pub struct RecordStore {
    collections: HashMap<Collection, Vec<Record>>,
    market: MarketData,
}

impl RecordStore {
    /// Loads every collection from `data_dir`. Missing files become empty
    /// collections; unreadable or malformed files are an error.
    pub async fn load(data_dir: &Path) -> Result<Self, StoreError> {
        let mut collections = HashMap::new();

        for collection in Collection::ALL {
            let path = data_dir.join(collection.file_name());
            let records = match read_json(&path).await? {
                Some(value) => into_records(value, &path)?,
                None => {
                    warn!("{} not found, {:?} collection is empty", path.display(), collection);
                    Vec::new()
                }
            };
            info!("Loaded {} {:?} records", records.len(), collection);
            collections.insert(collection, records);
        }

        let market_path = data_dir.join(MARKET_FILE);
        let market = match read_json(&market_path).await? {
            Some(value) => serde_json::from_value(value).map_err(|source| StoreError::Parse {
                path: market_path.clone(),
                source,
            })?,
            None => {
                warn!("{} not found, market data is empty", market_path.display());
                MarketData::default()
            }
        };
        info!("Loaded {} market role rows", market.roles.len());

        Ok(Self {
            collections,
            market,
        })
    }

    /// Builds a store directly from in-memory collections.
    pub fn from_parts(collections: HashMap<Collection, Vec<Record>>, market: MarketData) -> Self {
        Self {
            collections,
            market,
        }
    }

    pub fn records(&self, collection: Collection) -> &[Record] {
        self.collections
            .get(&collection)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// First record in `collection` whose `field` equals `value` as a string.
    pub fn lookup(&self, collection: Collection, field: &str, value: &str) -> Option<&Record> {
        self.records(collection)
            .iter()
            .find(|record| record.get(field).and_then(Value::as_str) == Some(value))
    }

    /// Looks a record up by its collection's own identifier field.
    pub fn get(&self, collection: Collection, id: &str) -> Option<&Record> {
        self.lookup(collection, collection.id_field(), id)
    }

    pub fn job(&self, job_id: &str) -> Option<&Record> {
        self.get(Collection::Jobs, job_id)
    }

    /// Candidate ids, in resume file order.
    pub fn person_ids(&self) -> Vec<String> {
        ids(self.records(Collection::Resumes), "person_id")
    }

    /// Job ids, in job file order.
    pub fn job_ids(&self) -> Vec<String> {
        ids(self.records(Collection::Jobs), "job_id")
    }

    pub fn market(&self) -> &MarketData {
        &self.market
    }
}

fn ids(records: &[Record], field: &str) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.get(field).and_then(Value::as_str).map(String::from))
        .collect()
}

async fn read_json(path: &Path) -> Result<Option<Value>, StoreError> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

fn into_records(value: Value, path: &Path) -> Result<Vec<Record>, StoreError> {
    let shape_error = || StoreError::Shape {
        path: path.to_path_buf(),
        expected: "a JSON array of objects",
    };
    match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(record) => Ok(record),
                _ => Err(shape_error()),
            })
            .collect(),
        _ => Err(shape_error()),
    }
}
