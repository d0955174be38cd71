//! In-memory report sink for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{ReportKey, ReportSink, SinkError};

#[derive(Debug, Default)]
pub struct MemoryReportSink {
    reports: Mutex<HashMap<String, Value>>,
    fail_writes: bool,
}

impl MemoryReportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose every `store` fails with an I/O error.
    pub fn failing() -> Self {
        Self {
            reports: Mutex::new(HashMap::new()),
            fail_writes: true,
        }
    }

    pub fn get(&self, key: &ReportKey) -> Option<Value> {
        self.reports
            .lock()
            .unwrap()
            .get(&key.as_storage_key())
            .cloned()
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.reports.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ReportSink for MemoryReportSink {
    async fn store(&self, key: &ReportKey, value: &Value) -> Result<(), SinkError> {
        if self.fail_writes {
            return Err(SinkError::Io {
                path: key.as_storage_key().into(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
            });
        }
        self.reports
            .lock()
            .unwrap()
            .insert(key.as_storage_key(), value.clone());
        Ok(())
    }

    async fn load(&self, key: &ReportKey) -> Result<Option<Value>, SinkError> {
        Ok(self.get(key))
    }
}
