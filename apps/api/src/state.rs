use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionClient;
use crate::records::RecordStore;
use crate::reports::ReportSink;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Loaded once at startup; read-only afterwards.
    pub store: Arc<RecordStore>,
    pub llm: Arc<dyn CompletionClient>,
    pub sink: Arc<dyn ReportSink>,
    pub profiler_use_ai: bool,
}

impl AppState {
    pub fn new(
        config: &Config,
        store: RecordStore,
        llm: Arc<dyn CompletionClient>,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            store: Arc::new(store),
            llm,
            sink,
            profiler_use_ai: config.profiler_use_ai,
        }
    }
}
