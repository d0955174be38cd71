mod agents;
mod config;
mod errors;
mod llm_client;
mod normalize;
mod orchestration;
mod records;
mod reports;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::records::RecordStore;
use crate::reports::FileReportSink;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails fast on missing required env vars
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Recruit API v{}", env!("CARGO_PKG_VERSION"));

    // Load candidate, job and market data (read-only from here on)
    let store = RecordStore::load(&config.data_dir).await?;
    info!(
        "Record store ready: {} candidates, {} jobs from {}",
        store.person_ids().len(),
        store.job_ids().len(),
        config.data_dir.display()
    );

    // Initialize LLM client
    let llm = LlmClient::new(config.llm_api_url.clone(), config.llm_api_key.clone())?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Reports are written as JSON files
    let sink = FileReportSink::new(config.report_dir.clone());
    info!("Reports will be saved to {}", sink.dir().display());
    if !config.profiler_use_ai {
        info!("Profiler AI analyses disabled");
    }

    let state = AppState::new(&config, store, Arc::new(llm), Arc::new(sink));

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
