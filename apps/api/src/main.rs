mod config;
mod db;
mod errors;
mod export;
mod generation;
mod llm_client;
mod models;
mod profile;
mod render;
mod resumes;
mod routes;
mod session;
mod state;
mod templates;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::export::raster::Rasterizer;
use crate::export::ExportPipeline;
use crate::generation::LlmTextGenerator;
use crate::llm_client::LlmClient;
use crate::profile::repository::PgProfileRepository;
use crate::resumes::PgResumeRepository;
use crate::routes::build_router;
use crate::session::SessionRegistry;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Vitae API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.anthropic_api_key.clone())
        .context("Failed to build LLM HTTP client")?;
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    // Font discovery walks the filesystem, keep it off the runtime threads
    let font_dir = config.font_dir.clone();
    let rasterizer =
        tokio::task::spawn_blocking(move || Rasterizer::new(font_dir.as_deref())).await?;
    let exporter = ExportPipeline::new(
        Arc::new(rasterizer),
        config.export_page_width_px,
        config.export_timeout,
    );
    info!(
        "Export pipeline ready: {}px pages, {}s timeout",
        config.export_page_width_px,
        config.export_timeout.as_secs()
    );

    let sessions = SessionRegistry::new(
        Arc::new(PgProfileRepository::new(db.clone())),
        config.autosave_debounce,
    );
    info!(
        "Profile autosave quiet window: {}ms",
        config.autosave_debounce.as_millis()
    );

    // Build app state
    let state = AppState {
        sessions,
        resumes: Arc::new(PgResumeRepository::new(db)),
        generator: Arc::new(LlmTextGenerator::new(llm)),
        exporter,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
