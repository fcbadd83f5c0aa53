use std::sync::Arc;

use crate::config::Config;
use crate::export::ExportPipeline;
use crate::generation::TextGenerator;
use crate::resumes::ResumeRepository;
use crate::session::SessionRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Open editing sessions, one per user or guest.
    pub sessions: SessionRegistry,
    pub resumes: Arc<dyn ResumeRepository>,
    /// Pluggable text generator. Production: `LlmTextGenerator`.
    pub generator: Arc<dyn TextGenerator>,
    pub exporter: ExportPipeline,
    pub config: Config,
}
