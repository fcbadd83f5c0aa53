pub mod health;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::export::handlers as export;
use crate::generation::handlers as ai;
use crate::profile::handlers as profile;
use crate::render::handlers as preview;
use crate::resumes::handlers as resumes;
use crate::session::handlers as session;
use crate::state::AppState;
use crate::templates::handlers as templates;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session
        .route("/api/v1/session", delete(session::handle_close_session))
        .route("/api/v1/session/status", get(session::handle_session_status))
        // Profile Store
        .route("/api/v1/profile", get(profile::handle_get_profile))
        .route("/api/v1/profile/edits", post(profile::handle_apply_edit))
        // Templates + Render Surface
        .route("/api/v1/templates", get(templates::handle_list_templates))
        .route(
            "/api/v1/preview/template",
            put(templates::handle_select_template),
        )
        .route("/api/v1/preview", get(preview::handle_preview_svg))
        .route(
            "/api/v1/preview/document",
            get(preview::handle_preview_document),
        )
        // Export
        .route("/api/v1/export", post(export::handle_export_session))
        // AI helpers
        .route("/api/v1/ai/rewrite", post(ai::handle_rewrite))
        .route("/api/v1/ai/match-score", post(ai::handle_match_score))
        .route("/api/v1/ai/assistant", post(ai::handle_assistant))
        // Generated resumes
        .route(
            "/api/v1/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_generate_resume),
        )
        .route("/api/v1/resumes/latest", get(resumes::handle_latest_resume))
        .route(
            "/api/v1/resumes/:id",
            get(resumes::handle_get_resume)
                .patch(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        .route(
            "/api/v1/resumes/:id/export",
            get(resumes::handle_export_resume),
        )
        .with_state(state)
}
