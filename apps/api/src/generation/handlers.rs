//! Axum route handlers for the AI helpers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::generation::generator::{AssistantTurn, MatchReport};
use crate::generation::profile_text::{job_text, profile_text};
use crate::resumes::repository::JobDetails;
use crate::session::Identity;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RewriteRequest {
    pub description: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteResponse {
    pub rewritten_description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchScoreRequest {
    pub job_details: JobDetails,
}

#[derive(Debug, Deserialize)]
pub struct AssistantRequest {
    pub query: String,
    #[serde(default)]
    pub context: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ai/rewrite
pub async fn handle_rewrite(
    State(state): State<AppState>,
    _identity: Identity,
    Json(request): Json<RewriteRequest>,
) -> Result<Json<RewriteResponse>, AppError> {
    if request.description.trim().is_empty() {
        return Err(AppError::Validation(
            "description cannot be empty".to_string(),
        ));
    }

    let rewritten_description = state.generator.rewrite(&request.description).await?;
    Ok(Json(RewriteResponse {
        rewritten_description,
    }))
}

/// POST /api/v1/ai/match-score
///
/// Scores the session's current profile against the given job.
pub async fn handle_match_score(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<MatchScoreRequest>,
) -> Result<Json<MatchReport>, AppError> {
    let job = validate_job(&request.job_details)?;
    let session = state.sessions.get_or_open(&identity).await?;
    let snapshot = session.store.snapshot();

    let report = state
        .generator
        .match_score(&profile_text(&snapshot.profile), &job)
        .await?;
    Ok(Json(report))
}

/// POST /api/v1/ai/assistant
///
/// The client carries the conversation: it sends back the `newContext` of the
/// previous turn as `context`.
pub async fn handle_assistant(
    State(state): State<AppState>,
    _identity: Identity,
    Json(request): Json<AssistantRequest>,
) -> Result<Json<AssistantTurn>, AppError> {
    if request.query.trim().is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let turn = state
        .generator
        .assist(request.query.trim(), request.context.as_deref())
        .await?;
    Ok(Json(turn))
}

/// Job text sent for scoring. The description is the only required field.
pub fn validate_job(job: &JobDetails) -> Result<String, AppError> {
    if job.description.trim().is_empty() {
        return Err(AppError::Validation(
            "job description cannot be empty".to_string(),
        ));
    }
    Ok(job_text(&job.title, &job.company, &job.description))
}
