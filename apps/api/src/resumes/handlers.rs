use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Response,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::handlers::pdf_response;
use crate::generation::handlers::validate_job;
use crate::generation::profile_text::profile_text;
use crate::profile::store::ProfileSnapshot;
use crate::render::surface::render_view;
use crate::resumes::repository::{JobDetails, NewResume, ResumeRecord, ResumeUpdate};
use crate::session::Identity;
use crate::state::AppState;
use crate::templates::TemplateId;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub job_details: Option<JobDetails>,
    /// Score the profile against the job before storing. Defaults to true
    /// when job details are present.
    #[serde(default)]
    pub score_match: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub template: Option<String>,
}

fn require_user(identity: &Identity) -> Result<&str, AppError> {
    identity
        .user_id()
        .ok_or_else(|| AppError::Forbidden("Sign in to save generated resumes".to_string()))
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Resume {id} not found"))
}

/// POST /api/v1/resumes
///
/// Stores a snapshot of the session's current profile. When scoring is
/// requested and fails, nothing is stored.
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    identity: Identity,
    Json(request): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<ResumeRecord>), AppError> {
    let user_id = require_user(&identity)?;
    let session = state.sessions.get_or_open(&identity).await?;
    let snapshot = session.store.snapshot();

    let mut new = NewResume {
        profile: snapshot.profile.as_ref().clone(),
        ..Default::default()
    };

    if let Some(job) = request.job_details {
        if request.score_match.unwrap_or(true) {
            let job_text = validate_job(&job)?;
            let report = state
                .generator
                .match_score(&profile_text(&snapshot.profile), &job_text)
                .await?;
            new.match_score = Some(report.match_score);
            new.recommendations = report.recommendations;
        }
        new.job_details = Some(job);
    }

    let record = state.resumes.create(user_id, new).await?;
    info!(
        "Generated resume {} for user {user_id} from revision {}",
        record.id, snapshot.revision
    );
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /api/v1/resumes?limit=
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    identity: Identity,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ResumeRecord>>, AppError> {
    let user_id = require_user(&identity)?;
    Ok(Json(state.resumes.list(user_id, query.limit).await?))
}

/// GET /api/v1/resumes/latest
pub async fn handle_latest_resume(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ResumeRecord>, AppError> {
    let user_id = require_user(&identity)?;
    state
        .resumes
        .latest(user_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No generated resumes yet".to_string()))
}

/// GET /api/v1/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeRecord>, AppError> {
    let user_id = require_user(&identity)?;
    state
        .resumes
        .get(user_id, id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// PATCH /api/v1/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Json(update): Json<ResumeUpdate>,
) -> Result<Json<ResumeRecord>, AppError> {
    let user_id = require_user(&identity)?;
    if update.is_empty() {
        return Err(AppError::Validation("No fields to update".to_string()));
    }
    if update.match_score.is_some_and(|s| s > 100) {
        return Err(AppError::Validation(
            "matchScore must be between 0 and 100".to_string(),
        ));
    }
    state
        .resumes
        .update(user_id, id, update)
        .await?
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// DELETE /api/v1/resumes/:id
///
/// Soft delete: the record is flagged and hidden, not removed.
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let user_id = require_user(&identity)?;
    if state.resumes.soft_delete(user_id, id).await? {
        info!("Soft-deleted resume {id} for user {user_id}");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(id))
    }
}

/// GET /api/v1/resumes/:id/export?template=
///
/// Exports a stored snapshot. Without `template` the session's selected
/// template is used. Shares the session's export gate.
pub async fn handle_export_resume(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, AppError> {
    let user_id = require_user(&identity)?;
    let record = state
        .resumes
        .get(user_id, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let session = state.sessions.get_or_open(&identity).await?;
    let template = match query.template.as_deref() {
        Some(t) => t.parse::<TemplateId>()?,
        None => session.surface.template(),
    };
    let _permit = session.export_gate.try_acquire()?;

    let snapshot = ProfileSnapshot {
        revision: 0,
        profile: Arc::new(record.profile),
    };
    let view = Arc::new(render_view(&snapshot, template));
    info!("Exporting stored resume {id} with template {template}");

    let file = state
        .exporter
        .export(view, snapshot.profile.display_name())
        .await?;
    Ok(pdf_response(file))
}
