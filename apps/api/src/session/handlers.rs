use axum::{extract::State, http::StatusCode, Json};

use crate::errors::AppError;
use crate::session::identity::Identity;
use crate::session::registry::SessionStatus;
use crate::state::AppState;

/// GET /api/v1/session/status
pub async fn handle_session_status(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<SessionStatus>, AppError> {
    let session = state.sessions.get_or_open(&identity).await?;
    Ok(Json(session.status()))
}

/// DELETE /api/v1/session
///
/// Called when the visitor navigates away. Idempotent.
pub async fn handle_close_session(
    State(state): State<AppState>,
    identity: Identity,
) -> StatusCode {
    state.sessions.close(&identity.key).await;
    StatusCode::NO_CONTENT
}
