use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;
use tracing::debug;

use crate::errors::AppError;
use crate::profile::model::{EntryId, Profile};
use crate::profile::store::{ProfileEdit, ProfileSnapshot};
use crate::session::Identity;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub revision: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_id: Option<EntryId>,
    pub profile: Arc<Profile>,
}

impl ProfileResponse {
    fn from_snapshot(snapshot: ProfileSnapshot, created_id: Option<EntryId>) -> Self {
        Self {
            revision: snapshot.revision,
            created_id,
            profile: snapshot.profile,
        }
    }
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Json<ProfileResponse>, AppError> {
    let session = state.sessions.get_or_open(&identity).await?;
    Ok(Json(ProfileResponse::from_snapshot(
        session.store.snapshot(),
        None,
    )))
}

/// POST /api/v1/profile/edits
///
/// Applies one edit and returns the resulting snapshot. Persistence happens
/// later through the session's autosave.
pub async fn handle_apply_edit(
    State(state): State<AppState>,
    identity: Identity,
    Json(edit): Json<ProfileEdit>,
) -> Result<Json<ProfileResponse>, AppError> {
    let session = state.sessions.get_or_open(&identity).await?;
    let outcome = session.store.apply(edit)?;
    debug!(
        "Session {} now at revision {}",
        session.key, outcome.snapshot.revision
    );
    Ok(Json(ProfileResponse::from_snapshot(
        outcome.snapshot,
        outcome.created_id,
    )))
}
