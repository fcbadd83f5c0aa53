use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use tracing::info;

use crate::errors::AppError;
use crate::export::filename::content_disposition;
use crate::export::ExportedFile;
use crate::session::Identity;
use crate::state::AppState;

pub const PAGE_COUNT_HEADER: &str = "x-page-count";

/// POST /api/v1/export
///
/// Exports the session's Render Surface in its selected template. Only one
/// export per session may be outstanding; a second request gets 409.
pub async fn handle_export_session(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Response, AppError> {
    let session = state.sessions.get_or_open(&identity).await?;
    let _permit = session.export_gate.try_acquire()?;

    let snapshot = session.store.snapshot();
    let view = session
        .surface
        .view_of(&snapshot, session.surface.template());
    info!(
        "Exporting session {} at revision {} with template {}",
        session.key, view.revision, view.template
    );

    let file = state
        .exporter
        .export(view, snapshot.profile.display_name())
        .await?;
    Ok(pdf_response(file))
}

pub fn pdf_response(file: ExportedFile) -> Response {
    (
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                content_disposition(&file.file_name),
            ),
            (
                header::HeaderName::from_static(PAGE_COUNT_HEADER),
                file.page_count.to_string(),
            ),
        ],
        file.bytes,
    )
        .into_response()
}
