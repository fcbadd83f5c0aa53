use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;
use crate::session::Identity;
use crate::state::AppState;
use crate::templates::{RenderedDocument, TemplateId};

pub const REVISION_HEADER: &str = "x-profile-revision";
pub const TEMPLATE_HEADER: &str = "x-template-id";

/// GET /api/v1/preview
///
/// The Render Surface as SVG markup.
pub async fn handle_preview_svg(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Response, AppError> {
    let session = state.sessions.get_or_open(&identity).await?;
    let view = session.surface.current(&session.store);

    Ok((
        [
            (header::CONTENT_TYPE, "image/svg+xml".to_string()),
            (header::CACHE_CONTROL, "no-store".to_string()),
            (
                header::HeaderName::from_static(REVISION_HEADER),
                view.revision.to_string(),
            ),
            (
                header::HeaderName::from_static(TEMPLATE_HEADER),
                view.template.to_string(),
            ),
        ],
        view.svg.clone(),
    )
        .into_response())
}

#[derive(Debug, Serialize)]
pub struct PreviewDocument<'a> {
    pub template: TemplateId,
    pub revision: u64,
    pub width: f32,
    pub height: f32,
    pub document: &'a RenderedDocument,
}

/// GET /api/v1/preview/document
///
/// The structured document behind the preview.
pub async fn handle_preview_document(
    State(state): State<AppState>,
    identity: Identity,
) -> Result<Response, AppError> {
    let session = state.sessions.get_or_open(&identity).await?;
    let view = session.surface.current(&session.store);

    Ok(Json(PreviewDocument {
        template: view.template,
        revision: view.revision,
        width: view.width,
        height: view.height,
        document: &view.document,
    })
    .into_response())
}
