use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::session::Identity;
use crate::state::AppState;
use crate::templates::{resolve, Template, TemplateId};

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<&'static Template>> {
    Json(TemplateId::ALL.into_iter().map(resolve).collect())
}

#[derive(Debug, Deserialize)]
pub struct SelectTemplateRequest {
    pub template: String,
}

#[derive(Debug, Serialize)]
pub struct SelectTemplateResponse {
    pub template: TemplateId,
    pub name: &'static str,
}

/// PUT /api/v1/preview/template
///
/// Selection is held by the session only and resets when it closes.
pub async fn handle_select_template(
    State(state): State<AppState>,
    identity: Identity,
    Json(body): Json<SelectTemplateRequest>,
) -> Result<Json<SelectTemplateResponse>, AppError> {
    let template: TemplateId = body.template.parse()?;
    let session = state.sessions.get_or_open(&identity).await?;
    session.surface.select_template(template);
    Ok(Json(SelectTemplateResponse {
        template,
        name: template.display_name(),
    }))
}
