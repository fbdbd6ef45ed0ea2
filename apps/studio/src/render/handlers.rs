//! Axum route handlers for the live preview.

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Html,
    Json,
};

use crate::errors::AppError;
use crate::models::options::{RenderConfig, RenderConfigPatch};
use crate::render::html::to_html_document;
use crate::render::tree::VisualTree;
use crate::session::SessionError;
use crate::state::AppState;

/// GET /api/v1/preview
///
/// The current preview as a standalone, inline-styled HTML page.
pub async fn handle_preview_html(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let session = state.session();
    let tree = session.preview().ok_or(SessionError::NoDocument)?;
    let title = session
        .document()
        .map(|doc| format!("{} - Resume", doc.personal_info.name))
        .unwrap_or_else(|| "Resume".to_string());
    Ok(Html(to_html_document(tree, &title)))
}

/// GET /api/v1/preview/tree
pub async fn handle_preview_tree(State(state): State<AppState>) -> Result<Json<VisualTree>, AppError> {
    let tree = state
        .session()
        .preview()
        .cloned()
        .ok_or(SessionError::NoDocument)?;
    Ok(Json(tree))
}

/// PUT /api/v1/preview/config
///
/// Partial update; omitted fields keep their value. Re-renders the preview.
pub async fn handle_update_config(
    State(state): State<AppState>,
    payload: Result<Json<RenderConfigPatch>, JsonRejection>,
) -> Result<Json<RenderConfig>, AppError> {
    let Json(patch) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let config = state.session().update_render_config(patch).clone();
    Ok(Json(config))
}

/// POST /api/v1/preview/theme/toggle
pub async fn handle_toggle_theme(State(state): State<AppState>) -> Json<RenderConfig> {
    let mut session = state.session();
    session.toggle_theme();
    Json(session.render_config().clone())
}
