//! Axum route handlers for export configuration and PDF export.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::errors::AppError;
use crate::models::options::ExportConfig;
use crate::state::AppState;

/// GET /api/v1/export/config
pub async fn handle_get_export_config(State(state): State<AppState>) -> Json<ExportConfig> {
    Json(state.session().export_config())
}

/// PUT /api/v1/export/config
///
/// Replaces the export settings. The live preview is unaffected.
pub async fn handle_set_export_config(
    State(state): State<AppState>,
    payload: Result<Json<ExportConfig>, JsonRejection>,
) -> Result<Json<ExportConfig>, AppError> {
    let Json(config) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    state.session().set_export_config(config)?;
    state.exporter.configure()?;
    Ok(Json(config))
}

/// POST /api/v1/export/pdf
///
/// Runs the export pipeline for the current document and returns `resume.pdf`.
pub async fn handle_export_pdf(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let job = state.session().begin_export()?;

    // detached so the export slot is always released
    let worker = state.clone();
    let handle = tokio::spawn(async move {
        let result = worker.exporter.run(job).await;
        worker.session().finish_export();
        result
    });

    let artifact = match handle.await {
        Ok(result) => result?,
        Err(e) => {
            state.session().finish_export();
            return Err(AppError::Internal(anyhow::anyhow!("export worker failed: {e}")));
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.filename),
            ),
        ],
        artifact.bytes,
    ))
}
