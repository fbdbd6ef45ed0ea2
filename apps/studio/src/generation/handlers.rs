//! Axum route handlers for the Generation API.

use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::export::json::JSON_FILENAME;
use crate::generation::quality::QualityReport;
use crate::models::resume::ResumeDocument;
use crate::session::SessionError;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub resume: ResumeDocument,
    pub quality: Option<QualityReport>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/resumes/generate
///
/// One generation attempt from the session's current input text. Local
/// precondition failures only set the session error; anything that reaches
/// the service replaces the document, on success or failure.
pub async fn handle_generate(
    State(state): State<AppState>,
) -> Result<Json<GenerateResponse>, AppError> {
    let raw_text = state.session().raw_text().to_string();
    let prepared = match state.generator.prepare(&raw_text) {
        Ok(prepared) => prepared,
        Err(e) => {
            state.session().reject_request(&e);
            return Err(e.into());
        }
    };

    let ticket = state.session().begin_generation()?;
    info!("Generating resume from {} chars of input", raw_text.len());

    // detached: a dropped request must not leave the session loading
    let worker = state.clone();
    let handle = tokio::spawn(async move {
        let result = worker.generator.execute(prepared).await;
        let mut session = worker.session();
        session.finish_generation(ticket, result)
    });

    let outcome = match handle.await {
        Ok(outcome) => outcome?,
        Err(e) => {
            state.session().abort_generation(ticket, &e.to_string());
            return Err(AppError::Internal(anyhow::anyhow!(
                "generation worker failed: {e}"
            )));
        }
    };
    let document = outcome
        .ok_or_else(|| AppError::Busy("superseded by a newer generation".to_string()))?;

    Ok(Json(GenerateResponse {
        resume: (*document).clone(),
        quality: state.session().quality().cloned(),
    }))
}

/// GET /api/v1/resumes/current
pub async fn handle_get_current(
    State(state): State<AppState>,
) -> Result<Json<ResumeDocument>, AppError> {
    let document = state
        .session()
        .document()
        .ok_or(SessionError::NoDocument)?;
    Ok(Json((*document).clone()))
}

/// GET /api/v1/resumes/current/json
///
/// The generated JSON as text, for copying.
pub async fn handle_get_json(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let json = current_json(&state)?;
    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], json))
}

/// GET /api/v1/resumes/current/download
pub async fn handle_download_json(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let json = current_json(&state)?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{JSON_FILENAME}\""),
            ),
        ],
        json,
    ))
}

fn current_json(state: &AppState) -> Result<String, AppError> {
    state
        .session()
        .generated_json()
        .map(str::to_string)
        .ok_or_else(|| SessionError::NoDocument.into())
}
