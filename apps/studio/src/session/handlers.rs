use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::session::store::CREDENTIAL_KEY;
use crate::session::SessionSnapshot;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRequest {
    pub api_key: String,
}

#[derive(Deserialize, Serialize)]
pub struct InputText {
    pub text: String,
}

/// GET /api/v1/session
pub async fn handle_get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let credential_present = state.store.credential().is_some();
    let export_phase = state.exporter.phase();
    Json(state.session().snapshot(credential_present, export_phase))
}

/// PUT /api/v1/session/credential
///
/// Kept for this process only; never written to disk.
pub async fn handle_set_credential(
    State(state): State<AppState>,
    Json(req): Json<CredentialRequest>,
) -> Result<StatusCode, AppError> {
    let key = req.api_key.trim();
    if key.is_empty() {
        return Err(AppError::Validation("API key cannot be empty".to_string()));
    }
    state.store.set(CREDENTIAL_KEY, key.to_string());
    state.session().credential_saved();
    info!("Generation credential stored for this session");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/v1/session/credential
pub async fn handle_clear_credential(State(state): State<AppState>) -> StatusCode {
    state.store.remove(CREDENTIAL_KEY);
    StatusCode::NO_CONTENT
}

/// GET /api/v1/session/input
pub async fn handle_get_input(State(state): State<AppState>) -> Json<InputText> {
    Json(InputText {
        text: state.session().raw_text().to_string(),
    })
}

/// PUT /api/v1/session/input
pub async fn handle_set_input(
    State(state): State<AppState>,
    Json(req): Json<InputText>,
) -> StatusCode {
    state.session().set_raw_text(req.text);
    StatusCode::NO_CONTENT
}
