use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::export::pipeline::ExportError;
use crate::generation::generator::GenerationError;
use crate::session::SessionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Busy: {0}")]
    Busy(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        let message = err.user_message();
        match err {
            GenerationError::EmptyInput => AppError::Validation(message),
            GenerationError::MissingCredential => AppError::Configuration(message),
            GenerationError::InvalidCredential(_) => AppError::InvalidCredential(message),
            _ => AppError::Generation(message),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NoDocument => AppError::NotFound(err.to_string()),
            SessionError::GenerationInFlight | SessionError::ExportInFlight => {
                AppError::Busy(err.to_string())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Configuration(msg) => {
                (StatusCode::BAD_REQUEST, "CONFIGURATION_ERROR", msg.clone())
            }
            AppError::InvalidCredential(msg) => {
                (StatusCode::UNAUTHORIZED, "CREDENTIAL_INVALID", msg.clone())
            }
            AppError::Generation(msg) => {
                tracing::error!("Generation error: {msg}");
                (StatusCode::BAD_GATEWAY, "GENERATION_ERROR", msg.clone())
            }
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_ERROR",
                    format!("Failed to export PDF: {e}"),
                )
            }
            AppError::Busy(msg) => (StatusCode::CONFLICT, "BUSY", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;

    #[test]
    fn test_generation_errors_map_to_taxonomy() {
        assert!(matches!(
            AppError::from(GenerationError::EmptyInput),
            AppError::Validation(_)
        ));
        assert!(matches!(
            AppError::from(GenerationError::MissingCredential),
            AppError::Configuration(_)
        ));
        assert!(matches!(
            AppError::from(GenerationError::from(LlmError::Unauthorized("bad key".into()))),
            AppError::InvalidCredential(_)
        ));

        let AppError::Generation(message) = AppError::from(GenerationError::EmptyResponse) else {
            panic!("expected a generation error");
        };
        assert_eq!(
            message,
            "Failed to generate resume. Please check your input and try again. \
             Error: Received an empty response from the API."
        );
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (AppError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AppError::Configuration("x".into()), StatusCode::BAD_REQUEST),
            (AppError::InvalidCredential("x".into()), StatusCode::UNAUTHORIZED),
            (AppError::Generation("x".into()), StatusCode::BAD_GATEWAY),
            (AppError::Busy("x".into()), StatusCode::CONFLICT),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
