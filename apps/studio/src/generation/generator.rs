//! Resume Generation — one schema-constrained request per user action.
//!
//! Flow: validate input → read credential from the session store →
//!       fill instruction template → one service call → strip fences →
//!       parse → schema validation → ResumeDocument.
//!
//! Nothing is persisted here: not the credential, not the result.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::generation::prompts::{build_resume_prompt, PLACEHOLDER_TEXT};
use crate::llm_client::{strip_json_fences, ContentRequest, ContentService, LlmError, TEMPERATURE};
use crate::models::resume::ResumeDocument;
use crate::schema::{resume_schema, SchemaViolation};
use crate::session::store::SessionStore;

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Please enter your resume details before generating.")]
    EmptyInput,

    #[error("API key is not configured. Please provide a Gemini API key.")]
    MissingCredential,

    #[error("The API key was rejected: {0}")]
    InvalidCredential(String),

    #[error("Received an empty response from the API.")]
    EmptyResponse,

    #[error("The response was not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("The response does not match the resume schema: {0}")]
    SchemaViolation(#[from] SchemaViolation),

    #[error("{0}")]
    Service(#[source] LlmError),
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Unauthorized(message) => GenerationError::InvalidCredential(message),
            LlmError::EmptyContent => GenerationError::EmptyResponse,
            LlmError::Parse(e) => GenerationError::MalformedJson(e),
            other => GenerationError::Service(other),
        }
    }
}

impl GenerationError {
    /// Rejected before any network call was made.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            GenerationError::EmptyInput | GenerationError::MissingCredential
        )
    }

    /// The message shown in place of the document after a failed attempt.
    pub fn user_message(&self) -> String {
        match self {
            GenerationError::EmptyInput | GenerationError::MissingCredential => self.to_string(),
            other => format!(
                "Failed to generate resume. Please check your input and try again. Error: {other}"
            ),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// A request that passed every local precondition and is ready to send.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    api_key: String,
    request: ContentRequest,
}

/// Turns raw candidate notes into a validated [`ResumeDocument`].
#[derive(Clone)]
pub struct GenerationClient {
    store: Arc<dyn SessionStore>,
    service: Arc<dyn ContentService>,
}

impl GenerationClient {
    pub fn new(store: Arc<dyn SessionStore>, service: Arc<dyn ContentService>) -> Self {
        Self { store, service }
    }

    /// Local checks only: input present and edited, credential available.
    pub fn prepare(&self, raw_text: &str) -> Result<PreparedRequest, GenerationError> {
        let trimmed = raw_text.trim();
        if trimmed.is_empty() || trimmed == PLACEHOLDER_TEXT.trim() {
            return Err(GenerationError::EmptyInput);
        }

        let api_key = self
            .store
            .credential()
            .ok_or(GenerationError::MissingCredential)?;

        Ok(PreparedRequest {
            api_key,
            request: ContentRequest {
                prompt: build_resume_prompt(raw_text),
                response_schema: resume_schema().to_response_schema(),
                temperature: TEMPERATURE,
            },
        })
    }

    /// Sends a prepared request. Exactly one attempt.
    pub async fn execute(&self, prepared: PreparedRequest) -> Result<ResumeDocument, GenerationError> {
        debug!(
            "Sending generation request ({} prompt chars)",
            prepared.request.prompt.len()
        );
        let text = self
            .service
            .generate(&prepared.api_key, &prepared.request)
            .await?;
        let document = parse_response(&text)?;
        info!(
            "Generated resume for '{}': {} experience, {} education entries",
            document.personal_info.name,
            document.experience.len(),
            document.education.len()
        );
        Ok(document)
    }

    pub async fn generate(&self, raw_text: &str) -> Result<ResumeDocument, GenerationError> {
        let prepared = self.prepare(raw_text)?;
        self.execute(prepared).await
    }
}

/// Raw response text → validated document.
pub fn parse_response(text: &str) -> Result<ResumeDocument, GenerationError> {
    let text = strip_json_fences(text);
    if text.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(GenerationError::MalformedJson)?;
    resume_schema().validate(&value)?;
    serde_json::from_value(value).map_err(GenerationError::MalformedJson)
}
