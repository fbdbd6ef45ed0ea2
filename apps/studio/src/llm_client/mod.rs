/// LLM Client — the single point of entry for calls to the generation service.
///
/// No other module talks to the service directly. Exactly one request per call:
/// no retries, no streaming, no caching.
///
/// Model: gemini-2.5-flash (hardcoded to keep output shape stable)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";
/// The model used for every generation call.
pub const MODEL: &str = "gemini-2.5-flash";
/// Low randomness keeps structured output close to deterministic.
pub const TEMPERATURE: f32 = 0.2;
const RESPONSE_MIME_TYPE: &str = "application/json";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The service rejected the credential itself.
    #[error("API key rejected: {0}")]
    Unauthorized(String),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Received an empty response from the API.")]
    EmptyContent,
}

/// One schema-constrained generation request.
#[derive(Debug, Clone)]
pub struct ContentRequest {
    pub prompt: String,
    pub response_schema: Value,
    pub temperature: f32,
}

/// Anything that turns a prompt plus response schema into raw response text.
#[async_trait]
pub trait ContentService: Send + Sync {
    async fn generate(&self, api_key: &str, request: &ContentRequest) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts.
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    error: ServiceErrorBody,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    details: Vec<ServiceErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ServiceErrorDetail {
    reason: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{MODEL}:generateContent", self.base_url)
    }
}

#[async_trait]
impl ContentService for GeminiClient {
    async fn generate(&self, api_key: &str, request: &ContentRequest) -> Result<String, LlmError> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: RESPONSE_MIME_TYPE,
                response_schema: &request.response_schema,
                temperature: request.temperature,
            },
        };

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Generation service returned {}: {}", status, body);
            return Err(classify_failure(status, &body));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Generation call succeeded: prompt_tokens={}, candidate_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        let text = parsed.text();
        if text.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(text.trim().to_string())
    }
}

/// Maps a non-success response onto an error, separating credential
/// rejections from every other failure.
fn classify_failure(status: StatusCode, body: &str) -> LlmError {
    let parsed = serde_json::from_str::<ServiceError>(body).ok();
    let message = parsed
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.to_string());

    let key_rejected = parsed.as_ref().is_some_and(|e| {
        e.error
            .details
            .iter()
            .any(|d| d.reason.as_deref() == Some("API_KEY_INVALID"))
    }) || {
        let lower = message.to_lowercase();
        lower.contains("api key not valid") || lower.contains("invalid api key")
    };

    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        || (status == StatusCode::BAD_REQUEST && key_rejected)
    {
        LlmError::Unauthorized(message)
    } else {
        LlmError::Api {
            status: status.as_u16(),
            message,
        }
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from model output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use std::sync::{Arc, Mutex};

    type Responder = Box<dyn Fn() -> Result<String, LlmError> + Send + Sync>;

    /// Records each call and answers with a canned response.
    pub struct ScriptedService {
        calls: Mutex<Vec<(String, ContentRequest)>>,
        respond: Responder,
    }

    impl ScriptedService {
        pub fn new(
            respond: impl Fn() -> Result<String, LlmError> + Send + Sync + 'static,
        ) -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
                respond: Box::new(respond),
            })
        }

        /// Always answers with `text`.
        pub fn replying(text: String) -> Arc<Self> {
            Self::new(move || Ok(text.clone()))
        }

        pub fn calls(&self) -> Vec<(String, ContentRequest)> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ContentService for ScriptedService {
        async fn generate(&self, api_key: &str, request: &ContentRequest) -> Result<String, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((api_key.to_string(), request.clone()));
            (self.respond)()
        }
    }
}
