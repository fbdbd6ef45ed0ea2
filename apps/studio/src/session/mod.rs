// Per-process editing session: input text, current document, presentation settings.
// Every mutation of the document or render settings re-derives the preview tree
// exactly once. Generation and export are mutually exclusive.

pub mod handlers;
pub mod store;

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::export::json::to_pretty_json;
use crate::export::pipeline::{ExportJob, ExportPhase};
use crate::generation::generator::GenerationError;
use crate::generation::prompts::PLACEHOLDER_TEXT;
use crate::generation::quality::{assess, QualityReport};
use crate::models::options::{ExportConfig, RenderConfig, RenderConfigPatch, Theme};
use crate::models::resume::ResumeDocument;
use crate::render::renderer::render;
use crate::render::tree::VisualTree;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("A resume is being generated. Try again when it finishes.")]
    GenerationInFlight,

    #[error("A PDF export is in progress. Try again when it finishes.")]
    ExportInFlight,

    #[error("No resume has been generated yet.")]
    NoDocument,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Identifies one generation attempt. Completions carrying an outdated ticket
/// are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket(u64);

#[derive(Debug)]
pub struct Session {
    raw_text: String,
    document: Option<Arc<ResumeDocument>>,
    generated_json: Option<String>,
    status: GenerationStatus,
    error: Option<String>,
    credential_prompt: bool,
    render_config: RenderConfig,
    export_config: ExportConfig,
    exporting: bool,
    epoch: u64,
    preview: Option<VisualTree>,
    quality: Option<QualityReport>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            raw_text: PLACEHOLDER_TEXT.to_string(),
            document: None,
            generated_json: None,
            status: GenerationStatus::Idle,
            error: None,
            credential_prompt: false,
            render_config: RenderConfig::default(),
            export_config: ExportConfig::default(),
            exporting: false,
            epoch: 0,
            preview: None,
            quality: None,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Input ──────────────────────────────────────────────────────────────

    pub fn raw_text(&self) -> &str {
        &self.raw_text
    }

    pub fn set_raw_text(&mut self, text: String) {
        self.raw_text = text;
    }

    // ── Generation ─────────────────────────────────────────────────────────

    /// Records a request refused before any network call. Nothing else changes.
    pub fn reject_request(&mut self, err: &GenerationError) {
        if matches!(err, GenerationError::MissingCredential) {
            self.credential_prompt = true;
        }
        self.error = Some(err.user_message());
    }

    /// Starts an attempt: clears the previous document, JSON and error so
    /// nothing stale is shown while loading.
    pub fn begin_generation(&mut self) -> Result<GenerationTicket, SessionError> {
        if self.status == GenerationStatus::Loading {
            return Err(SessionError::GenerationInFlight);
        }
        if self.exporting {
            return Err(SessionError::ExportInFlight);
        }

        self.epoch += 1;
        self.status = GenerationStatus::Loading;
        self.document = None;
        self.generated_json = None;
        self.quality = None;
        self.error = None;
        self.rerender();
        Ok(GenerationTicket(self.epoch))
    }

    fn is_current(&self, ticket: GenerationTicket) -> bool {
        self.status == GenerationStatus::Loading && ticket.0 == self.epoch
    }

    /// Applies the outcome of the attempt `ticket` identifies. `Ok(None)` means
    /// the ticket was stale and the session was left untouched.
    pub fn finish_generation(
        &mut self,
        ticket: GenerationTicket,
        result: Result<ResumeDocument, GenerationError>,
    ) -> Result<Option<Arc<ResumeDocument>>, GenerationError> {
        if !self.is_current(ticket) {
            debug!("Dropping result of superseded generation #{}", ticket.0);
            return result.map(|_| None);
        }

        match result {
            Ok(document) => {
                let quality = assess(&document);
                if !quality.passed {
                    warn!(
                        "Generated resume has {} quality findings",
                        quality.findings.len()
                    );
                }
                // serializing plain strings and vectors cannot fail
                self.generated_json = to_pretty_json(&document).ok();
                let document = Arc::new(document);
                self.document = Some(document.clone());
                self.quality = Some(quality);
                self.status = GenerationStatus::Ready;
                self.error = None;
                self.credential_prompt = false;
                self.rerender();
                Ok(Some(document))
            }
            Err(err) => {
                self.fail(err.user_message());
                if matches!(err, GenerationError::InvalidCredential(_)) {
                    self.credential_prompt = true;
                }
                Err(err)
            }
        }
    }

    /// Ends an attempt whose worker died without reporting a result.
    pub fn abort_generation(&mut self, ticket: GenerationTicket, cause: &str) {
        if self.is_current(ticket) {
            self.fail(format!(
                "Failed to generate resume. Please check your input and try again. Error: {cause}"
            ));
        }
    }

    fn fail(&mut self, message: String) {
        self.status = GenerationStatus::Failed;
        self.document = None;
        self.generated_json = None;
        self.quality = None;
        self.error = Some(message);
        self.rerender();
    }

    pub fn credential_saved(&mut self) {
        self.credential_prompt = false;
    }

    // ── Presentation ───────────────────────────────────────────────────────

    fn rerender(&mut self) {
        self.preview = self
            .document
            .as_deref()
            .map(|doc| render(doc, &self.render_config));
    }

    pub fn update_render_config(&mut self, patch: RenderConfigPatch) -> &RenderConfig {
        self.render_config.apply(patch);
        self.rerender();
        &self.render_config
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.render_config.theme = self.render_config.theme.toggled();
        self.rerender();
        self.render_config.theme
    }

    // ── Export ─────────────────────────────────────────────────────────────

    pub fn set_export_config(&mut self, config: ExportConfig) -> Result<(), SessionError> {
        if self.exporting {
            return Err(SessionError::ExportInFlight);
        }
        self.export_config = config;
        Ok(())
    }

    /// Claims the export slot and snapshots what the run needs. The accent
    /// comes from the live preview settings.
    pub fn begin_export(&mut self) -> Result<ExportJob, SessionError> {
        if self.status == GenerationStatus::Loading {
            return Err(SessionError::GenerationInFlight);
        }
        if self.exporting {
            return Err(SessionError::ExportInFlight);
        }
        let document = self.document.clone().ok_or(SessionError::NoDocument)?;

        self.exporting = true;
        info!(
            "Starting PDF export ({:?}, {:?})",
            self.export_config.paper_size, self.export_config.orientation
        );
        Ok(ExportJob {
            document,
            config: self.export_config,
            accent: self.render_config.accent_color,
        })
    }

    pub fn finish_export(&mut self) {
        self.exporting = false;
    }

    // ── Accessors ──────────────────────────────────────────────────────────

    pub fn document(&self) -> Option<Arc<ResumeDocument>> {
        self.document.clone()
    }

    pub fn generated_json(&self) -> Option<&str> {
        self.generated_json.as_deref()
    }

    pub fn preview(&self) -> Option<&VisualTree> {
        self.preview.as_ref()
    }

    pub fn quality(&self) -> Option<&QualityReport> {
        self.quality.as_ref()
    }

    pub fn status(&self) -> GenerationStatus {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn render_config(&self) -> &RenderConfig {
        &self.render_config
    }

    pub fn export_config(&self) -> ExportConfig {
        self.export_config
    }

    pub fn snapshot(&self, credential_present: bool, export_phase: ExportPhase) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            error: self.error.clone(),
            has_document: self.document.is_some(),
            credential_present,
            credential_prompt: self.credential_prompt,
            render_config: self.render_config.clone(),
            export_config: self.export_config,
            exporting: self.exporting,
            export_phase,
            quality: self.quality.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub status: GenerationStatus,
    pub error: Option<String>,
    pub has_document: bool,
    pub credential_present: bool,
    pub credential_prompt: bool,
    pub render_config: RenderConfig,
    pub export_config: ExportConfig,
    pub exporting: bool,
    pub export_phase: ExportPhase,
    pub quality: Option<QualityReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::models::options::{IncludedSections, Section};
    use crate::models::resume::fixtures::jane_doe;
    use crate::render::tree::Role;

    fn ready_session() -> Session {
        let mut session = Session::new();
        let ticket = session.begin_generation().unwrap();
        session.finish_generation(ticket, Ok(jane_doe())).unwrap();
        session
    }

    #[test]
    fn test_starts_with_placeholder_and_no_document() {
        let session = Session::new();
        assert_eq!(session.raw_text(), PLACEHOLDER_TEXT);
        assert!(session.document().is_none());
        assert!(session.preview().is_none());
        assert_eq!(session.status(), GenerationStatus::Idle);
    }

    #[test]
    fn test_success_sets_document_json_and_preview() {
        let session = ready_session();
        assert_eq!(session.status(), GenerationStatus::Ready);
        assert_eq!(session.document().as_deref(), Some(&jane_doe()));
        assert!(session.generated_json().unwrap().contains("\"personalInfo\""));
        assert!(session.preview().is_some());
        assert!(session.error().is_none());
    }

    #[test]
    fn test_begin_clears_previous_result() {
        let mut session = ready_session();
        session.begin_generation().unwrap();
        assert_eq!(session.status(), GenerationStatus::Loading);
        assert!(session.document().is_none());
        assert!(session.generated_json().is_none());
        assert!(session.preview().is_none());
    }

    #[test]
    fn test_failure_clears_document_and_sets_message() {
        let mut session = ready_session();
        let ticket = session.begin_generation().unwrap();
        let err = session
            .finish_generation(ticket, Err(GenerationError::EmptyResponse))
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse));
        assert_eq!(session.status(), GenerationStatus::Failed);
        assert!(session.document().is_none());
        assert!(session
            .error()
            .unwrap()
            .starts_with("Failed to generate resume. Please check your input and try again. Error: "));
    }

    #[test]
    fn test_invalid_credential_prompts_again() {
        let mut session = Session::new();
        let ticket = session.begin_generation().unwrap();
        let rejected = GenerationError::from(LlmError::Unauthorized("API key not valid".into()));
        let _ = session.finish_generation(ticket, Err(rejected));

        let snapshot = session.snapshot(true, ExportPhase::Idle);
        assert!(snapshot.credential_prompt);

        session.credential_saved();
        assert!(!session.snapshot(true, ExportPhase::Idle).credential_prompt);
    }

    #[test]
    fn test_rejected_input_only_sets_message() {
        let mut session = ready_session();
        session.reject_request(&GenerationError::EmptyInput);
        assert_eq!(session.status(), GenerationStatus::Ready);
        assert!(session.document().is_some());
        assert_eq!(
            session.error(),
            Some("Please enter your resume details before generating.")
        );
    }

    #[test]
    fn test_stale_ticket_does_not_clobber_newer_attempt() {
        let mut session = Session::new();
        let first = session.begin_generation().unwrap();
        let _ = session.finish_generation(first, Err(GenerationError::EmptyResponse));

        let second = session.begin_generation().unwrap();
        // late duplicate completion of the first attempt
        let outcome = session.finish_generation(first, Ok(jane_doe())).unwrap();
        assert!(outcome.is_none());
        assert_eq!(session.status(), GenerationStatus::Loading);
        assert!(session.document().is_none());

        let outcome = session.finish_generation(second, Ok(jane_doe())).unwrap();
        assert!(outcome.is_some());
        assert_eq!(session.status(), GenerationStatus::Ready);
    }

    #[test]
    fn test_generation_and_export_are_exclusive() {
        let mut session = ready_session();
        session.begin_export().unwrap();
        assert_eq!(session.begin_generation(), Err(SessionError::ExportInFlight));
        assert_eq!(
            session.begin_export().unwrap_err(),
            SessionError::ExportInFlight
        );
        assert_eq!(
            session.set_export_config(ExportConfig::default()),
            Err(SessionError::ExportInFlight)
        );
        session.finish_export();

        session.begin_generation().unwrap();
        assert_eq!(
            session.begin_export().unwrap_err(),
            SessionError::GenerationInFlight
        );
        assert_eq!(session.begin_generation(), Err(SessionError::GenerationInFlight));
    }

    #[test]
    fn test_export_requires_document_and_uses_live_accent() {
        let mut session = Session::new();
        assert_eq!(session.begin_export().unwrap_err(), SessionError::NoDocument);

        let mut session = ready_session();
        session.update_render_config(RenderConfigPatch {
            accent_color: Some("#2563EB".parse().unwrap()),
            ..RenderConfigPatch::default()
        });
        let job = session.begin_export().unwrap();
        assert_eq!(job.accent.to_string().to_uppercase(), "#2563EB");
        assert_eq!(job.config, ExportConfig::default());
    }

    #[test]
    fn test_theme_toggle_rerenders_preview() {
        let mut session = ready_session();
        let light = session.preview().unwrap().background();

        assert_eq!(session.toggle_theme(), Theme::Dark);
        let dark = session.preview().unwrap();
        assert_eq!(dark.theme, Theme::Dark);
        assert_ne!(dark.background(), light);
        // document untouched
        assert_eq!(session.document().as_deref(), Some(&jane_doe()));
    }

    #[test]
    fn test_hiding_sections_rerenders_preview() {
        let mut session = ready_session();
        assert!(session.preview().unwrap().has_role(Role::Section(Section::Skills)));

        session.update_render_config(RenderConfigPatch {
            included_sections: Some(IncludedSections {
                skills: false,
                ..Default::default()
            }),
            ..RenderConfigPatch::default()
        });
        assert!(!session.preview().unwrap().has_role(Role::Section(Section::Skills)));
    }
}
