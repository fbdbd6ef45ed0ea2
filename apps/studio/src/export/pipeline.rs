//! PDF export: off-screen render, layout, rasterize, fit to page, compose.
//!
//! Idle -> Configuring -> Rendering -> Capturing -> Composing -> Done | Failed -> Idle
//!
//! Progress is published on a watch channel. A failed run leaves no artifact
//! and returns to Idle, so the user can retry straight away.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::export::page::{fit_to_page, page_size};
use crate::export::pdf::{compose_pdf, PdfError};
use crate::export::raster::{RasterError, Rasterizer};
use crate::layout::{layout_offscreen, LayoutError, TextMeasure, Typesetter, REFERENCE_WIDTH};
use crate::models::options::ExportConfig;
use crate::models::resume::ResumeDocument;
use crate::render::color::AccentColor;
use crate::render::renderer::render;

pub const PDF_FILENAME: &str = "resume.pdf";
pub const DEFAULT_RASTER_SCALE: f32 = 3.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportPhase {
    #[default]
    Idle,
    Configuring,
    Rendering,
    Capturing,
    Composing,
    Done,
    Failed,
}

impl ExportPhase {
    pub fn can_transition_to(self, next: ExportPhase) -> bool {
        use ExportPhase::*;
        matches!(
            (self, next),
            (Idle | Configuring, Configuring)
                | (Idle | Configuring, Rendering)
                | (Rendering, Capturing)
                | (Capturing, Composing)
                | (Composing, Done)
                | (Rendering | Capturing | Composing, Failed)
                | (Done | Failed, Idle)
        )
    }
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error(transparent)]
    Layout(#[from] LayoutError),

    #[error("rasterization failed: {0}")]
    Raster(#[from] RasterError),

    #[error("PDF composition failed: {0}")]
    Pdf(#[from] PdfError),

    #[error("export worker failed: {0}")]
    Worker(String),

    #[error("cannot move export from {from:?} to {to:?}")]
    InvalidTransition { from: ExportPhase, to: ExportPhase },
}

#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub bytes: Vec<u8>,
    pub filename: &'static str,
}

/// Everything one export run needs, snapshotted when it starts.
#[derive(Debug, Clone)]
pub struct ExportJob {
    pub document: Arc<ResumeDocument>,
    pub config: ExportConfig,
    pub accent: AccentColor,
}

pub struct ExportPipeline {
    typesetter: Arc<Typesetter>,
    rasterizer: Arc<dyn Rasterizer>,
    scale: f32,
    phase: watch::Sender<ExportPhase>,
}

impl ExportPipeline {
    pub fn new(typesetter: Arc<Typesetter>, rasterizer: Arc<dyn Rasterizer>, scale: f32) -> Self {
        let (phase, _) = watch::channel(ExportPhase::Idle);
        Self {
            typesetter,
            rasterizer,
            scale,
            phase,
        }
    }

    pub fn phase(&self) -> ExportPhase {
        *self.phase.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ExportPhase> {
        self.phase.subscribe()
    }

    /// Marks that the user has (re)configured the next export.
    pub fn configure(&self) -> Result<(), ExportError> {
        self.advance(ExportPhase::Configuring)
    }

    fn advance(&self, next: ExportPhase) -> Result<(), ExportError> {
        let mut result = Ok(());
        self.phase.send_modify(|phase| {
            if phase.can_transition_to(next) {
                debug!("Export phase {:?} -> {:?}", phase, next);
                *phase = next;
            } else {
                result = Err(ExportError::InvalidTransition {
                    from: *phase,
                    to: next,
                });
            }
        });
        result
    }

    /// Runs one export to completion. Always ends back in Idle.
    pub async fn run(&self, job: ExportJob) -> Result<ExportArtifact, ExportError> {
        self.advance(ExportPhase::Rendering)?;

        match self.stages(job).await {
            Ok(bytes) => {
                self.advance(ExportPhase::Done)?;
                info!("Exported {} ({} bytes)", PDF_FILENAME, bytes.len());
                self.advance(ExportPhase::Idle)?;
                Ok(ExportArtifact {
                    bytes,
                    filename: PDF_FILENAME,
                })
            }
            Err(e) => {
                warn!("PDF export run failed: {e}");
                // best effort: the run is over either way
                let _ = self.advance(ExportPhase::Failed);
                self.phase.send_replace(ExportPhase::Idle);
                Err(e)
            }
        }
    }

    async fn stages(&self, job: ExportJob) -> Result<Vec<u8>, ExportError> {
        let render_config = job.config.render_config(job.accent);
        let tree = render(&job.document, &render_config);

        self.advance(ExportPhase::Capturing)?;
        let measure: Arc<dyn TextMeasure> = self.typesetter.clone();
        let list = layout_offscreen(tree, REFERENCE_WIDTH, measure).await?;

        let rasterizer = self.rasterizer.clone();
        let scale = self.scale;
        let image = tokio::task::spawn_blocking(move || rasterizer.rasterize(&list, scale))
            .await
            .map_err(|e| ExportError::Worker(e.to_string()))??;
        debug!("Captured {}x{} px raster", image.width(), image.height());

        self.advance(ExportPhase::Composing)?;
        let page = page_size(job.config.paper_size, job.config.orientation);
        let placement = fit_to_page(image.width(), image.height(), page);
        let created = Utc::now();
        let bytes = tokio::task::spawn_blocking(move || compose_pdf(&image, page, placement, created))
            .await
            .map_err(|e| ExportError::Worker(e.to_string()))??;
        Ok(bytes)
    }
}
