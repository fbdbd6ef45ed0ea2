use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::config::Config;
use crate::export::pipeline::ExportPipeline;
use crate::export::raster::Rasterizer;
use crate::generation::generator::GenerationClient;
use crate::layout::Typesetter;
use crate::llm_client::ContentService;
use crate::session::store::SessionStore;
use crate::session::Session;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
    /// Credential storage, shared with the generation client.
    pub store: Arc<dyn SessionStore>,
    pub generator: GenerationClient,
    pub exporter: Arc<ExportPipeline>,
}

impl AppState {
    pub fn new(
        config: &Config,
        store: Arc<dyn SessionStore>,
        service: Arc<dyn ContentService>,
        typesetter: Arc<Typesetter>,
        rasterizer: Arc<dyn Rasterizer>,
    ) -> Self {
        let exporter = ExportPipeline::new(typesetter, rasterizer, config.export_raster_scale);
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            generator: GenerationClient::new(store.clone(), service),
            store,
            exporter: Arc::new(exporter),
        }
    }

    /// Locks the session. Never hold the guard across an `.await`.
    pub fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
