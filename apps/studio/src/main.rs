mod config;
mod errors;
mod export;
mod generation;
mod layout;
mod llm_client;
mod models;
mod render;
mod routes;
mod schema;
mod session;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::export::raster::SoftwareRasterizer;
use crate::layout::Typesetter;
use crate::llm_client::GeminiClient;
use crate::routes::build_router;
use crate::session::store::MemorySessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed numeric values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume studio v{}", env!("CARGO_PKG_VERSION"));

    // Session-scoped credential store, optionally seeded from the environment
    let store = Arc::new(MemorySessionStore::with_credential(config.gemini_api_key.clone()));
    if config.gemini_api_key.is_some() {
        info!("Generation credential seeded from GEMINI_API_KEY");
    }

    // Initialize generation service client
    let service = Arc::new(GeminiClient::new(
        config.gemini_api_url.clone(),
        config.generation_timeout,
    )?);
    info!(
        "Generation client initialized (model: {}, url: {})",
        llm_client::MODEL,
        config.gemini_api_url
    );

    // Font for layout metrics and rasterized text; bundled face unless overridden
    let typesetter = Typesetter::from_path(config.resume_font_path.as_deref());
    let rasterizer = Arc::new(SoftwareRasterizer::new(typesetter.font().cloned()));
    info!("Export raster scale: {}x", config.export_raster_scale);

    // Build app state
    let state = AppState::new(&config, store, service, Arc::new(typesetter), rasterizer);

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::new(config.bind_addr, config.port);
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
