use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::export::pipeline::DEFAULT_RASTER_SCALE;
use crate::llm_client::DEFAULT_API_URL;

/// Application configuration loaded from environment variables.
/// Every variable is optional; a malformed numeric value fails startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub rust_log: String,
    /// Seeds the session store so the first generation needs no prompt.
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    /// Overrides the bundled export font.
    pub resume_font_path: Option<PathBuf>,
    pub export_raster_scale: f32,
    pub generation_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let export_raster_scale: f32 = parse_or(&var, "EXPORT_RASTER_SCALE", DEFAULT_RASTER_SCALE)?;
        if !(export_raster_scale.is_finite() && export_raster_scale > 0.0) {
            anyhow::bail!("EXPORT_RASTER_SCALE must be a positive number, got {export_raster_scale}");
        }

        Ok(Config {
            bind_addr: parse_or(&var, "BIND_ADDR", IpAddr::from([127, 0, 0, 1]))?,
            port: parse_or(&var, "PORT", 8080)?,
            rust_log: var("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            gemini_api_key: var("GEMINI_API_KEY"),
            gemini_api_url: var("GEMINI_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            resume_font_path: var("RESUME_FONT_PATH").map(PathBuf::from),
            export_raster_scale,
            generation_timeout: Duration::from_secs(parse_or(&var, "GENERATION_TIMEOUT_SECS", 120)?),
        })
    }
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
