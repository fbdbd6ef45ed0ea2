//! A TTF/OTF font used both to measure and to paint glyphs. DejaVu Sans is
//! compiled in; `RESUME_FONT_PATH` may point at another face.

use std::path::Path;
use std::sync::Arc;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use thiserror::Error;

use crate::layout::font_metrics::TextMeasure;

const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
pub const BUNDLED_FONT_NAME: &str = "DejaVu Sans (bundled)";

/// Extra advance per glyph when bold is synthesized by double striking.
const SYNTHETIC_BOLD_EM: f32 = 0.02;

#[derive(Debug, Error)]
pub enum FontError {
    #[error("failed to read font file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a usable TTF/OTF font")]
    Invalid { path: String },
}

#[derive(Clone)]
pub struct LoadedFont {
    font: FontArc,
    name: Arc<str>,
}

impl std::fmt::Debug for LoadedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFont").field("name", &self.name).finish()
    }
}

impl LoadedFont {
    pub fn load(path: &Path) -> Result<Self, FontError> {
        let display = path.display().to_string();
        let bytes = std::fs::read(path).map_err(|source| FontError::Io {
            path: display.clone(),
            source,
        })?;
        Self::from_bytes(bytes, &display)
    }

    pub fn from_bytes(bytes: Vec<u8>, name: &str) -> Result<Self, FontError> {
        let font = FontArc::try_from_vec(bytes).map_err(|_| FontError::Invalid {
            path: name.to_string(),
        })?;
        Ok(Self {
            font,
            name: Arc::from(name),
        })
    }

    pub fn bundled() -> Result<Self, FontError> {
        let font = FontArc::try_from_slice(BUNDLED_FONT).map_err(|_| FontError::Invalid {
            path: BUNDLED_FONT_NAME.to_string(),
        })?;
        Ok(Self {
            font,
            name: Arc::from(BUNDLED_FONT_NAME),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn font(&self) -> &FontArc {
        &self.font
    }

    /// Scale at which one em equals `size` px (CSS `font-size`).
    pub fn scale_for(&self, size: f32) -> PxScale {
        let units_per_em = self.font.units_per_em().unwrap_or(1000.0);
        PxScale::from(size * self.font.height_unscaled() / units_per_em)
    }

    pub fn bold_offset(size: f32) -> f32 {
        (size * SYNTHETIC_BOLD_EM).max(0.5)
    }
}

impl TextMeasure for LoadedFont {
    fn width(&self, text: &str, size: f32, bold: bool) -> f32 {
        let scaled = self.font.as_scaled(self.scale_for(size));
        let mut width = 0.0;
        let mut previous = None;
        let mut glyphs = 0usize;
        for c in text.chars() {
            let id = scaled.glyph_id(c);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
            glyphs += 1;
        }
        if bold {
            width += Self::bold_offset(size) * glyphs as f32;
        }
        width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_reports_path() {
        let err = LoadedFont::load(Path::new("/definitely/not/here.ttf")).unwrap_err();
        assert!(matches!(err, FontError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.ttf"));
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not a font at all").unwrap();
        let err = LoadedFont::load(file.path()).unwrap_err();
        assert!(matches!(err, FontError::Invalid { .. }));
    }

    #[test]
    fn test_bundled_font_loads() {
        let font = LoadedFont::bundled().unwrap();
        assert_eq!(font.name(), BUNDLED_FONT_NAME);
        assert!(font.font().glyph_id('R').0 != 0);
    }

    #[test]
    fn test_width_follows_glyph_advances() {
        let font = LoadedFont::bundled().unwrap();
        let narrow = font.width("iiii", 14.0, false);
        let wide = font.width("WWWW", 14.0, false);
        assert!(narrow > 0.0);
        assert!(wide > narrow * 2.0, "{wide} vs {narrow}");
        assert_eq!(font.width("", 14.0, false), 0.0);

        // one em scales linearly with the font size
        let small = font.width("Resume", 10.0, false);
        let large = font.width("Resume", 20.0, false);
        assert!((large / small - 2.0).abs() < 0.01, "{large} vs {small}");
    }

    #[test]
    fn test_bold_width_adds_strike_offset_per_glyph() {
        let font = LoadedFont::bundled().unwrap();
        let regular = font.width("Skills", 14.0, false);
        let bold = font.width("Skills", 14.0, true);
        let expected = regular + LoadedFont::bold_offset(14.0) * 6.0;
        assert!((bold - expected).abs() < 1e-3, "{bold} vs {expected}");
    }

    #[test]
    fn test_scale_maps_em_to_font_size() {
        let font = LoadedFont::bundled().unwrap();
        let scaled = font.font().as_scaled(font.scale_for(16.0));
        let em = scaled.height() * font.font().units_per_em().unwrap()
            / font.font().height_unscaled();
        assert!((em - 16.0).abs() < 1e-3, "{em}");
    }
}
