// Off-screen layout of rendered resumes.
// Turns a visual tree into positioned boxes and text lines at a fixed width.
// CPU-bound work runs inside tokio::task::spawn_blocking.

pub mod flow;
pub mod font;
pub mod font_metrics;
pub mod surface;

use std::path::Path;

use tracing::{info, warn};

pub use flow::{layout_tree, DisplayItem, DisplayList, Rect};
pub use font::LoadedFont;
pub use font_metrics::{inter_metrics, TextMeasure};
pub use surface::{layout_offscreen, LayoutError, REFERENCE_WIDTH};

/// Measures with the loaded font when there is one, the Inter table otherwise.
/// `Typesetter::default()` has no font.
#[derive(Debug, Clone, Default)]
pub struct Typesetter {
    font: Option<LoadedFont>,
}

impl Typesetter {
    /// Loads the configured font, or the bundled face when none is configured
    /// or the file is unusable. Greeked text is the last resort.
    pub fn from_path(path: Option<&Path>) -> Self {
        let configured = path.and_then(|path| match LoadedFont::load(path) {
            Ok(font) => Some(font),
            Err(e) => {
                warn!("Resume font unusable, using the bundled face: {e}");
                None
            }
        });
        let font = match configured.map(Ok).unwrap_or_else(LoadedFont::bundled) {
            Ok(font) => {
                info!("Loaded resume font {}", font.name());
                Some(font)
            }
            Err(e) => {
                warn!("No resume font available, exported text will be greeked: {e}");
                None
            }
        };
        Self { font }
    }

    pub fn font(&self) -> Option<&LoadedFont> {
        self.font.as_ref()
    }
}

impl TextMeasure for Typesetter {
    fn width(&self, text: &str, size: f32, bold: bool) -> f32 {
        match &self.font {
            Some(font) => font.width(text, size, bold),
            None => inter_metrics().width(text, size, bold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font::BUNDLED_FONT_NAME;

    #[test]
    fn test_bundled_font_is_the_default() {
        let typesetter = Typesetter::from_path(None);
        assert_eq!(typesetter.font().map(LoadedFont::name), Some(BUNDLED_FONT_NAME));
    }

    #[test]
    fn test_unusable_path_falls_back_to_bundled_font() {
        let typesetter = Typesetter::from_path(Some(Path::new("/no/such/font.ttf")));
        assert_eq!(typesetter.font().map(LoadedFont::name), Some(BUNDLED_FONT_NAME));
    }

    #[test]
    fn test_measures_with_loaded_font() {
        let typesetter = Typesetter::from_path(None);
        let font = LoadedFont::bundled().unwrap();
        assert_eq!(
            typesetter.width("Jane Doe", 30.0, true),
            font.width("Jane Doe", 30.0, true)
        );
    }
}
