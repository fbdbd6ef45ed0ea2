//! Off-screen layout surface.
//!
//! Layout is CPU-bound, so it runs on the blocking pool. The caller waits on a
//! oneshot completion signal rather than the join handle: a surface that goes
//! away without signalling (panic, runtime shutdown) is reported as lost.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::oneshot;
use tracing::debug;

use crate::layout::flow::{layout_tree, DisplayList};
use crate::layout::font_metrics::TextMeasure;
use crate::render::tree::VisualTree;

/// Fixed reference width of the off-screen surface, in CSS px.
pub const REFERENCE_WIDTH: f32 = 800.0;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("off-screen surface was lost before layout completed")]
    SurfaceLost,
}

/// Lays `tree` out off-screen and resolves once the completion signal fires.
pub async fn layout_offscreen(
    tree: VisualTree,
    width: f32,
    measure: Arc<dyn TextMeasure>,
) -> Result<DisplayList, LayoutError> {
    let (done_tx, done_rx) = oneshot::channel();

    tokio::task::spawn_blocking(move || {
        let list = layout_tree(&tree, width, measure.as_ref());
        // receiver gone means the export was abandoned; nothing to report
        let _ = done_tx.send(list);
    });

    let list = done_rx.await.map_err(|_| LayoutError::SurfaceLost)?;
    debug!(
        "Off-screen layout complete: {}x{} px, {} items",
        list.width,
        list.height,
        list.items.len()
    );
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Typesetter;
    use crate::models::options::RenderConfig;
    use crate::models::resume::fixtures::jane_doe;
    use crate::render::renderer::render;

    struct Exploding;

    impl TextMeasure for Exploding {
        fn width(&self, _text: &str, _size: f32, _bold: bool) -> f32 {
            panic!("measurement backend crashed");
        }
    }

    fn tree() -> VisualTree {
        render(&jane_doe(), &RenderConfig::default())
    }

    #[tokio::test]
    async fn test_offscreen_layout_signals_completion() {
        let measure: Arc<dyn TextMeasure> = Arc::new(Typesetter::default());
        let list = layout_offscreen(tree(), REFERENCE_WIDTH, measure).await.unwrap();
        assert_eq!(list.width, REFERENCE_WIDTH);
        assert!(list.text_lines().any(|(_, t)| t == "Jane Doe"));
    }

    #[tokio::test]
    async fn test_crashed_surface_reports_lost() {
        let err = layout_offscreen(tree(), REFERENCE_WIDTH, Arc::new(Exploding))
            .await
            .unwrap_err();
        assert!(matches!(err, LayoutError::SurfaceLost));
    }
}
