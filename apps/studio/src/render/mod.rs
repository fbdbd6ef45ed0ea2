// Live preview rendering.
// renderer builds a backend-neutral visual tree from a document and RenderConfig;
// html serializes that tree for the browser, layout (elsewhere) positions it for export.

pub mod color;
pub mod handlers;
pub mod html;
pub mod renderer;
pub mod theme;
pub mod tree;
