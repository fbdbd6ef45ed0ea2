// Export surfaces: the generated JSON and a single-page PDF.
// PDF export renders off-screen with ExportConfig, lays out at a fixed width,
// rasterizes with oversampling and fits the raster onto the chosen paper.

pub mod handlers;
pub mod json;
pub mod page;
pub mod pdf;
pub mod pipeline;
pub mod raster;
