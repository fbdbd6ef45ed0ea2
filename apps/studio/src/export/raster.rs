//! Rasterization of a laid-out page into an RGBA image.

use ab_glyph::{point, Font, ScaleFont};
use image::{Rgba, RgbaImage};
use thiserror::Error;
use tracing::warn;

use crate::layout::{inter_metrics, DisplayItem, DisplayList, LoadedFont, Rect, TextMeasure};
use crate::render::color::Color;
use crate::render::tree::Weight;

/// Upper bound on raster size; an oversampled page beyond this is refused.
pub const MAX_TOTAL_PIXELS: u64 = 32_000_000;
pub const MAX_DIMENSION: u32 = 16_000;

/// Synthetic italic shear, as a fraction of height above the baseline.
const ITALIC_SHEAR: f32 = 0.2;
/// Greeked bars cover this fraction of the font size.
const GREEK_BAR_EM: f32 = 0.5;
const GREEK_ALPHA: f32 = 0.45;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("raster of {width}x{height} px exceeds the limit of {MAX_DIMENSION} px per side or {MAX_TOTAL_PIXELS} px total")]
    TooLarge { width: u32, height: u32 },

    #[error("invalid oversampling factor {0}")]
    InvalidScale(f32),
}

/// Turns a display list into pixels at `scale` device pixels per CSS pixel.
pub trait Rasterizer: Send + Sync {
    fn rasterize(&self, list: &DisplayList, scale: f32) -> Result<RgbaImage, RasterError>;
}

/// CPU rasterizer: boxes via `image`, glyphs via `ab_glyph`. Without a font
/// (only when even the bundled face failed to load) text is painted as
/// greeked bars.
#[derive(Debug, Clone, Default)]
pub struct SoftwareRasterizer {
    font: Option<LoadedFont>,
}

impl SoftwareRasterizer {
    pub fn new(font: Option<LoadedFont>) -> Self {
        Self { font }
    }
}

impl Rasterizer for SoftwareRasterizer {
    fn rasterize(&self, list: &DisplayList, scale: f32) -> Result<RgbaImage, RasterError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(RasterError::InvalidScale(scale));
        }
        let width = (list.width * scale).ceil().max(1.0) as u32;
        let height = (list.height * scale).ceil().max(1.0) as u32;
        if width > MAX_DIMENSION
            || height > MAX_DIMENSION
            || u64::from(width) * u64::from(height) > MAX_TOTAL_PIXELS
        {
            return Err(RasterError::TooLarge { width, height });
        }

        let bg = list.background;
        let mut canvas = Canvas {
            image: RgbaImage::from_pixel(width, height, Rgba([bg.r, bg.g, bg.b, 255])),
        };

        if self.font.is_none() {
            warn!("No resume font loaded; painting greeked text");
        }

        for item in &list.items {
            match item {
                DisplayItem::Fill {
                    rect,
                    color,
                    radius,
                } => canvas.fill(scaled(rect, scale), *color, radius * scale),
                DisplayItem::Text {
                    rect,
                    text,
                    size,
                    weight,
                    italic,
                    color,
                } => {
                    let line = TextLine {
                        rect: scaled(rect, scale),
                        text,
                        size: size * scale,
                        weight: *weight,
                        italic: *italic,
                        color: *color,
                    };
                    match &self.font {
                        Some(font) => canvas.glyphs(font, &line),
                        None => canvas.greeked(&line),
                    }
                }
            }
        }
        Ok(canvas.image)
    }
}

fn scaled(rect: &Rect, scale: f32) -> Rect {
    Rect {
        x: rect.x * scale,
        y: rect.y * scale,
        w: rect.w * scale,
        h: rect.h * scale,
    }
}

struct TextLine<'a> {
    rect: Rect,
    text: &'a str,
    size: f32,
    weight: Weight,
    italic: bool,
    color: Color,
}

struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    /// Source-over blend of `color` at `coverage` onto one pixel.
    fn blend(&mut self, x: i64, y: i64, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x >= i64::from(self.image.width()) || y >= i64::from(self.image.height()) {
            return;
        }
        let alpha = (color.a * coverage).clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let px = self.image.get_pixel_mut(x as u32, y as u32);
        let mix = |src: u8, dst: u8| -> u8 {
            (f32::from(src) * alpha + f32::from(dst) * (1.0 - alpha)).round() as u8
        };
        *px = Rgba([
            mix(color.r, px.0[0]),
            mix(color.g, px.0[1]),
            mix(color.b, px.0[2]),
            255,
        ]);
    }

    fn fill(&mut self, rect: Rect, color: Color, radius: f32) {
        let x0 = rect.x.floor().max(0.0) as i64;
        let y0 = rect.y.floor().max(0.0) as i64;
        let x1 = (rect.x + rect.w).ceil() as i64;
        let y1 = (rect.y + rect.h).ceil() as i64;
        let radius = radius.min(rect.w / 2.0).min(rect.h / 2.0).max(0.0);

        for y in y0..y1 {
            for x in x0..x1 {
                let cx = x as f32 + 0.5;
                let cy = y as f32 + 0.5;
                let mut coverage = overlap(cx, rect.x, rect.x + rect.w) * overlap(cy, rect.y, rect.y + rect.h);
                if radius > 0.0 {
                    coverage *= corner_coverage(cx, cy, &rect, radius);
                }
                if coverage > 0.0 {
                    self.blend(x, y, color, coverage);
                }
            }
        }
    }

    fn glyphs(&mut self, font: &LoadedFont, line: &TextLine<'_>) {
        let scale = font.scale_for(line.size);
        let scaled_font = font.font().as_scaled(scale);
        let ascent = scaled_font.ascent();
        let descent = scaled_font.descent();
        let baseline = line.rect.y + (line.rect.h - (ascent - descent)) / 2.0 + ascent;

        let bold_offset = LoadedFont::bold_offset(line.size);
        let strikes: &[f32] = if line.weight.is_bold() {
            &[0.0, bold_offset]
        } else {
            &[0.0]
        };

        let mut caret = line.rect.x;
        let mut previous = None;
        for c in line.text.chars() {
            let id = scaled_font.glyph_id(c);
            if let Some(prev) = previous {
                caret += scaled_font.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(scale, point(caret, baseline));
            caret += scaled_font.h_advance(id);
            if line.weight.is_bold() {
                caret += bold_offset;
            }
            previous = Some(id);

            let Some(outlined) = font.font().outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px = bounds.min.x + gx as f32;
                let py = bounds.min.y + gy as f32;
                let shear = if line.italic {
                    (baseline - py) * ITALIC_SHEAR
                } else {
                    0.0
                };
                for dx in strikes {
                    self.blend(
                        (px + shear + dx).round() as i64,
                        py.round() as i64,
                        line.color,
                        coverage,
                    );
                }
            });
        }
    }

    /// One bar per word where the glyphs would be.
    fn greeked(&mut self, line: &TextLine<'_>) {
        let metrics = inter_metrics();
        let bold = line.weight.is_bold();
        let space = metrics.width(" ", line.size, bold);
        let bar_h = line.size * GREEK_BAR_EM;
        let bar_y = line.rect.y + (line.rect.h - bar_h) / 2.0;
        let color = Color {
            a: line.color.a * GREEK_ALPHA,
            ..line.color
        };

        let mut x = line.rect.x;
        for word in line.text.split_whitespace() {
            let w = metrics.width(word, line.size, bold);
            self.fill(
                Rect {
                    x,
                    y: bar_y,
                    w,
                    h: bar_h,
                },
                color,
                bar_h / 4.0,
            );
            x += w + space;
        }
    }
}

/// Fraction of the unit pixel centred at `c` that lies inside [lo, hi].
fn overlap(c: f32, lo: f32, hi: f32) -> f32 {
    ((c + 0.5).min(hi) - (c - 0.5).max(lo)).clamp(0.0, 1.0)
}

fn corner_coverage(cx: f32, cy: f32, rect: &Rect, radius: f32) -> f32 {
    let nearest_x = cx.clamp(rect.x + radius, rect.x + rect.w - radius);
    let nearest_y = cy.clamp(rect.y + radius, rect.y + rect.h - radius);
    let distance = ((cx - nearest_x).powi(2) + (cy - nearest_y).powi(2)).sqrt();
    (radius - distance + 0.5).clamp(0.0, 1.0)
}
