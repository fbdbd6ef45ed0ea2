//! Physical page sizes and fit-to-page placement, in millimetres.

use serde::Serialize;

use crate::models::options::{Orientation, PaperSize};

const MM_PER_INCH: f32 = 25.4;
const POINTS_PER_INCH: f32 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSize {
    pub width_mm: f32,
    pub height_mm: f32,
}

impl PageSize {
    pub fn aspect(&self) -> f32 {
        self.width_mm / self.height_mm
    }

    /// (width, height) in PDF user-space points.
    pub fn points(&self) -> (f32, f32) {
        (mm_to_pt(self.width_mm), mm_to_pt(self.height_mm))
    }
}

pub fn mm_to_pt(mm: f32) -> f32 {
    mm / MM_PER_INCH * POINTS_PER_INCH
}

/// Portrait dimensions of each paper size.
pub fn paper_dimensions(paper: PaperSize) -> PageSize {
    let (width_mm, height_mm) = match paper {
        PaperSize::A4 => (210.0, 297.0),
        PaperSize::Letter => (215.9, 279.4),
        PaperSize::Legal => (215.9, 355.6),
    };
    PageSize {
        width_mm,
        height_mm,
    }
}

pub fn page_size(paper: PaperSize, orientation: Orientation) -> PageSize {
    let portrait = paper_dimensions(paper);
    match orientation {
        Orientation::Portrait => portrait,
        Orientation::Landscape => PageSize {
            width_mm: portrait.height_mm,
            height_mm: portrait.width_mm,
        },
    }
}

/// Where the raster lands on the page. Origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub x_mm: f32,
    pub y_mm: f32,
    pub width_mm: f32,
    pub height_mm: f32,
}

/// Uniformly scales an image of `image_w` x `image_h` px to fit inside the
/// page and centres it on both axes.
///
/// An image relatively wider than the page is limited by page width;
/// otherwise it is limited by page height.
pub fn fit_to_page(image_w: u32, image_h: u32, page: PageSize) -> Placement {
    let image_aspect = image_w.max(1) as f32 / image_h.max(1) as f32;

    let (width_mm, height_mm) = if image_aspect > page.aspect() {
        (page.width_mm, page.width_mm / image_aspect)
    } else {
        (page.height_mm * image_aspect, page.height_mm)
    };

    Placement {
        x_mm: (page.width_mm - width_mm) / 2.0,
        y_mm: (page.height_mm - height_mm) / 2.0,
        width_mm,
        height_mm,
    }
}
