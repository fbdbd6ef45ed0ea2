//! Single-page PDF composition around one raster image.
//!
//! File layout: header, catalog, page tree, page, image XObject, content
//! stream, info dictionary, cross-reference table, trailer.

use std::io::Write;

use chrono::{DateTime, Utc};
use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::RgbaImage;
use thiserror::Error;

use crate::export::page::{mm_to_pt, PageSize, Placement};

const PDF_VERSION: &str = "1.4";
const PRODUCER: &str = "studio";

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

/// Tracks byte offsets of indirect objects as they are appended.
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<(u32, usize)>,
    next_obj_num: u32,
}

impl PdfWriter {
    fn new() -> Self {
        Self {
            buf: Vec::new(),
            offsets: Vec::new(),
            next_obj_num: 1,
        }
    }

    fn allocate(&mut self) -> u32 {
        let num = self.next_obj_num;
        self.next_obj_num += 1;
        num
    }

    fn write_header(&mut self) {
        self.buf
            .extend_from_slice(format!("%PDF-{PDF_VERSION}\n").as_bytes());
        // binary marker
        self.buf.extend_from_slice(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n']);
    }

    fn write_object(&mut self, num: u32, body: &str) {
        self.offsets.push((num, self.buf.len()));
        self.buf
            .extend_from_slice(format!("{num} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    /// Writes a Flate-compressed stream; `dict` holds entries other than
    /// Length and Filter.
    fn write_stream(&mut self, num: u32, dict: &str, data: &[u8]) -> Result<(), PdfError> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data)?;
        let compressed = encoder.finish()?;

        self.offsets.push((num, self.buf.len()));
        self.buf.extend_from_slice(
            format!(
                "{num} 0 obj\n<< {dict} /Length {} /Filter /FlateDecode >>\nstream\n",
                compressed.len()
            )
            .as_bytes(),
        );
        self.buf.extend_from_slice(&compressed);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
        Ok(())
    }

    fn finish(mut self, catalog: u32, info: u32) -> Vec<u8> {
        let xref_offset = self.buf.len();
        self.offsets.sort_by_key(|(num, _)| *num);

        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", self.next_obj_num);
        for (_, offset) in &self.offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        xref.push_str(&format!(
            "trailer\n<< /Size {} /Root {catalog} 0 R /Info {info} 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
            self.next_obj_num
        ));
        self.buf.extend_from_slice(xref.as_bytes());
        self.buf
    }
}

/// PDF date string, `D:YYYYMMDDHHmmSSZ`.
fn pdf_date(at: DateTime<Utc>) -> String {
    at.format("D:%Y%m%d%H%M%SZ").to_string()
}

/// Embeds `image` at `placement` on one page of `page` size.
///
/// Placement is in millimetres from the top-left corner; PDF user space has
/// its origin bottom-left, so the y offset is flipped.
pub fn compose_pdf(
    image: &RgbaImage,
    page: PageSize,
    placement: Placement,
    created: DateTime<Utc>,
) -> Result<Vec<u8>, PdfError> {
    let (img_w, img_h) = image.dimensions();
    if img_w == 0 || img_h == 0 {
        return Err(PdfError::InvalidDocument("raster is empty".to_string()));
    }

    let (page_w, page_h) = page.points();
    let w = mm_to_pt(placement.width_mm);
    let h = mm_to_pt(placement.height_mm);
    let x = mm_to_pt(placement.x_mm);
    let y = page_h - mm_to_pt(placement.y_mm + placement.height_mm);

    let rgb: Vec<u8> = image
        .pixels()
        .flat_map(|px| [px.0[0], px.0[1], px.0[2]])
        .collect();
    let content = format!("q\n{w:.3} 0 0 {h:.3} {x:.3} {y:.3} cm\n/Im1 Do\nQ\n");

    let mut pdf = PdfWriter::new();
    pdf.write_header();

    let catalog = pdf.allocate();
    let pages = pdf.allocate();
    let page_obj = pdf.allocate();
    let image_obj = pdf.allocate();
    let content_obj = pdf.allocate();
    let info = pdf.allocate();

    pdf.write_object(catalog, &format!("<< /Type /Catalog /Pages {pages} 0 R >>"));
    pdf.write_object(
        pages,
        &format!("<< /Type /Pages /Kids [{page_obj} 0 R] /Count 1 >>"),
    );
    pdf.write_object(
        page_obj,
        &format!(
            "<< /Type /Page /Parent {pages} 0 R /MediaBox [0 0 {page_w:.2} {page_h:.2}] \
             /Resources << /XObject << /Im1 {image_obj} 0 R >> >> /Contents {content_obj} 0 R >>"
        ),
    );
    pdf.write_stream(
        image_obj,
        &format!(
            "/Type /XObject /Subtype /Image /Width {img_w} /Height {img_h} \
             /ColorSpace /DeviceRGB /BitsPerComponent 8"
        ),
        &rgb,
    )?;
    pdf.write_stream(content_obj, "", content.as_bytes())?;
    pdf.write_object(
        info,
        &format!(
            "<< /Title (Resume) /Producer ({PRODUCER}) /CreationDate ({}) >>",
            pdf_date(created)
        ),
    );

    Ok(pdf.finish(catalog, info))
}
