//! # hocrpdf
//!
//! Combine a scanned page image and its hOCR into a searchable PDF.
//!
//! The page image is drawn over the full page and each recognized word is
//! written on top of it as invisible text, stretched to the word's box, so
//! the PDF can be searched and its text selected where the words appear.
//!
//! ## Quick Start
//!
//! ```no_run
//! fn main() -> hocrpdf::Result<()> {
//!     let report = hocrpdf::convert_files("page.png", "page.hocr", "page.pdf")?;
//!     for warning in &report.warnings {
//!         eprintln!("warning: {}", warning);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Page geometry
//!
//! - Page size comes from the image DPI, else from the hOCR `ocr_page` box
//!   at 300 DPI, else from the image at 96 DPI.
//! - OCR resolution is the `ocr_page` box size over the page size, so an
//!   OCR pass at a different resolution than the image still lines up.
//! - Every fallback is reported as a [`Warning`], never silently applied.

pub mod convert;
pub mod detect;
pub mod error;
pub mod geometry;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use convert::{convert_page, inspect_page, ConvertOptions, ConvertReport, HocrCombiner};
pub use detect::{detect_container_from_bytes, ImageContainer};
pub use error::{Error, InputKind, Result, Warning};
pub use geometry::{map_bbox, PageSizeSource, ResolutionPolicy, Resolver};
pub use model::{BBox, MappedBox, OcrDocument, OcrElement, PageImage, ResolvedGeometry};
pub use parser::{load_hocr_file, load_page_image, parse_hocr};
pub use render::{OverlayOptions, PdfOptions, SealedDocument, StandardFont, Timestamp};

use std::path::Path;

/// Convert an image and its hOCR into a PDF at `output` with default options.
///
/// # Example
///
/// ```no_run
/// let report = hocrpdf::convert_files("scan.jpg", "scan.hocr", "scan.pdf").unwrap();
/// println!("{} of {} words placed", report.placed, report.selected);
/// ```
pub fn convert_files<I, H, O>(image: I, hocr: H, output: O) -> Result<ConvertReport>
where
    I: AsRef<Path>,
    H: AsRef<Path>,
    O: AsRef<Path>,
{
    convert_files_with_options(image, hocr, output, ConvertOptions::default())
}

/// Convert an image and its hOCR into a PDF at `output`.
///
/// # Example
///
/// ```no_run
/// use hocrpdf::{convert_files_with_options, ConvertOptions, OverlayOptions};
///
/// let options = ConvertOptions::new()
///     .with_overlay(OverlayOptions::new().with_line_classes(["ocr_line"]));
/// convert_files_with_options("scan.png", "scan.hocr", "scan.pdf", options).unwrap();
/// ```
pub fn convert_files_with_options<I, H, O>(
    image: I,
    hocr: H,
    output: O,
    options: ConvertOptions,
) -> Result<ConvertReport>
where
    I: AsRef<Path>,
    H: AsRef<Path>,
    O: AsRef<Path>,
{
    HocrCombiner::new(options)
        .locate_image(image)
        .locate_hocr(hocr)
        .to_pdf(output)
}

/// Convert in memory: encoded image bytes plus hOCR text to PDF bytes.
///
/// # Example
///
/// ```no_run
/// let image = std::fs::read("scan.png").unwrap();
/// let hocr = std::fs::read_to_string("scan.hocr").unwrap();
/// let (pdf, _report) = hocrpdf::convert_bytes(&image, &hocr, &Default::default()).unwrap();
/// std::fs::write("scan.pdf", pdf).unwrap();
/// ```
pub fn convert_bytes(
    image: &[u8],
    hocr: &str,
    options: &ConvertOptions,
) -> Result<(Vec<u8>, ConvertReport)> {
    let page = parser::load_page_image_bytes(image)?;
    let doc = parse_hocr(hocr)?;
    let (sealed, report) = convert_page(&page, Some(&doc), options)?;
    Ok((sealed.into_bytes(), report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let mut out = Vec::new();
        image::DynamicImage::new_luma8(width, height)
            .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    const HOCR: &str = r#"<html xmlns="http://www.w3.org/1999/xhtml"><body>
<div class="ocr_page" title="bbox 0 0 2550 3300">
<span class="ocrx_word" title="bbox 100 200 400 230; x_wconf 95">Hello</span>
</div></body></html>"#;

    #[test]
    fn test_convert_bytes_uses_ocr_page_without_image_dpi() {
        let options = ConvertOptions::new().with_pdf(PdfOptions::new().reproducible());
        let (pdf, report) = convert_bytes(&png_bytes(850, 1100), HOCR, &options).unwrap();

        assert!(pdf.starts_with(b"%PDF-1.4"));
        assert_eq!(report.page_size_source, PageSizeSource::OcrPageRegion);
        assert!((report.geometry.page_width - 8.5).abs() < 1e-9);
        assert!((report.geometry.page_height - 11.0).abs() < 1e-9);
        assert_eq!(report.placed, 1);
        assert!(report.is_clean());
    }

    #[test]
    fn test_convert_bytes_rejects_swapped_inputs() {
        let result = convert_bytes(HOCR.as_bytes(), HOCR, &ConvertOptions::default());
        assert!(matches!(result, Err(Error::ImageDecode(_))));
    }

    #[test]
    fn test_convert_files_missing_image() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.pdf");
        let result = convert_files(dir.path().join("nope.png"), "nope.hocr", &out);
        assert!(matches!(result, Err(Error::Io(_))));
        assert!(!out.exists());
    }
}
