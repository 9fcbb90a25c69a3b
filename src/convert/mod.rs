//! Page conversion: image + hOCR to a searchable PDF.
//!
//! [`convert_page`] works entirely in memory. [`HocrCombiner`] adds file
//! handling on top: it checks that every location is known, loads both
//! inputs, converts, and only then writes the output.
//!
//! # Example
//!
//! ```no_run
//! use hocrpdf::convert::{ConvertOptions, HocrCombiner};
//!
//! fn main() -> hocrpdf::Result<()> {
//!     let report = HocrCombiner::new(ConvertOptions::default())
//!         .locate_image("page.png")
//!         .locate_hocr("page.hocr")
//!         .to_pdf("page.pdf")?;
//!     println!("{} words placed", report.placed);
//!     Ok(())
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{Error, InputKind, Result, Warning};
use crate::geometry::{PageSizeSource, Resolution, ResolutionPolicy, Resolver};
use crate::model::{OcrDocument, PageImage, ResolvedGeometry};
use crate::parser::{load_hocr_file, load_page_image};
use crate::render::{
    OutputPage, Overlay, OverlayOptions, OverlayRenderer, PdfOptions, SealedDocument,
};

/// hOCR classes counted in the report regardless of what is rendered.
const LINE_CLASS: &str = "ocr_line";
const WORD_CLASS: &str = "ocrx_word";

/// Options for one conversion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConvertOptions {
    /// Invisible text layer options
    pub overlay: OverlayOptions,

    /// Resolution fallbacks and page region class
    pub policy: ResolutionPolicy,

    /// Output file options
    pub pdf: PdfOptions,
}

impl ConvertOptions {
    /// Create conversion options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set overlay options.
    pub fn with_overlay(mut self, overlay: OverlayOptions) -> Self {
        self.overlay = overlay;
        self
    }

    /// Set the resolution policy.
    pub fn with_policy(mut self, policy: ResolutionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set PDF options.
    pub fn with_pdf(mut self, pdf: PdfOptions) -> Self {
        self.pdf = pdf;
        self
    }

    /// Check every option group; the renderer is built as part of the check.
    fn renderer(&self) -> Result<OverlayRenderer> {
        self.policy.validate()?;
        OverlayRenderer::new(self.overlay.clone())
    }
}

/// Summary of a conversion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertReport {
    /// Image path or label
    pub source: String,

    /// Image size in pixels
    pub image_size: (u32, u32),

    /// Resolved page size and OCR resolution
    pub geometry: ResolvedGeometry,

    /// Where the page size came from
    pub page_size_source: PageSizeSource,

    /// Page size in points
    pub page_size_points: (f64, f64),

    /// Font used for the text layer
    pub font: String,

    /// `ocr_line` elements in the hOCR
    pub ocr_lines: usize,

    /// `ocrx_word` elements in the hOCR
    pub ocr_words: usize,

    /// Elements matching the selected classes
    pub selected: usize,

    /// Text runs written
    pub placed: usize,

    /// Selected elements without a text run
    pub skipped: usize,

    /// All diagnostics, in the order they were raised
    pub warnings: Vec<Warning>,

    /// Written file, when converting to disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Size of the generated PDF, zero when nothing was generated
    pub pdf_bytes: usize,
}

impl ConvertReport {
    fn new(
        page: &PageImage,
        ocr: Option<&OcrDocument>,
        renderer: &OverlayRenderer,
        resolution: Resolution,
        overlay: &Overlay,
    ) -> Self {
        let mut warnings = resolution.warnings;
        warnings.extend(overlay.warnings.iter().cloned());

        Self {
            source: page.info().source_name.clone(),
            image_size: (page.info().width, page.info().height),
            geometry: resolution.geometry,
            page_size_source: resolution.page_size_source,
            page_size_points: resolution.geometry.page_size_points(),
            font: renderer.font().to_string(),
            ocr_lines: ocr.map_or(0, |doc| doc.count_class(LINE_CLASS)),
            ocr_words: ocr.map_or(0, |doc| doc.count_class(WORD_CLASS)),
            selected: overlay.selected,
            placed: overlay.placements.len(),
            skipped: overlay.skipped(),
            warnings,
            output: None,
            pdf_bytes: 0,
        }
    }

    /// True when nothing had to be assumed or skipped.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }

    /// Render the report as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Other(format!("JSON serialization error: {}", e)))
    }
}

struct Plan {
    renderer: OverlayRenderer,
    resolution: Resolution,
    overlay: Overlay,
}

fn plan(page: &PageImage, ocr: Option<&OcrDocument>, options: &ConvertOptions) -> Result<Plan> {
    let renderer = options.renderer()?;
    let mut resolution = Resolver::new(options.policy.clone()).resolve(page.info(), ocr)?;

    let overlay = match ocr {
        Some(doc) => renderer.place_all(doc, &resolution.geometry),
        None => {
            log::warn!("{}", Warning::MissingOcr);
            resolution.warnings.insert(0, Warning::MissingOcr);
            Overlay::default()
        }
    };

    Ok(Plan {
        renderer,
        resolution,
        overlay,
    })
}

/// Resolve geometry and place text without producing a PDF.
pub fn inspect_page(
    page: &PageImage,
    ocr: Option<&OcrDocument>,
    options: &ConvertOptions,
) -> Result<ConvertReport> {
    let Plan {
        renderer,
        resolution,
        overlay,
    } = plan(page, ocr, options)?;
    Ok(ConvertReport::new(page, ocr, &renderer, resolution, &overlay))
}

/// Convert one page in memory.
///
/// Without an OCR document the PDF holds only the image and the report
/// carries a [`Warning::MissingOcr`].
///
/// # Arguments
///
/// * `page` - Decoded page image with its DPI, if the file had one
/// * `ocr` - Parsed hOCR for the page
/// * `options` - Overlay, resolution and output options
///
/// # Example
///
/// ```no_run
/// use hocrpdf::{convert_page, load_hocr_file, load_page_image, ConvertOptions};
///
/// let page = load_page_image("scan.tif").unwrap();
/// let doc = load_hocr_file("scan.hocr").unwrap();
/// let (pdf, report) = convert_page(&page, Some(&doc), &ConvertOptions::default()).unwrap();
/// pdf.save("scan.pdf").unwrap();
/// assert_eq!(report.placed + report.skipped, report.selected);
/// ```
pub fn convert_page(
    page: &PageImage,
    ocr: Option<&OcrDocument>,
    options: &ConvertOptions,
) -> Result<(SealedDocument, ConvertReport)> {
    let Plan {
        renderer,
        resolution,
        overlay,
    } = plan(page, ocr, options)?;

    let (width, height) = resolution.geometry.page_size_points();
    let mut output = OutputPage::new(width, height, renderer.font(), options.pdf.clone())?;
    output.draw_background(page.pixels())?;
    for placement in &overlay.placements {
        output.add_text(placement);
    }
    let sealed = output.seal()?;

    let mut report = ConvertReport::new(page, ocr, &renderer, resolution, &overlay);
    report.pdf_bytes = sealed.bytes().len();
    Ok((sealed, report))
}

/// File-based conversion of one image and its hOCR.
#[derive(Debug, Clone, Default)]
pub struct HocrCombiner {
    options: ConvertOptions,
    image: Option<PathBuf>,
    hocr: Option<PathBuf>,
}

impl HocrCombiner {
    /// Create a combiner with the given options.
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            image: None,
            hocr: None,
        }
    }

    /// Set the page image location.
    pub fn locate_image(mut self, path: impl AsRef<Path>) -> Self {
        self.image = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set the hOCR location.
    pub fn locate_hocr(mut self, path: impl AsRef<Path>) -> Self {
        self.hocr = Some(path.as_ref().to_path_buf());
        self
    }

    fn inputs(&self) -> Result<(&Path, &Path)> {
        let image = self
            .image
            .as_deref()
            .ok_or(Error::MissingInput(InputKind::Image))?;
        let hocr = self
            .hocr
            .as_deref()
            .ok_or(Error::MissingInput(InputKind::Markup))?;
        Ok((image, hocr))
    }

    fn load(&self) -> Result<(PageImage, OcrDocument)> {
        let (image, hocr) = self.inputs()?;
        let page = load_page_image(image)?;
        let doc = load_hocr_file(hocr)?;
        Ok((page, doc))
    }

    /// Load both inputs and report what a conversion would do.
    pub fn inspect(&self) -> Result<ConvertReport> {
        let (page, doc) = self.load()?;
        inspect_page(&page, Some(&doc), &self.options)
    }

    /// Convert and write the PDF to `output`.
    ///
    /// Fails with [`Error::MissingInput`] before reading anything when a
    /// location is unset or `output` is empty. No file is created unless the
    /// whole document was generated.
    pub fn to_pdf(&self, output: impl AsRef<Path>) -> Result<ConvertReport> {
        let output = output.as_ref();
        self.inputs()?;
        if output.as_os_str().is_empty() {
            return Err(Error::MissingInput(InputKind::Output));
        }

        let (page, doc) = self.load()?;
        let (sealed, mut report) = convert_page(&page, Some(&doc), &self.options)?;
        sealed.save(output)?;

        log::info!(
            "Converted {} to {}: {} of {} text runs placed",
            report.source,
            output.display(),
            report.placed,
            report.selected
        );
        report.output = Some(output.to_path_buf());
        Ok(report)
    }
}
