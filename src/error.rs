//! Error and diagnostic types for hocrpdf.

use serde::Serialize;
use std::io;
use thiserror::Error;

/// Result type alias for hocrpdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which conversion input was not provided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    /// The scanned page image.
    Image,
    /// The hOCR markup file.
    Markup,
    /// The PDF output location.
    Output,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Image => write!(f, "image"),
            InputKind::Markup => write!(f, "hOCR"),
            InputKind::Output => write!(f, "PDF output"),
        }
    }
}

/// Fatal errors. Any of these aborts the conversion before output is written.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A required input location was never set.
    #[error("Missing input: {0} path not located")]
    MissingInput(InputKind),

    /// The page image could not be decoded.
    #[error("Image decoding error: {0}")]
    ImageDecode(String),

    /// The image format is not recognized.
    #[error("Unknown image format")]
    UnknownImageFormat,

    /// The hOCR markup could not be parsed.
    #[error("Markup parsing error: {0}")]
    Markup(String),

    /// Error while building or serializing the PDF.
    #[error("PDF writing error: {0}")]
    PdfWrite(String),

    /// Page geometry could not be made positive and finite.
    #[error("Degenerate page geometry: {0}")]
    Geometry(String),

    /// The requested font has no metrics available.
    #[error("Unknown font: {0}")]
    UnknownFont(String),

    /// An option value is out of range.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => Error::Io(e),
            image::ImageError::Unsupported(_) => Error::UnknownImageFormat,
            _ => Error::ImageDecode(err.to_string()),
        }
    }
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::Markup(err.to_string())
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfWrite(err.to_string()),
        }
    }
}

/// Non-fatal diagnostics collected during a conversion.
///
/// Warnings never abort the page; each one describes a fallback or a skipped
/// element so that nothing is lost silently.
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Neither the image nor the hOCR carried resolution data.
    #[error("DPI unavailable for {source_name}. Assuming {assumed_dpi} DPI.")]
    UnresolvedGeometry {
        /// Image path or label
        source_name: String,
        /// The fallback resolution that was applied
        assumed_dpi: f64,
    },

    /// No OCR document was supplied; only the background is rendered.
    #[error("No hOCR document available; rendering the image without a text layer")]
    MissingOcr,

    /// The hOCR document has no usable page region; the OCR resolution is a guess.
    #[error("hOCR has no page region; assuming OCR resolution of {assumed_dpi} DPI")]
    MissingPageRegion {
        /// The placeholder resolution that stayed active
        assumed_dpi: f64,
    },

    /// The first page region exists but its box cannot be used.
    #[error("Page region ({class}) ignored: {reason}")]
    MalformedPageRegion {
        /// The region's class attribute
        class: String,
        /// What was wrong with the box
        reason: String,
    },

    /// No element in the hOCR carries any of the requested text classes.
    #[error("No hOCR element has class {classes}; the text layer is empty")]
    NoMatchingElements {
        /// The requested classes, comma-separated
        classes: String,
    },

    /// An element's bounding box is missing or unparseable.
    #[error("Element #{index} ({class}) has no valid bbox: {reason}")]
    MalformedElement {
        /// Position of the element among the scanned elements
        index: usize,
        /// The element's class attribute
        class: String,
        /// What was wrong with the box
        reason: String,
    },

    /// A text run was skipped because no scale factor could be computed.
    #[error("Element #{index} ({class}) skipped: {reason}")]
    DegenerateScale {
        /// Position of the element among the scanned elements
        index: usize,
        /// The element's class attribute
        class: String,
        /// Why the scale is degenerate
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingInput(InputKind::Markup);
        assert_eq!(err.to_string(), "Missing input: hOCR path not located");

        let err = Error::UnknownFont("Papyrus".into());
        assert_eq!(err.to_string(), "Unknown font: Papyrus");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_warning_display() {
        let warning = Warning::UnresolvedGeometry {
            source_name: "scan.png".into(),
            assumed_dpi: 96.0,
        };
        assert_eq!(
            warning.to_string(),
            "DPI unavailable for scan.png. Assuming 96 DPI."
        );
    }

    #[test]
    fn test_warning_serializes_with_kind_tag() {
        let json = serde_json::to_string(&Warning::MissingOcr).unwrap();
        assert_eq!(json, r#"{"kind":"missing_ocr"}"#);
    }

    #[test]
    fn test_page_region_warning_has_no_element_index() {
        let warning = Warning::MalformedPageRegion {
            class: "ocr_page".into(),
            reason: "inverted".into(),
        };
        assert_eq!(warning.to_string(), "Page region (ocr_page) ignored: inverted");
        let json = serde_json::to_string(&warning).unwrap();
        assert!(json.contains(r#""kind":"malformed_page_region""#));
        assert!(!json.contains("index"));
    }
}
