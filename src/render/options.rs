//! Rendering options and configuration.

use chrono::{DateTime, Utc};

use super::fonts::StandardFont;
use crate::error::{Error, Result};

/// hOCR class of a recognized word, as written by Tesseract.
pub const DEFAULT_LINE_CLASS: &str = "ocrx_word";

/// Font used for the invisible layer unless overridden.
pub const DEFAULT_FONT: &str = "Courier";

/// Nominal font size for the invisible layer.
pub const DEFAULT_FONT_SIZE: f64 = 8.0;

/// Options for the invisible text layer.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayOptions {
    /// hOCR classes whose elements become invisible text runs
    pub line_classes: Vec<String>,

    /// Standard PDF font name used to measure and place text
    pub font_name: String,

    /// Nominal font size in points; only affects width measurement
    pub font_size: f64,
}

impl OverlayOptions {
    /// Create overlay options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the set of rendered classes.
    pub fn with_line_classes<I, S>(mut self, classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.line_classes = classes.into_iter().map(Into::into).collect();
        self
    }

    /// Add one class to the rendered set.
    pub fn with_line_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !self.line_classes.contains(&class) {
            self.line_classes.push(class);
        }
        self
    }

    /// Set the font name.
    pub fn with_font(mut self, name: impl Into<String>) -> Self {
        self.font_name = name.into();
        self
    }

    /// Set the nominal font size.
    pub fn with_font_size(mut self, size: f64) -> Self {
        self.font_size = size;
        self
    }

    /// Check the options and resolve the font.
    pub fn validate(&self) -> Result<StandardFont> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(Error::InvalidOption(format!(
                "font size must be positive, got {}",
                self.font_size
            )));
        }
        self.font_name.parse()
    }

    /// Parse a comma-separated class list (e.g., "ocrx_word,ocr_line").
    pub fn parse_classes(s: &str) -> Result<Vec<String>> {
        let classes: Vec<String> = s
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .collect();

        if classes.is_empty() {
            return Err(Error::InvalidOption("class list is empty".into()));
        }
        if let Some(bad) = classes.iter().find(|c| c.contains(char::is_whitespace)) {
            return Err(Error::InvalidOption(format!(
                "class name contains whitespace: {:?}",
                bad
            )));
        }
        Ok(classes)
    }
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            line_classes: vec![DEFAULT_LINE_CLASS.to_string()],
            font_name: DEFAULT_FONT.to_string(),
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

/// When the document info dictionary records its creation date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timestamp {
    /// Use the current time
    #[default]
    Now,
    /// Use a fixed time
    At(DateTime<Utc>),
    /// Leave CreationDate out (byte-reproducible output)
    Omit,
}

impl Timestamp {
    /// The date to record, if any.
    pub fn resolve(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Now => Some(Utc::now()),
            Timestamp::At(at) => Some(*at),
            Timestamp::Omit => None,
        }
    }
}

/// Options for the generated PDF file.
#[derive(Debug, Clone, PartialEq)]
pub struct PdfOptions {
    /// Compress the image and content streams with Flate
    pub compress: bool,

    /// Document title
    pub title: Option<String>,

    /// Producer recorded in the info dictionary
    pub producer: String,

    /// Creation date handling
    pub timestamp: Timestamp,
}

impl PdfOptions {
    /// Create PDF options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable stream compression.
    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the producer string.
    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = producer.into();
        self
    }

    /// Set creation date handling.
    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Omit the creation date.
    pub fn reproducible(self) -> Self {
        self.with_timestamp(Timestamp::Omit)
    }
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            compress: true,
            title: None,
            producer: format!("hocrpdf {}", env!("CARGO_PKG_VERSION")),
            timestamp: Timestamp::Now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_defaults() {
        let options = OverlayOptions::default();
        assert_eq!(options.line_classes, vec!["ocrx_word"]);
        assert_eq!(options.font_name, "Courier");
        assert_eq!(options.font_size, 8.0);
        assert_eq!(options.validate().unwrap(), StandardFont::Courier);
    }

    #[test]
    fn test_overlay_builder() {
        let options = OverlayOptions::new()
            .with_line_classes(["ocr_line"])
            .with_line_class("ocr_caption")
            .with_line_class("ocr_line")
            .with_font("Helvetica")
            .with_font_size(10.0);

        assert_eq!(options.line_classes, vec!["ocr_line", "ocr_caption"]);
        assert_eq!(options.validate().unwrap(), StandardFont::Helvetica);
    }

    #[test]
    fn test_overlay_validation() {
        assert!(matches!(
            OverlayOptions::new().with_font_size(0.0).validate(),
            Err(Error::InvalidOption(_))
        ));
        assert!(matches!(
            OverlayOptions::new().with_font("Comic Sans").validate(),
            Err(Error::UnknownFont(_))
        ));
    }

    #[test]
    fn test_parse_classes() {
        assert_eq!(
            OverlayOptions::parse_classes(" ocrx_word, ocr_line ,").unwrap(),
            vec!["ocrx_word", "ocr_line"]
        );
        assert!(OverlayOptions::parse_classes(" , ").is_err());
    }

    #[test]
    fn test_pdf_options_builder() {
        let options = PdfOptions::new()
            .with_compression(false)
            .with_title("Scan 42")
            .reproducible();

        assert!(!options.compress);
        assert_eq!(options.title.as_deref(), Some("Scan 42"));
        assert_eq!(options.timestamp.resolve(), None);
        assert!(PdfOptions::default().producer.starts_with("hocrpdf "));
    }
}
