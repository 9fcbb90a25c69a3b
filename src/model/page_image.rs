//! The decoded page image.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Pixel size and resolution metadata of a page image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Horizontal and vertical resolution (pixels per inch), if recorded
    pub dpi: Option<(f64, f64)>,

    /// Path or label used in diagnostics
    pub source_name: String,
}

impl ImageInfo {
    /// Create image info without resolution metadata.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            dpi: None,
            source_name: "image".to_string(),
        }
    }

    /// Set the recorded resolution.
    pub fn with_dpi(mut self, dpi_x: f64, dpi_y: f64) -> Self {
        self.dpi = Some((dpi_x, dpi_y));
        self
    }

    /// Set the label used in diagnostics.
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    /// The recorded resolution, only if both axes are finite and positive.
    pub fn usable_dpi(&self) -> Option<(f64, f64)> {
        self.dpi
            .filter(|(x, y)| x.is_finite() && y.is_finite() && *x > 0.0 && *y > 0.0)
    }
}

/// A decoded raster page plus its metadata.
#[derive(Debug, Clone)]
pub struct PageImage {
    info: ImageInfo,
    pixels: DynamicImage,
}

impl PageImage {
    /// Wrap decoded pixels; pixel size is taken from the image itself.
    pub fn new(pixels: DynamicImage, dpi: Option<(f64, f64)>) -> Self {
        let mut info = ImageInfo::new(pixels.width(), pixels.height());
        info.dpi = dpi;
        Self { info, pixels }
    }

    /// Set the label used in diagnostics.
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.info.source_name = name.into();
        self
    }

    /// Size and resolution metadata.
    pub fn info(&self) -> &ImageInfo {
        &self.info
    }

    /// Decoded pixels.
    pub fn pixels(&self) -> &DynamicImage {
        &self.pixels
    }
}
