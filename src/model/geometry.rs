//! Physical page geometry.

use serde::{Deserialize, Serialize};

/// PDF user-space units per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Page size and OCR resolution established for one page.
///
/// All four values are strictly positive once produced by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolvedGeometry {
    /// Page width in inches
    pub page_width: f64,

    /// Page height in inches
    pub page_height: f64,

    /// OCR pixels per inch, horizontally
    pub ocr_dpi_x: f64,

    /// OCR pixels per inch, vertically
    pub ocr_dpi_y: f64,
}

impl ResolvedGeometry {
    /// Create a geometry from page size (inches) and OCR resolution.
    pub fn new(page_width: f64, page_height: f64, ocr_dpi_x: f64, ocr_dpi_y: f64) -> Self {
        Self {
            page_width,
            page_height,
            ocr_dpi_x,
            ocr_dpi_y,
        }
    }

    /// Page size in PDF points.
    pub fn page_size_points(&self) -> (f64, f64) {
        (
            self.page_width * POINTS_PER_INCH,
            self.page_height * POINTS_PER_INCH,
        )
    }

    /// Check that every component is finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        [
            self.page_width,
            self.page_height,
            self.ocr_dpi_x,
            self.ocr_dpi_y,
        ]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0)
    }
}

/// An OCR box mapped into page space, in inches, origin bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MappedBox {
    /// Left edge
    pub x: f64,

    /// Bottom edge
    pub y: f64,

    /// Horizontal extent
    pub width: f64,

    /// Vertical extent
    pub height: f64,
}

impl MappedBox {
    /// Left, bottom, width and height in PDF points.
    pub fn to_points(&self) -> MappedBox {
        MappedBox {
            x: self.x * POINTS_PER_INCH,
            y: self.y * POINTS_PER_INCH,
            width: self.width * POINTS_PER_INCH,
            height: self.height * POINTS_PER_INCH,
        }
    }

    /// True if the box has no horizontal extent and cannot be stretched over.
    pub fn has_zero_width(&self) -> bool {
        self.width <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_points() {
        let geometry = ResolvedGeometry::new(8.5, 11.0, 300.0, 300.0);
        assert_eq!(geometry.page_size_points(), (612.0, 792.0));
        assert!(geometry.is_valid());
    }

    #[test]
    fn test_invalid_geometry() {
        assert!(!ResolvedGeometry::new(0.0, 11.0, 300.0, 300.0).is_valid());
        assert!(!ResolvedGeometry::new(8.5, 11.0, f64::NAN, 300.0).is_valid());
    }

    #[test]
    fn test_mapped_box_points() {
        let mapped = MappedBox {
            x: 1.0,
            y: 2.0,
            width: 0.5,
            height: 0.25,
        };
        let pts = mapped.to_points();
        assert_eq!(pts.x, 72.0);
        assert_eq!(pts.y, 144.0);
        assert_eq!(pts.width, 36.0);
        assert_eq!(pts.height, 18.0);
        assert!(!mapped.has_zero_width());
        assert!(MappedBox::default().has_zero_width());
    }
}
