//! OCR pixel space to page space.

use crate::model::{BBox, MappedBox, ResolvedGeometry};

/// Map an OCR box (pixels, origin top-left) into page space (inches,
/// origin bottom-left).
///
/// The returned `y` is the box's bottom edge, where text baselines go.
/// A zero box maps to a zero-width box; callers must not divide by its width.
pub fn map_bbox(bbox: &BBox, geometry: &ResolvedGeometry) -> MappedBox {
    let x0 = f64::from(bbox.x0) / geometry.ocr_dpi_x;
    let x1 = f64::from(bbox.x1) / geometry.ocr_dpi_x;
    let y0 = f64::from(bbox.y0) / geometry.ocr_dpi_y;
    let y1 = f64::from(bbox.y1) / geometry.ocr_dpi_y;

    MappedBox {
        x: x0,
        y: geometry.page_height - y1,
        width: x1 - x0,
        height: y1 - y0,
    }
}
