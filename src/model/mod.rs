//! Model types for a single-page conversion.
//!
//! These types bridge the decoded inputs (raster image, hOCR tree) and the
//! PDF writer. Geometry types carry physical sizes in inches; conversion to
//! PDF points happens only at the writer boundary.

mod geometry;
mod ocr;
mod page_image;

pub use self::geometry::{MappedBox, ResolvedGeometry, POINTS_PER_INCH};
pub use self::ocr::{BBox, BBoxIssue, OcrDocument, OcrElement};
pub use self::page_image::{ImageInfo, PageImage};
