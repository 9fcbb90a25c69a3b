//! Page geometry: reconciling image, OCR and PDF coordinate spaces.
//!
//! [`Resolver`] runs once per page and fixes the physical page size and the
//! OCR resolution. [`map_bbox`] then converts each OCR box into page space.

mod mapper;
mod resolve;

pub use mapper::map_bbox;
pub use resolve::{
    PageSizeSource, Resolution, ResolutionPolicy, Resolver, DEFAULT_OCR_DPI, FALLBACK_IMAGE_DPI,
    PAGE_REGION_CLASS,
};
