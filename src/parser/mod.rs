//! Input loading: hOCR markup and page images.

pub mod backend;
mod hocr;
mod raster;

pub use backend::{MarkupNode, MarkupTree};
pub use hocr::{load_hocr_file, load_hocr_reader, parse_hocr};
pub use raster::{load_page_image, load_page_image_bytes, read_dpi};
