//! Rendering: invisible text placement and PDF output.

mod fonts;
mod options;
mod overlay;
pub mod pdf;

pub use fonts::{encode_win_ansi, StandardFont};
pub use options::{
    OverlayOptions, PdfOptions, Timestamp, DEFAULT_FONT, DEFAULT_FONT_SIZE, DEFAULT_LINE_CLASS,
};
pub use overlay::{Overlay, OverlayRenderer, TextPlacement};
pub use pdf::{OutputPage, SealedDocument};
