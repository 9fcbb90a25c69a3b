//! Image container detection from magic bytes.
//!
//! Decoding itself is left to the `image` crate; this only decides which
//! resolution-metadata reader applies to a file.

use crate::error::{Error, Result};

/// Image container families that carry resolution metadata differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageContainer {
    /// PNG, resolution in the pHYs chunk
    Png,
    /// JPEG, resolution in the JFIF APP0 segment or EXIF
    Jpeg,
    /// TIFF, resolution in the XResolution/YResolution tags
    Tiff,
    /// BMP, resolution in pixels per metre in the info header
    Bmp,
    /// Anything else the decoder understands (GIF, WebP, ...)
    Other,
}

impl std::fmt::Display for ImageContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ImageContainer::Png => "PNG",
            ImageContainer::Jpeg => "JPEG",
            ImageContainer::Tiff => "TIFF",
            ImageContainer::Bmp => "BMP",
            ImageContainer::Other => "other",
        };
        f.write_str(name)
    }
}

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const TIFF_LE_MAGIC: &[u8] = b"II*\0";
const TIFF_BE_MAGIC: &[u8] = b"MM\0*";
const BMP_MAGIC: &[u8] = b"BM";

/// Detect the image container from the leading bytes of a file.
///
/// # Arguments
///
/// * `data` - File contents; only the first few bytes are examined
///
/// # Returns
///
/// The container family, or `Error::UnknownImageFormat` for empty input.
/// Unrecognized but non-empty data is [`ImageContainer::Other`] and is left
/// for the decoder to accept or reject.
///
/// # Example
///
/// ```
/// use hocrpdf::{detect_container_from_bytes, ImageContainer};
///
/// let header = b"\x89PNG\r\n\x1a\n";
/// assert_eq!(detect_container_from_bytes(header).unwrap(), ImageContainer::Png);
/// ```
pub fn detect_container_from_bytes(data: &[u8]) -> Result<ImageContainer> {
    if data.is_empty() {
        return Err(Error::UnknownImageFormat);
    }

    let container = if data.starts_with(PNG_MAGIC) {
        ImageContainer::Png
    } else if data.starts_with(JPEG_MAGIC) {
        ImageContainer::Jpeg
    } else if data.starts_with(TIFF_LE_MAGIC) || data.starts_with(TIFF_BE_MAGIC) {
        ImageContainer::Tiff
    } else if data.starts_with(BMP_MAGIC) {
        ImageContainer::Bmp
    } else {
        ImageContainer::Other
    };

    Ok(container)
}

/// Check if bytes look like hOCR/XHTML markup rather than an image.
pub fn is_markup_bytes(data: &[u8]) -> bool {
    let head = &data[..data.len().min(512)];
    let text = String::from_utf8_lossy(head);
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    trimmed.starts_with("<?xml") || trimmed.starts_with("<!DOCTYPE") || trimmed.starts_with("<html")
}
