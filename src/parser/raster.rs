//! Page image loading and resolution metadata.
//!
//! Pixels come from the `image` crate, which does not expose physical
//! resolution. Resolution is read separately per container: the PNG `pHYs`
//! chunk, the JPEG JFIF header (falling back to EXIF), TIFF/EXIF
//! resolution tags, and the BMP info header.

use std::io::Cursor;
use std::path::Path;

use crate::detect::{detect_container_from_bytes, is_markup_bytes, ImageContainer};
use crate::error::{Error, Result};
use crate::model::PageImage;

const INCHES_PER_METER: f64 = 39.370_078_740_157_48;
const CM_PER_INCH: f64 = 2.54;

/// Decode a page image file and read its resolution.
///
/// The path becomes the page's source name in warnings and reports.
///
/// # Example
///
/// ```no_run
/// let page = hocrpdf::load_page_image("scan.png").unwrap();
/// match page.info().dpi {
///     Some((x, y)) => println!("{} x {} dpi", x, y),
///     None => println!("no resolution recorded"),
/// }
/// ```
pub fn load_page_image<P: AsRef<Path>>(path: P) -> Result<PageImage> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let page = load_page_image_bytes(&data)?;
    Ok(page.with_source_name(path.display().to_string()))
}

/// Decode a page image from memory and read its resolution.
pub fn load_page_image_bytes(data: &[u8]) -> Result<PageImage> {
    let container = detect_container_from_bytes(data)?;
    if container == ImageContainer::Other && is_markup_bytes(data) {
        return Err(Error::ImageDecode(
            "input looks like markup, not an image (were the image and hOCR swapped?)".into(),
        ));
    }

    let pixels = image::load_from_memory(data)?;
    let dpi = read_dpi(container, data);
    log::debug!(
        "Decoded {} image {}x{} px, dpi {:?}",
        container,
        pixels.width(),
        pixels.height(),
        dpi
    );

    Ok(PageImage::new(pixels, dpi))
}

/// Resolution recorded in the file, in pixels per inch.
///
/// Metadata errors are not fatal: the page falls back to other sources.
pub fn read_dpi(container: ImageContainer, data: &[u8]) -> Option<(f64, f64)> {
    let dpi = match container {
        ImageContainer::Png => png_dpi(data),
        ImageContainer::Jpeg => jfif_dpi(data).or_else(|| exif_dpi(data)),
        ImageContainer::Tiff => exif_dpi(data),
        ImageContainer::Bmp => bmp_dpi(data),
        ImageContainer::Other => None,
    };
    dpi.filter(|(x, y)| *x > 0.0 && *y > 0.0)
}

fn png_dpi(data: &[u8]) -> Option<(f64, f64)> {
    let decoder = png::Decoder::new(Cursor::new(data));
    let reader = match decoder.read_info() {
        Ok(reader) => reader,
        Err(e) => {
            log::debug!("Could not read PNG header for resolution: {}", e);
            return None;
        }
    };

    let dims = reader.info().pixel_dims?;
    match dims.unit {
        png::Unit::Meter => Some((
            f64::from(dims.xppu) / INCHES_PER_METER,
            f64::from(dims.yppu) / INCHES_PER_METER,
        )),
        // Aspect ratio only, no physical size
        png::Unit::Unspecified => None,
    }
}

/// Density from a JFIF APP0 segment directly after SOI.
fn jfif_dpi(data: &[u8]) -> Option<(f64, f64)> {
    // FF D8 | FF E0 len(2) "JFIF\0" version(2) units(1) xdensity(2) ydensity(2)
    let app0 = data.get(2..18)?;
    if app0[0] != 0xFF || app0[1] != 0xE0 || &app0[4..9] != b"JFIF\0" {
        return None;
    }

    let units = app0[11];
    let x = f64::from(u16::from_be_bytes([app0[12], app0[13]]));
    let y = f64::from(u16::from_be_bytes([app0[14], app0[15]]));
    match units {
        1 => Some((x, y)),
        2 => Some((x * CM_PER_INCH, y * CM_PER_INCH)),
        _ => None,
    }
}

/// Pixels per metre from a BITMAPINFOHEADER or any later header version.
fn bmp_dpi(data: &[u8]) -> Option<(f64, f64)> {
    // file header(14) | header_size(4) width(4) height(4) planes(2) bpp(2)
    //   compression(4) image_size(4) x_ppm(4) y_ppm(4)
    let info = data.get(14..46)?;
    let header_size = u32::from_le_bytes(info[0..4].try_into().ok()?);
    if header_size < 40 {
        // OS/2 BITMAPCOREHEADER has no resolution
        return None;
    }

    let x_ppm = i32::from_le_bytes(info[24..28].try_into().ok()?);
    let y_ppm = i32::from_le_bytes(info[28..32].try_into().ok()?);
    if x_ppm <= 0 || y_ppm <= 0 {
        return None;
    }
    Some((
        f64::from(x_ppm) / INCHES_PER_METER,
        f64::from(y_ppm) / INCHES_PER_METER,
    ))
}

fn exif_dpi(data: &[u8]) -> Option<(f64, f64)> {
    use exif::{In, Tag, Value};

    let exif = match exif::Reader::new().read_from_container(&mut Cursor::new(data)) {
        Ok(exif) => exif,
        Err(e) => {
            log::debug!("No EXIF resolution: {}", e);
            return None;
        }
    };

    let rational = |tag: Tag| -> Option<f64> {
        match &exif.get_field(tag, In::PRIMARY)?.value {
            Value::Rational(values) => values.first().map(|r| r.to_f64()),
            _ => None,
        }
    };

    let x = rational(Tag::XResolution)?;
    let y = rational(Tag::YResolution)?;

    // 1 = no absolute unit, 2 = inch (default), 3 = centimeter
    let unit = exif
        .get_field(Tag::ResolutionUnit, In::PRIMARY)
        .and_then(|f| f.value.get_uint(0))
        .unwrap_or(2);
    match unit {
        2 => Some((x, y)),
        3 => Some((x * CM_PER_INCH, y * CM_PER_INCH)),
        _ => None,
    }
}
