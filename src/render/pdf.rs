//! Single-page PDF assembly with lopdf.
//!
//! [`OutputPage`] collects the background image and text runs; [`OutputPage::seal`]
//! consumes it and serializes the whole document into memory. Nothing touches
//! the filesystem until [`SealedDocument::save`], which writes to a sibling
//! temporary file and renames it into place.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use flate2::write::ZlibEncoder;
use flate2::Compression;
use image::{ColorType, DynamicImage};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::fonts::StandardFont;
use super::options::PdfOptions;
use super::overlay::TextPlacement;
use crate::error::{Error, Result};

const PDF_VERSION: &str = "1.4";
const IMAGE_RESOURCE: &str = "Im0";
const FONT_RESOURCE: &str = "F1";

/// Text rendering mode 3: neither fill nor stroke.
const INVISIBLE_RENDER_MODE: i64 = 3;

/// A page under construction.
pub struct OutputPage {
    doc: Document,
    width: f64,
    height: f64,
    font: StandardFont,
    options: PdfOptions,
    operations: Vec<Operation>,
    image_id: Option<ObjectId>,
    text_runs: usize,
}

impl OutputPage {
    /// Start a page of `width` x `height` points.
    pub fn new(width: f64, height: f64, font: StandardFont, options: PdfOptions) -> Result<Self> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::Geometry(format!(
                "page size {}x{} pt is not positive",
                width, height
            )));
        }

        Ok(Self {
            doc: Document::with_version(PDF_VERSION),
            width,
            height,
            font,
            options,
            operations: Vec::new(),
            image_id: None,
            text_runs: 0,
        })
    }

    /// Number of text runs added so far.
    pub fn text_runs(&self) -> usize {
        self.text_runs
    }

    /// Draw `image` stretched over the whole page.
    pub fn draw_background(&mut self, image: &DynamicImage) -> Result<()> {
        let (color_space, samples) = match image.color() {
            ColorType::L8 | ColorType::L16 | ColorType::La8 | ColorType::La16 => {
                ("DeviceGray", image.to_luma8().into_raw())
            }
            _ => ("DeviceRGB", image.to_rgb8().into_raw()),
        };

        let mut dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => Object::Integer(i64::from(image.width())),
            "Height" => Object::Integer(i64::from(image.height())),
            "ColorSpace" => color_space,
            "BitsPerComponent" => Object::Integer(8),
        };
        let data = self.encode_stream(&mut dict, samples)?;
        let image_id = self.doc.add_object(Stream::new(dict, data));
        self.image_id = Some(image_id);

        self.operations.push(Operation::new("q", vec![]));
        self.operations.push(Operation::new(
            "cm",
            vec![
                real(self.width),
                real(0.0),
                real(0.0),
                real(self.height),
                real(0.0),
                real(0.0),
            ],
        ));
        self.operations.push(Operation::new(
            "Do",
            vec![Object::Name(IMAGE_RESOURCE.as_bytes().to_vec())],
        ));
        self.operations.push(Operation::new("Q", vec![]));
        Ok(())
    }

    /// Add one invisible text run.
    pub fn add_text(&mut self, placement: &TextPlacement) {
        self.operations.extend([
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(FONT_RESOURCE.as_bytes().to_vec()),
                    real(placement.font_size),
                ],
            ),
            Operation::new("Tr", vec![Object::Integer(INVISIBLE_RENDER_MODE)]),
            Operation::new("Tz", vec![real(placement.horizontal_scale)]),
            Operation::new(
                "Tm",
                vec![
                    real(1.0),
                    real(0.0),
                    real(0.0),
                    real(1.0),
                    real(placement.x),
                    real(placement.y),
                ],
            ),
            Operation::new(
                "Tj",
                vec![Object::String(
                    placement.encoded.clone(),
                    StringFormat::Literal,
                )],
            ),
            Operation::new("ET", vec![]),
        ]);
        self.text_runs += 1;
    }

    /// Finish the page and serialize the document.
    ///
    /// Consumes the page, so nothing can be drawn after sealing.
    pub fn seal(mut self) -> Result<SealedDocument> {
        let pages_id = self.doc.new_object_id();

        let content = Content {
            operations: std::mem::take(&mut self.operations),
        }
        .encode()?;
        let mut content_dict = Dictionary::new();
        let content_data = self.encode_stream(&mut content_dict, content)?;
        let content_id = self.doc.add_object(Stream::new(content_dict, content_data));

        let font_id = self.doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => self.font.base_font(),
            "Encoding" => "WinAnsiEncoding",
        });

        let mut xobjects = Dictionary::new();
        if let Some(image_id) = self.image_id {
            xobjects.set(IMAGE_RESOURCE, image_id);
        }
        let resources = dictionary! {
            "Font" => dictionary! { FONT_RESOURCE => font_id },
            "XObject" => xobjects,
            "ProcSet" => vec![
                Object::Name(b"PDF".to_vec()),
                Object::Name(b"Text".to_vec()),
                Object::Name(b"ImageB".to_vec()),
                Object::Name(b"ImageC".to_vec()),
            ],
        };

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![real(0.0), real(0.0), real(self.width), real(self.height)],
            "Contents" => content_id,
            "Resources" => resources,
        });

        self.doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => Object::Integer(1),
            }),
        );

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let info_id = self.doc.add_object(self.info_dictionary());
        self.doc.trailer.set("Info", info_id);

        let mut bytes = Vec::new();
        self.doc.save_to(&mut bytes)?;
        log::debug!(
            "Sealed {}x{} pt page with {} text runs ({} bytes)",
            self.width,
            self.height,
            self.text_runs,
            bytes.len()
        );

        Ok(SealedDocument { bytes })
    }

    fn info_dictionary(&self) -> Dictionary {
        let mut info = Dictionary::new();
        info.set(
            "Producer",
            Object::string_literal(self.options.producer.as_str()),
        );
        if let Some(title) = &self.options.title {
            info.set("Title", Object::string_literal(title.as_str()));
        }
        if let Some(created) = self.options.timestamp.resolve() {
            let date = created.format("D:%Y%m%d%H%M%S+00'00'").to_string();
            info.set("CreationDate", Object::string_literal(date));
        }
        info
    }

    /// Apply Flate compression when enabled, recording the filter in `dict`.
    fn encode_stream(&self, dict: &mut Dictionary, data: Vec<u8>) -> Result<Vec<u8>> {
        if !self.options.compress {
            return Ok(data);
        }
        dict.set("Filter", "FlateDecode");
        deflate(&data)
    }
}

/// A finished, serialized PDF.
#[derive(Debug, Clone)]
pub struct SealedDocument {
    bytes: Vec<u8>,
}

impl SealedDocument {
    /// The PDF bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Take the PDF bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Write the PDF to `path`.
    ///
    /// The bytes go to a temporary file next to `path` first; a failed write
    /// never leaves a truncated PDF at `path`.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let partial = partial_path(path);

        let written = File::create(&partial).and_then(|mut file| {
            file.write_all(&self.bytes)?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|_| fs::rename(&partial, path)) {
            let _ = fs::remove_file(&partial);
            return Err(Error::Io(e));
        }

        log::info!("Wrote {} ({} bytes)", path.display(), self.bytes.len());
        Ok(())
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "output.pdf".into());
    name.push(".partial");
    path.with_file_name(name)
}

fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(text: &str) -> TextPlacement {
        TextPlacement {
            index: 0,
            text: text.to_string(),
            encoded: text.as_bytes().to_vec(),
            x: 24.0,
            y: 736.8,
            horizontal_scale: 300.0,
            font_size: 8.0,
        }
    }

    fn page_operations(bytes: &[u8]) -> Vec<Operation> {
        let doc = Document::load_mem(bytes).unwrap();
        let pages = doc.get_pages();
        let page_id = *pages.get(&1).unwrap();
        let content = doc.get_page_content(page_id).unwrap();
        Content::decode(&content).unwrap().operations
    }

    #[test]
    fn test_sealed_page_has_one_page_and_media_box() {
        let mut page =
            OutputPage::new(612.0, 792.0, StandardFont::Courier, PdfOptions::new().reproducible())
                .unwrap();
        page.draw_background(&DynamicImage::new_luma8(4, 4)).unwrap();
        let sealed = page.seal().unwrap();

        let doc = Document::load_mem(sealed.bytes()).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page_dict = doc.get_dictionary(*pages.get(&1).unwrap()).unwrap();
        let media_box = page_dict.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[2].as_float().unwrap(), 612.0);
        assert_eq!(media_box[3].as_float().unwrap(), 792.0);
    }

    #[test]
    fn test_text_run_is_invisible_and_scaled() {
        let mut page =
            OutputPage::new(612.0, 792.0, StandardFont::Courier, PdfOptions::new()).unwrap();
        page.draw_background(&DynamicImage::new_rgb8(2, 2)).unwrap();
        page.add_text(&placement("Hello"));
        assert_eq!(page.text_runs(), 1);
        let sealed = page.seal().unwrap();

        let ops = page_operations(sealed.bytes());
        let names: Vec<_> = ops.iter().map(|op| op.operator.as_str()).collect();
        assert_eq!(
            names,
            vec!["q", "cm", "Do", "Q", "BT", "Tf", "Tr", "Tz", "Tm", "Tj", "ET"]
        );

        let tr = ops.iter().find(|op| op.operator == "Tr").unwrap();
        assert_eq!(tr.operands[0].as_i64().unwrap(), 3);
        let tz = ops.iter().find(|op| op.operator == "Tz").unwrap();
        assert_eq!(tz.operands[0].as_float().unwrap(), 300.0);
    }

    #[test]
    fn test_uncompressed_streams_have_no_filter() {
        let mut page = OutputPage::new(
            100.0,
            100.0,
            StandardFont::Helvetica,
            PdfOptions::new().with_compression(false).reproducible(),
        )
        .unwrap();
        page.draw_background(&DynamicImage::new_luma8(1, 1)).unwrap();
        let sealed = page.seal().unwrap();

        let doc = Document::load_mem(sealed.bytes()).unwrap();
        let has_filter = doc
            .objects
            .values()
            .filter_map(|obj| obj.as_stream().ok())
            .any(|stream| stream.dict.has(b"Filter"));
        assert!(!has_filter);
    }

    #[test]
    fn test_info_dictionary() {
        let options = PdfOptions::new().with_title("Scan").reproducible();
        let page = OutputPage::new(10.0, 10.0, StandardFont::Courier, options).unwrap();
        let info = page.info_dictionary();
        assert!(info.has(b"Producer"));
        assert!(info.has(b"Title"));
        assert!(!info.has(b"CreationDate"));
    }

    #[test]
    fn test_info_dictionary_fixed_date_and_producer() {
        use chrono::TimeZone;

        let at = chrono::Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let options = PdfOptions::new()
            .with_producer("scanner-pipeline 2")
            .with_timestamp(crate::render::Timestamp::At(at));
        let page = OutputPage::new(10.0, 10.0, StandardFont::Courier, options).unwrap();
        let info = page.info_dictionary();

        assert_eq!(
            info.get(b"Producer").unwrap().as_str().unwrap(),
            b"scanner-pipeline 2"
        );
        assert_eq!(
            info.get(b"CreationDate").unwrap().as_str().unwrap(),
            b"D:20240309140507+00'00'"
        );
        assert!(!info.has(b"Title"));
    }

    #[test]
    fn test_rejects_empty_page() {
        assert!(OutputPage::new(0.0, 792.0, StandardFont::Courier, PdfOptions::new()).is_err());
    }

    #[test]
    fn test_save_writes_file_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("page.pdf");
        let page = OutputPage::new(72.0, 72.0, StandardFont::Courier, PdfOptions::new()).unwrap();
        page.seal().unwrap().save(&out).unwrap();

        assert!(out.exists());
        assert!(!dir.path().join("page.pdf.partial").exists());
        assert!(std::fs::read(&out).unwrap().starts_with(b"%PDF-1.4"));
    }

    #[test]
    fn test_save_to_missing_directory_fails_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("missing").join("page.pdf");
        let page = OutputPage::new(72.0, 72.0, StandardFont::Courier, PdfOptions::new()).unwrap();
        assert!(matches!(page.seal().unwrap().save(&out), Err(Error::Io(_))));
        assert!(!out.exists());
    }
}
