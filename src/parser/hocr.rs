//! hOCR loading backed by roxmltree.
//!
//! roxmltree borrows its input, so the tree is copied into owned
//! [`OcrElement`]s once and the source text can be dropped.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::Result;
use crate::model::{OcrDocument, OcrElement};

/// Parse hOCR markup from a file.
pub fn load_hocr_file<P: AsRef<Path>>(path: P) -> Result<OcrDocument> {
    let file = File::open(path.as_ref())?;
    load_hocr_reader(BufReader::new(file))
}

/// Parse hOCR markup from a reader.
pub fn load_hocr_reader<R: Read>(mut reader: R) -> Result<OcrDocument> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_hocr(&text)
}

/// Parse hOCR markup from a string.
///
/// Tesseract writes an XHTML DOCTYPE, so DTDs are allowed. The namespace
/// of the root element (if any) is recorded and later applied to every
/// element lookup.
///
/// # Example
///
/// ```
/// let doc = hocrpdf::parse_hocr(
///     "<html><body><div class='ocr_page' title='bbox 0 0 2550 3300'/></body></html>",
/// )
/// .unwrap();
/// assert_eq!(doc.count_class("ocr_page"), 1);
/// ```
pub fn parse_hocr(text: &str) -> Result<OcrDocument> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let xml = roxmltree::Document::parse_with_options(text, options)?;

    let root = xml.root_element();
    if root.tag_name().name() != "html" {
        log::warn!(
            "hOCR root element is <{}>, expected <html>",
            root.tag_name().name()
        );
    }

    let document = OcrDocument::new(convert_element(root));
    log::debug!(
        "Parsed hOCR (namespace: {})",
        document.namespace.as_deref().unwrap_or("none")
    );
    Ok(document)
}

fn convert_element(node: roxmltree::Node<'_, '_>) -> OcrElement {
    let tag = node.tag_name();
    let mut element = OcrElement::new(tag.name());
    element.namespace = tag.namespace().map(str::to_string);
    element.attributes = node
        .attributes()
        .map(|attr| (attr.name().to_string(), attr.value().to_string()))
        .collect();

    let mut leading = String::new();
    let mut seen_child = false;
    for child in node.children() {
        if child.is_element() {
            seen_child = true;
            element.children.push(convert_element(child));
        } else if child.is_text() {
            let text = child.text().unwrap_or("");
            match element.children.last_mut() {
                Some(last) if seen_child => last.tail.get_or_insert_with(String::new).push_str(text),
                _ => leading.push_str(text),
            }
        }
    }

    if !leading.is_empty() {
        element.text = Some(leading);
    }
    element
}
