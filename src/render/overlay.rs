//! Invisible text placement.
//!
//! Each selected hOCR element becomes one text run whose bottom-left corner
//! sits on its mapped box and whose horizontal scale stretches the run to the
//! box width.

use serde::Serialize;

use super::fonts::{encode_win_ansi, StandardFont};
use super::options::OverlayOptions;
use crate::error::{Result, Warning};
use crate::geometry::map_bbox;
use crate::model::{MappedBox, ResolvedGeometry};
use crate::parser::{MarkupNode, MarkupTree};

/// One invisible text run, in PDF points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextPlacement {
    /// Position among the selected elements
    pub index: usize,

    /// Text as recognized (trailing whitespace removed)
    pub text: String,

    /// WinAnsi bytes written to the content stream
    #[serde(skip)]
    pub encoded: Vec<u8>,

    /// Baseline origin, x
    pub x: f64,

    /// Baseline origin, y
    pub y: f64,

    /// Horizontal scaling in percent (`Tz`)
    pub horizontal_scale: f64,

    /// Nominal font size
    pub font_size: f64,
}

/// All placements for one page plus the elements that were skipped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Overlay {
    /// Placements in document order
    pub placements: Vec<TextPlacement>,

    /// Number of elements whose class was selected
    pub selected: usize,

    /// Diagnostics for skipped elements
    pub warnings: Vec<Warning>,
}

impl Overlay {
    /// Number of selected elements that produced no placement.
    pub fn skipped(&self) -> usize {
        self.selected - self.placements.len()
    }
}

/// Computes [`TextPlacement`]s for a page.
#[derive(Debug, Clone)]
pub struct OverlayRenderer {
    options: OverlayOptions,
    font: StandardFont,
}

impl OverlayRenderer {
    /// Create a renderer; fails on an unknown font or non-positive size.
    pub fn new(options: OverlayOptions) -> Result<Self> {
        let font = options.validate()?;
        Ok(Self { options, font })
    }

    /// The resolved font.
    pub fn font(&self) -> StandardFont {
        self.font
    }

    /// Place every selected element of `doc`, in document order.
    ///
    /// An element is selected when any of its classes is one of the
    /// configured line classes, whatever its tag (`span`, `p`, `div`).
    /// Problems are element-local: a bad element is reported and skipped and
    /// its siblings are still placed. A document where nothing matches gets
    /// a [`Warning::NoMatchingElements`].
    ///
    /// # Arguments
    ///
    /// * `doc` - Parsed markup
    /// * `geometry` - Page size and OCR resolution from the resolver
    pub fn place_all<T: MarkupTree>(&self, doc: &T, geometry: &ResolvedGeometry) -> Overlay {
        let mut overlay = Overlay::default();

        let selected = doc
            .elements()
            .into_iter()
            .filter(|node| node.has_any_class(&self.options.line_classes));

        for (index, node) in selected.enumerate() {
            overlay.selected += 1;
            match self.place(index, node, geometry) {
                Ok(placement) => overlay.placements.push(placement),
                Err(warning) => {
                    log::warn!("{}", warning);
                    overlay.warnings.push(warning);
                }
            }
        }

        if overlay.selected == 0 {
            let warning = Warning::NoMatchingElements {
                classes: self.options.line_classes.join(","),
            };
            log::warn!("{}", warning);
            overlay.warnings.push(warning);
        }

        log::debug!(
            "Placed {} of {} selected elements",
            overlay.placements.len(),
            overlay.selected
        );
        overlay
    }

    /// Place one element.
    ///
    /// Returns the warning describing why nothing was placed when the box is
    /// missing, the text is empty, or either width is zero.
    pub fn place<N: MarkupNode>(
        &self,
        index: usize,
        node: &N,
        geometry: &ResolvedGeometry,
    ) -> std::result::Result<TextPlacement, Warning> {
        let class = node.attribute("class").unwrap_or("").to_string();

        let bbox = node.bbox().map_err(|issue| Warning::MalformedElement {
            index,
            class: class.clone(),
            reason: issue.to_string(),
        })?;
        let mapped = map_bbox(&bbox, geometry).to_points();

        let text = node.overlay_text();
        let encoded = encode_win_ansi(&text);
        let natural_width = self.font.encoded_width(&encoded, self.options.font_size);

        let degenerate = |reason: &str| Warning::DegenerateScale {
            index,
            class: class.clone(),
            reason: reason.to_string(),
        };
        if text.is_empty() {
            return Err(degenerate("empty text"));
        }
        if mapped.has_zero_width() {
            return Err(degenerate("zero-width box"));
        }
        if natural_width <= 0.0 {
            return Err(degenerate("zero natural text width"));
        }

        Ok(TextPlacement {
            index,
            horizontal_scale: horizontal_scale(&mapped, natural_width),
            text,
            encoded,
            x: mapped.x,
            y: mapped.y,
            font_size: self.options.font_size,
        })
    }
}

/// Percent scale that makes text of `natural_width` points span `mapped`.
fn horizontal_scale(mapped: &MappedBox, natural_width: f64) -> f64 {
    mapped.width / natural_width * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{BBox, OcrDocument, OcrElement};

    fn letter_300() -> ResolvedGeometry {
        ResolvedGeometry::new(8.5, 11.0, 300.0, 300.0)
    }

    fn word(text: &str, bbox: BBox) -> OcrElement {
        OcrElement::new("span")
            .with_class("ocrx_word")
            .with_bbox(bbox)
            .with_text(text)
    }

    fn page(children: Vec<OcrElement>) -> OcrDocument {
        let mut line = OcrElement::new("span").with_class("ocr_line");
        line.children = children;
        OcrDocument::new(
            OcrElement::new("html")
                .with_child(OcrElement::new("div").with_class("ocr_page").with_child(line)),
        )
    }

    #[test]
    fn test_place_word_origin_and_scale() {
        let renderer = OverlayRenderer::new(OverlayOptions::default()).unwrap();
        let node = word("Hello ", BBox::new(100, 200, 400, 230));
        let placement = renderer.place(0, &node, &letter_300()).unwrap();

        assert_eq!(placement.text, "Hello");
        assert!((placement.x - 100.0 / 300.0 * 72.0).abs() < 1e-9);
        assert!((placement.y - (11.0 - 230.0 / 300.0) * 72.0).abs() < 1e-9);
        // box is 1 inch = 72pt wide, "Hello" in Courier 8 is 24pt
        assert!((placement.horizontal_scale - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_text_is_skipped() {
        let renderer = OverlayRenderer::new(OverlayOptions::default()).unwrap();
        let node = word("  \n", BBox::new(100, 200, 400, 230));
        let warning = renderer.place(3, &node, &letter_300()).unwrap_err();
        assert_eq!(
            warning,
            Warning::DegenerateScale {
                index: 3,
                class: "ocrx_word".into(),
                reason: "empty text".into(),
            }
        );
    }

    #[test]
    fn test_zero_width_box_is_skipped() {
        let renderer = OverlayRenderer::new(OverlayOptions::default()).unwrap();
        let node = word("I", BBox::new(100, 200, 100, 230));
        let warning = renderer.place(0, &node, &letter_300()).unwrap_err();
        assert!(matches!(warning, Warning::DegenerateScale { .. }));
    }

    #[test]
    fn test_missing_bbox_is_malformed() {
        let renderer = OverlayRenderer::new(OverlayOptions::default()).unwrap();
        let node = OcrElement::new("span").with_class("ocrx_word").with_text("x");
        let warning = renderer.place(0, &node, &letter_300()).unwrap_err();
        assert!(matches!(warning, Warning::MalformedElement { .. }));
    }

    #[test]
    fn test_place_all_continues_past_bad_elements() {
        let doc = page(vec![
            word("The", BBox::new(100, 200, 200, 230)),
            OcrElement::new("span").with_class("ocrx_word").with_text("lost"),
            word("", BBox::new(210, 200, 260, 230)),
            word("fox", BBox::new(270, 200, 400, 230)),
        ]);
        let renderer = OverlayRenderer::new(OverlayOptions::default()).unwrap();
        let overlay = renderer.place_all(&doc, &letter_300());

        assert_eq!(overlay.selected, 4);
        assert_eq!(overlay.skipped(), 2);
        let texts: Vec<_> = overlay.placements.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["The", "fox"]);
        assert_eq!(overlay.placements[1].index, 3);
        assert_eq!(overlay.warnings.len(), 2);
    }

    #[test]
    fn test_line_class_selection() {
        let doc = page(vec![
            word("The", BBox::new(100, 200, 200, 230)),
            word("fox", BBox::new(270, 200, 400, 230)),
        ]);
        let options = OverlayOptions::new().with_line_classes(["ocr_line"]);
        let renderer = OverlayRenderer::new(options).unwrap();
        let overlay = renderer.place_all(&doc, &letter_300());

        // the line itself has no bbox in this fixture
        assert_eq!(overlay.selected, 1);
        assert!(overlay.placements.is_empty());
        assert!(matches!(
            overlay.warnings[0],
            Warning::MalformedElement { .. }
        ));
    }

    #[test]
    fn test_paragraph_class_is_selected() {
        let doc = crate::parser::parse_hocr(
            r#"<html xmlns="http://www.w3.org/1999/xhtml"><body>
<div class="ocr_page" title="bbox 0 0 2550 3300">
<p class="ocr_par" title="bbox 10 10 400 40">Hello world</p>
</div></body></html>"#,
        )
        .unwrap();
        let options = OverlayOptions::new().with_line_classes(["ocr_par"]);
        let renderer = OverlayRenderer::new(options).unwrap();
        let overlay = renderer.place_all(&doc, &letter_300());

        assert_eq!(overlay.selected, 1);
        assert_eq!(overlay.placements.len(), 1);
        assert_eq!(overlay.placements[0].text, "Hello world");
        assert!(overlay.warnings.is_empty());
    }

    #[test]
    fn test_no_matching_class_is_reported() {
        let doc = page(vec![word("The", BBox::new(100, 200, 200, 230))]);
        let options = OverlayOptions::new().with_line_classes(["ocr_carea", "ocr_par"]);
        let renderer = OverlayRenderer::new(options).unwrap();
        let overlay = renderer.place_all(&doc, &letter_300());

        assert_eq!(overlay.selected, 0);
        assert_eq!(
            overlay.warnings,
            vec![Warning::NoMatchingElements {
                classes: "ocr_carea,ocr_par".into()
            }]
        );
    }

    #[test]
    fn test_scale_spans_box_for_proportional_font() {
        let options = OverlayOptions::new().with_font("Helvetica").with_font_size(12.0);
        let renderer = OverlayRenderer::new(options).unwrap();
        let node = word("Wide", BBox::new(0, 0, 600, 40));
        let placement = renderer.place(0, &node, &letter_300()).unwrap();

        let natural = StandardFont::Helvetica.string_width("Wide", 12.0);
        let spanned = natural * placement.horizontal_scale / 100.0;
        assert!((spanned - 144.0).abs() < 1e-9);
    }
}
