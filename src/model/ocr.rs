//! hOCR element tree and bounding boxes.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// `bbox x0 y0 x1 y1` inside an hOCR `title` attribute.
fn bbox_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"bbox((?:\s+[0-9]+){4})").expect("bbox pattern is valid"))
}

/// An axis-aligned box in OCR pixel space, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

/// Why an element's bounding box could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BBoxIssue {
    /// The element has no `title` attribute.
    MissingTitle,
    /// The `title` has no `bbox` property with four integers.
    NoBBoxProperty,
    /// A coordinate does not fit in 32 bits.
    OutOfRange,
    /// `x1 < x0` or `y1 < y0`.
    Inverted,
}

impl std::fmt::Display for BBoxIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let msg = match self {
            BBoxIssue::MissingTitle => "missing title attribute",
            BBoxIssue::NoBBoxProperty => "title has no bbox property",
            BBoxIssue::OutOfRange => "bbox coordinate out of range",
            BBoxIssue::Inverted => "bbox corners are inverted",
        };
        f.write_str(msg)
    }
}

impl BBox {
    /// Create a box. Corners are taken as given.
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Read the `bbox` property out of an hOCR `title` attribute.
    ///
    /// Other properties (`x_wconf`, `baseline`, ...) are ignored; the first
    /// `bbox` wins.
    pub fn from_title(title: &str) -> Result<Self, BBoxIssue> {
        let caps = bbox_pattern()
            .captures(title)
            .ok_or(BBoxIssue::NoBBoxProperty)?;

        let mut coords = [0u32; 4];
        for (slot, raw) in coords.iter_mut().zip(caps[1].split_whitespace()) {
            *slot = raw.parse().map_err(|_| BBoxIssue::OutOfRange)?;
        }
        let [x0, y0, x1, y1] = coords;

        if x1 < x0 || y1 < y0 {
            return Err(BBoxIssue::Inverted);
        }
        Ok(Self::new(x0, y0, x1, y1))
    }

    /// Horizontal extent in OCR pixels.
    pub fn width(&self) -> u32 {
        self.x1.saturating_sub(self.x0)
    }

    /// Vertical extent in OCR pixels.
    pub fn height(&self) -> u32 {
        self.y1.saturating_sub(self.y0)
    }

    /// True if either extent is zero.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// One element of a parsed hOCR document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OcrElement {
    /// Tag name without namespace
    pub name: String,

    /// Namespace URI, if the tag had one
    pub namespace: Option<String>,

    /// Attributes in document order (names without namespace)
    pub attributes: Vec<(String, String)>,

    /// Text before the first child element
    pub text: Option<String>,

    /// Text after this element's end tag, before the next sibling
    pub tail: Option<String>,

    /// Child elements in document order
    pub children: Vec<OcrElement>,
}

impl OcrElement {
    /// Create an element with the given local name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Add an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Set the `class` attribute.
    pub fn with_class(self, class: impl Into<String>) -> Self {
        self.with_attribute("class", class)
    }

    /// Set the `title` attribute to `bbox x0 y0 x1 y1`.
    pub fn with_bbox(self, bbox: BBox) -> Self {
        self.with_attribute(
            "title",
            format!("bbox {} {} {} {}", bbox.x0, bbox.y0, bbox.x1, bbox.y1),
        )
    }

    /// Set the leading text.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the trailing text.
    pub fn with_tail(mut self, tail: impl Into<String>) -> Self {
        self.tail = Some(tail.into());
        self
    }

    /// Append a child element.
    pub fn with_child(mut self, child: OcrElement) -> Self {
        self.children.push(child);
        self
    }

    /// Look up an attribute value.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// The raw `class` attribute.
    pub fn class(&self) -> Option<&str> {
        self.attribute("class")
    }

    /// Check whether any class token equals `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.class()
            .map(|c| c.split_whitespace().any(|token| token == class))
            .unwrap_or(false)
    }

    /// The bounding box from the `title` attribute.
    pub fn bbox(&self) -> Result<BBox, BBoxIssue> {
        let title = self.attribute("title").ok_or(BBoxIssue::MissingTitle)?;
        BBox::from_title(title)
    }

    /// Text to place in the invisible layer.
    ///
    /// Leaf elements (words) give their own text with trailing whitespace
    /// stripped. Elements with children (lines) give the text of all
    /// descendants with whitespace runs collapsed to single spaces.
    pub fn overlay_text(&self) -> String {
        if self.children.is_empty() {
            return self.text.as_deref().unwrap_or("").trim_end().to_string();
        }

        let mut raw = String::new();
        self.collect_text(&mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            child.collect_text(out);
            if let Some(tail) = &child.tail {
                out.push_str(tail);
            }
        }
    }

    /// Visit every descendant (not `self`) in depth-first document order.
    pub fn descendants(&self) -> Vec<&OcrElement> {
        let mut out = Vec::new();
        let mut stack: Vec<&OcrElement> = self.children.iter().rev().collect();
        while let Some(element) = stack.pop() {
            out.push(element);
            stack.extend(element.children.iter().rev());
        }
        out
    }
}

/// A parsed hOCR document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrDocument {
    /// Namespace declared on the root element, applied to every lookup
    pub namespace: Option<String>,

    /// Root element (normally `html`)
    pub root: OcrElement,
}

impl OcrDocument {
    /// Wrap a root element; its namespace becomes the document namespace.
    pub fn new(root: OcrElement) -> Self {
        Self {
            namespace: root.namespace.clone(),
            root,
        }
    }

    /// Count elements (any tag) carrying the given class.
    pub fn count_class(&self, class: &str) -> usize {
        self.root
            .descendants()
            .into_iter()
            .filter(|e| e.has_class(class))
            .count()
    }
}
