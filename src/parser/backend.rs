//! Markup access abstraction.
//!
//! Geometry and rendering only need two capabilities from the hOCR tree:
//! walk elements (all of them, or by local tag name, under the document's
//! namespace) and read attributes. These traits isolate that from the concrete XML library.

use crate::model::{BBox, BBoxIssue, OcrDocument, OcrElement};

/// Read access to one markup element.
pub trait MarkupNode {
    /// Attribute value by name.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Text for the invisible layer.
    fn overlay_text(&self) -> String;

    /// Check whether any token of the `class` attribute equals `class`.
    fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .map(|c| c.split_whitespace().any(|token| token == class))
            .unwrap_or(false)
    }

    /// Check whether any class token is in `classes`.
    fn has_any_class(&self, classes: &[String]) -> bool {
        classes.iter().any(|class| self.has_class(class))
    }

    /// Bounding box from the `title` attribute.
    fn bbox(&self) -> Result<BBox, BBoxIssue> {
        let title = self.attribute("title").ok_or(BBoxIssue::MissingTitle)?;
        BBox::from_title(title)
    }
}

/// A markup tree searchable by local tag name.
pub trait MarkupTree {
    type Node: MarkupNode;

    /// All elements with this local name, in depth-first document order.
    ///
    /// Only elements in the document's root namespace match, so a namespaced
    /// XHTML file and a plain HTML-ish file are both handled.
    fn elements_by_local_name(&self, tag: &str) -> Vec<&Self::Node>;

    /// Every element in the document's namespace, in depth-first document
    /// order, whatever its tag.
    fn elements(&self) -> Vec<&Self::Node>;
}

impl MarkupNode for OcrElement {
    fn attribute(&self, name: &str) -> Option<&str> {
        OcrElement::attribute(self, name)
    }

    fn overlay_text(&self) -> String {
        OcrElement::overlay_text(self)
    }
}

impl MarkupTree for OcrDocument {
    type Node = OcrElement;

    fn elements_by_local_name(&self, tag: &str) -> Vec<&OcrElement> {
        self.elements()
            .into_iter()
            .filter(|e| e.name == tag)
            .collect()
    }

    fn elements(&self) -> Vec<&OcrElement> {
        self.root
            .descendants()
            .into_iter()
            .filter(|e| e.namespace == self.namespace)
            .collect()
    }
}
