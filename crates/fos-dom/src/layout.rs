//! Layout measurement
//!
//! Just enough block layout to answer "how big is this element's content
//! box": explicit and percentage sizes, block width fill, auto heights
//! from in-flow children, and replaced-element (image) sizing that keeps
//! the natural aspect ratio. Widths depend only on ancestors and heights
//! on widths plus descendants, so measurement never cycles.

use crate::{DomTree, ElementData, ImageState, Length, Node, NodeData, NodeId};

/// Width/height pair in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Both dimensions positive and finite
    pub fn is_measurable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Measures nodes of a tree against a viewport
pub(crate) struct Layout<'a> {
    pub tree: &'a DomTree,
    pub viewport: Size,
    /// `<html>` and `<body>` fill the viewport
    pub roots: [NodeId; 2],
}

impl Layout<'_> {
    /// Whether the node and every ancestor are displayed
    pub fn is_rendered(&self, node: NodeId) -> bool {
        let hidden = |id: NodeId| {
            self.tree
                .element(id)
                .is_some_and(|el| el.style.is_display_none())
        };
        self.tree.get(node).is_some() && !hidden(node) && !self.tree.ancestors(node).any(hidden)
    }

    /// Content-box size of a node
    pub fn content_size(&self, node: NodeId) -> Size {
        if !self.is_rendered(node) {
            return Size::ZERO;
        }
        match self.tree.get(node).map(|n| &n.data) {
            Some(NodeData::Document) => self.viewport,
            Some(NodeData::Element(_)) => Size::new(self.width(node), self.height(node)),
            _ => Size::ZERO,
        }
    }

    fn element(&self, node: NodeId) -> Option<&ElementData> {
        self.tree.element(node)
    }

    /// Content width of the containing block
    fn containing_width(&self, node: NodeId) -> f64 {
        match self.tree.parent(node) {
            Some(parent) if self.tree.get(parent).is_some_and(Node::is_element) => {
                self.width(parent)
            }
            _ => self.viewport.width,
        }
    }

    /// Height of the containing block if it does not depend on content
    fn containing_definite_height(&self, node: NodeId) -> Option<f64> {
        match self.tree.parent(node) {
            Some(parent) if self.tree.get(parent).is_some_and(Node::is_element) => {
                self.definite_height(parent)
            }
            _ => Some(self.viewport.height),
        }
    }

    fn definite_height(&self, node: NodeId) -> Option<f64> {
        let el = self.element(node)?;
        match el.style.height {
            Some(Length::Px(v)) => Some(v),
            Some(Length::Percent(p)) => self.containing_definite_height(node).map(|h| h * p / 100.0),
            _ if el.is_image() => Some(self.image_size(node, el).1),
            _ if self.roots.contains(&node) => Some(self.viewport.height),
            _ => None,
        }
    }

    fn width(&self, node: NodeId) -> f64 {
        let Some(el) = self.element(node) else {
            return 0.0;
        };
        if el.is_image() {
            return self.image_size(node, el).0;
        }
        if self.roots.contains(&node) && el.style.width.is_none() {
            return self.viewport.width;
        }
        let basis = self.containing_width(node);
        el.style
            .width
            .and_then(|w| w.resolve(basis))
            .unwrap_or(basis)
            .max(0.0)
    }

    fn height(&self, node: NodeId) -> f64 {
        if let Some(h) = self.definite_height(node) {
            return h.max(0.0);
        }
        self.tree
            .children(node)
            .iter()
            .filter(|&&child| self.is_rendered(child))
            .filter_map(|&child| self.element(child).map(|el| (child, el)))
            .map(|(child, el)| self.height(child) + el.style.margin_top.unwrap_or(0.0))
            .sum::<f64>()
            .max(0.0)
    }

    /// Replaced-element sizing: explicit dimensions win, a single explicit
    /// dimension scales the other by the natural aspect ratio.
    fn image_size(&self, node: NodeId, el: &ElementData) -> (f64, f64) {
        let Some(image) = &el.image else {
            return (0.0, 0.0);
        };
        if image.state != ImageState::Complete || !image.natural.is_measurable() {
            return (0.0, 0.0);
        }
        let natural = image.natural;

        let explicit_width = match el.style.width {
            Some(len) => len.resolve(self.containing_width(node)),
            None => attr_px(el, "width"),
        };
        let explicit_height = match el.style.height {
            Some(Length::Percent(p)) => self.containing_definite_height(node).map(|h| h * p / 100.0),
            Some(len) => len.resolve(0.0),
            None => attr_px(el, "height"),
        };

        match (explicit_width, explicit_height) {
            (Some(w), Some(h)) => (w, h),
            (Some(w), None) => (w, w * natural.height / natural.width),
            (None, Some(h)) => (h * natural.width / natural.height, h),
            (None, None) => (natural.width, natural.height),
        }
    }
}

/// Presentational `width`/`height` attribute, in px
fn attr_px(el: &ElementData, name: &str) -> Option<f64> {
    el.get_attr(name)?
        .trim()
        .trim_end_matches("px")
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite() && *v >= 0.0)
}
