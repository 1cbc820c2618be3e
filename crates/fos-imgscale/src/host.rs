//! Host environment seam
//!
//! The scale algorithm only measures, walks ancestors and writes a few
//! style properties. [`ScaleHost`] is that surface; `fos_dom::Document`
//! implements it in `dom.rs`, tests implement it with a mock.

use std::fmt::Debug;
use std::time::Duration;

use fos_dom::Size;

/// Measurement and style primitives consumed by [`scale`](crate::scale())
pub trait ScaleHost {
    /// Element handle
    type Node: Copy + Eq + Debug;

    /// Parent element; `None` above the document element
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Whether the hidden-ancestor walk stops here (the document body)
    fn is_body(&self, node: Self::Node) -> bool;

    /// Whether the node itself is set to `display: none`
    fn is_hidden(&self, node: Self::Node) -> bool;

    /// Force the node hidden (`display: none`) or visible (`display: block`)
    fn set_hidden(&mut self, node: Self::Node, hidden: bool);

    /// Rendered content-box size
    fn measure(&self, node: Self::Node) -> Size;

    /// Whether the image has finished loading
    fn is_complete(&self, image: Self::Node) -> bool;

    /// Drop explicit width/height (attributes and style) and margin
    /// offsets so the image measures at its natural size
    fn clear_dimensions(&mut self, image: Self::Node);

    fn set_width(&mut self, node: Self::Node, px: f64);

    fn set_height(&mut self, node: Self::Node, px: f64);

    /// Set `margin-left` / `margin-top` in px
    fn set_margins(&mut self, node: Self::Node, left: f64, top: f64);

    /// Set opacity immediately
    fn set_opacity(&mut self, node: Self::Node, opacity: f32);

    /// Animate opacity from its current value to 1
    fn fade_in(&mut self, node: Self::Node, duration: Duration);
}
