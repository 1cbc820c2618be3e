//! [`ScaleHost`] over an `fos_dom::Document`

use std::time::Duration;

use fos_dom::{Display, Document, Length, NodeId, Size};

use crate::ScaleHost;

impl ScaleHost for Document {
    type Node = NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        // The document node is not an element; stop below it.
        Document::parent(self, node).filter(|&p| self.element(p).is_some())
    }

    fn is_body(&self, node: NodeId) -> bool {
        node == self.body() || node == self.document_element()
    }

    fn is_hidden(&self, node: NodeId) -> bool {
        self.style(node).is_some_and(|s| s.is_display_none())
    }

    fn set_hidden(&mut self, node: NodeId, hidden: bool) {
        if let Some(style) = self.style_mut(node) {
            style.display = Some(if hidden { Display::None } else { Display::Block });
        }
    }

    fn measure(&self, node: NodeId) -> Size {
        self.content_size(node)
    }

    fn is_complete(&self, image: NodeId) -> bool {
        self.is_image_complete(image)
    }

    fn clear_dimensions(&mut self, image: NodeId) {
        // Presentational attributes would otherwise win over `auto`.
        for attr in ["width", "height"] {
            let _ = self.remove_attribute(image, attr);
        }
        if let Some(style) = self.style_mut(image) {
            style.width = Some(Length::Auto);
            style.height = Some(Length::Auto);
            style.margin_left = None;
            style.margin_top = None;
        }
    }

    fn set_width(&mut self, node: NodeId, px: f64) {
        if let Some(style) = self.style_mut(node) {
            style.width = Some(Length::Px(px));
        }
    }

    fn set_height(&mut self, node: NodeId, px: f64) {
        if let Some(style) = self.style_mut(node) {
            style.height = Some(Length::Px(px));
        }
    }

    fn set_margins(&mut self, node: NodeId, left: f64, top: f64) {
        if let Some(style) = self.style_mut(node) {
            style.margin_left = Some(left);
            style.margin_top = Some(top);
        }
    }

    fn set_opacity(&mut self, node: NodeId, opacity: f32) {
        Document::set_opacity(self, node, opacity);
    }

    fn fade_in(&mut self, node: NodeId, duration: Duration) {
        self.animate_opacity(node, 1.0, duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ScaleConfig, scale};

    fn gallery(doc: &mut Document, frame_css: (&str, &str), natural: (f64, f64)) -> (NodeId, NodeId) {
        let frame = doc.create_element("div");
        doc.append_child(doc.body(), frame).unwrap();
        doc.set_style(frame, "width", frame_css.0).unwrap();
        doc.set_style(frame, "height", frame_css.1).unwrap();

        let img = doc.create_image("photo.jpg");
        doc.append_child(frame, img).unwrap();
        doc.finish_image_load(img, natural.0, natural.1).unwrap();
        (frame, img)
    }

    #[test]
    fn test_scale_writes_inline_style() {
        let mut doc = Document::new(1000.0, 800.0);
        let (frame, img) = gallery(&mut doc, ("400px", "200px"), (800.0, 200.0));

        scale(&mut doc, img, frame, &ScaleConfig::default());

        assert_eq!(doc.content_size(img), Size::new(800.0, 200.0));
        assert_eq!(
            doc.style_text(img),
            "width: auto; height: 200px; margin-left: -200px; margin-top: 0px"
        );
        assert_eq!(doc.opacity(frame), 1.0);
    }

    #[test]
    fn test_presentational_attributes_are_cleared() {
        let mut doc = Document::new(1000.0, 800.0);
        let (frame, img) = gallery(&mut doc, ("400px", "200px"), (800.0, 200.0));
        doc.set_attribute(img, "width", "50").unwrap();
        doc.set_attribute(img, "height", "50").unwrap();

        scale(&mut doc, img, frame, &ScaleConfig::default().fit());

        assert_eq!(doc.get_attribute(img, "width"), None);
        assert_eq!(doc.content_size(img), Size::new(400.0, 100.0));
    }

    #[test]
    fn test_parent_stops_at_document_element() {
        let doc = Document::default();
        let html = doc.document_element();

        assert_eq!(ScaleHost::parent(&doc, doc.body()), Some(html));
        assert_eq!(ScaleHost::parent(&doc, html), None);
        assert!(doc.is_body(html));
    }

    #[test]
    fn test_hidden_tab_is_measured_and_restored() {
        let mut doc = Document::new(1000.0, 800.0);
        let tab = doc.create_element("section");
        doc.append_child(doc.body(), tab).unwrap();
        doc.set_style(tab, "display", "none").unwrap();

        let frame = doc.create_element("div");
        doc.append_child(tab, frame).unwrap();
        doc.set_style(frame, "height", "300px").unwrap();
        let img = doc.create_image("tab.jpg");
        doc.append_child(frame, img).unwrap();
        doc.finish_image_load(img, 500.0, 500.0).unwrap();

        let outcome = scale(&mut doc, img, frame, &ScaleConfig::default());

        assert!(outcome.is_scaled());
        // Fill of a square into 1000x300 pins the width.
        assert_eq!(doc.style(img).unwrap().width, Some(Length::Px(1000.0)));
        assert_eq!(doc.style(tab).unwrap().display, Some(Display::None));
        assert_eq!(doc.content_size(img), Size::ZERO);
    }
}
