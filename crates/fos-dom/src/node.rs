//! DOM Node
//!
//! Nodes live in the [`DomTree`](crate::DomTree) arena and link to each
//! other through [`NodeId`]s instead of pointers.

use crate::{ImageData, InlineStyle, NodeId};

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (`None` for the document root and detached nodes)
    pub parent: Option<NodeId>,
    /// Children in document order
    pub children: Vec<NodeId>,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element(ElementData::new(tag)),
        }
    }

    /// Create a new text node
    pub fn text(content: String) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data: NodeData::Text(content),
        }
    }

    /// Create a document node
    pub fn document() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data: NodeData::Document,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag: String,
    /// Cached id attribute
    pub id: Option<String>,
    /// Cached class list
    pub classes: Vec<String>,
    /// Remaining attributes, in insertion order
    pub attrs: Vec<(String, String)>,
    /// Inline `style` declarations
    pub style: InlineStyle,
    /// Image resource, present on `<img>` elements
    pub image: Option<ImageData>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
            attrs: Vec::new(),
            style: InlineStyle::default(),
            image: None,
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute
    ///
    /// `id` and `class` also refresh the cached lookups used by selectors.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "id" => self.id = Some(value.to_string()),
            "class" => {
                self.classes = value.split_whitespace().map(str::to_string).collect();
            }
            _ => {}
        }

        if let Some(slot) = self.attrs.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value.to_string();
        } else {
            self.attrs.push((name, value.to_string()));
        }
    }

    /// Remove an attribute, returning its previous value
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "id" => self.id = None,
            "class" => self.classes.clear(),
            _ => {}
        }
        let index = self.attrs.iter().position(|(n, _)| *n == name)?;
        Some(self.attrs.remove(index).1)
    }

    /// Check the cached class list
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Add a class if it is not already present
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        self.classes.push(class.to_string());
        let joined = self.classes.join(" ");
        if let Some(slot) = self.attrs.iter_mut().find(|(n, _)| n == "class") {
            slot.1 = joined;
        } else {
            self.attrs.push(("class".to_string(), joined));
        }
    }

    /// Check if this element is an `<img>`
    #[inline]
    pub fn is_image(&self) -> bool {
        self.image.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_and_class_are_cached() {
        let mut el = ElementData::new("DIV");
        el.set_attr("id", "frame");
        el.set_attr("class", "photo  wide");

        assert_eq!(el.tag, "div");
        assert_eq!(el.id.as_deref(), Some("frame"));
        assert!(el.has_class("photo"));
        assert!(el.has_class("wide"));
        assert_eq!(el.get_attr("class"), Some("photo  wide"));
    }

    #[test]
    fn test_remove_attr() {
        let mut el = ElementData::new("img");
        el.set_attr("width", "640");
        el.set_attr("class", "hero");

        assert_eq!(el.remove_attr("width").as_deref(), Some("640"));
        assert_eq!(el.get_attr("width"), None);
        assert_eq!(el.remove_attr("width"), None);

        el.remove_attr("class");
        assert!(!el.has_class("hero"));
    }

    #[test]
    fn test_add_class_updates_attribute() {
        let mut el = ElementData::new("div");
        el.add_class("frame");
        el.add_class("frame");
        el.add_class("tall");

        assert_eq!(el.classes, vec!["frame", "tall"]);
        assert_eq!(el.get_attr("class"), Some("frame tall"));
    }
}
