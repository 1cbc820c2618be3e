//! DOM Tree (arena-based allocation)

use crate::{DomError, DomResult, ElementData, Node, NodeData, NodeId};

/// Arena-based DOM tree
///
/// Node 0 is always the document node. Nodes are never freed; removing a
/// child only unlinks it.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// The document node
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Get element data by ID
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(Node::as_element)
    }

    /// Get mutable element data by ID
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(Node::as_element_mut)
    }

    /// Element data, or the reason the node has none
    pub fn try_element_mut(&mut self, id: NodeId) -> DomResult<&mut ElementData> {
        let node = self.get_mut(id).ok_or(DomError::NotFound(id))?;
        node.as_element_mut().ok_or(DomError::NotAnElement(id))
    }

    /// Allocate a detached element
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(Node::element(tag))
    }

    /// Allocate a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append `child` as the last child of `parent`
    ///
    /// A child that is already attached elsewhere is moved.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        let Some(parent_node) = self.get(parent) else {
            return Err(DomError::NotFound(parent));
        };
        let accepts_children = !matches!(parent_node.data, NodeData::Text(_));
        if self.get(child).is_none() {
            return Err(DomError::NotFound(child));
        }
        if !accepts_children
            || child == NodeId::ROOT
            || child == parent
            || self.ancestors(parent).any(|a| a == child)
        {
            return Err(DomError::HierarchyRequest { parent, child });
        }

        self.detach(child);
        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
        Ok(())
    }

    /// Unlink `child` from `parent`
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        if self.parent(child) != Some(parent) {
            return Err(DomError::NotFound(child));
        }
        self.detach(child);
        Ok(())
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old_parent) = self.nodes[child.index()].parent.take() {
            self.nodes[old_parent.index()].children.retain(|&c| c != child);
        }
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Children of a node in document order
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Ancestors of a node, nearest first, excluding the node itself
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.parent(id),
        }
    }

    /// Descendants of a node in document order, excluding the node itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Check whether a node is connected to the document root
    pub fn is_connected(&self, id: NodeId) -> bool {
        id == NodeId::ROOT || self.ancestors(id).any(|a| a == NodeId::ROOT)
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree holds nothing but the document node
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}

/// Iterator over a node's ancestors
#[derive(Debug)]
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.tree.parent(current);
        Some(current)
    }
}
