//! DOM operation errors

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DomError {
    /// Node not found
    #[error("node {0} not found")]
    NotFound(NodeId),
    /// Node exists but is not an element
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),
    /// Node exists but is not an image element
    #[error("node {0} is not an image")]
    NotAnImage(NodeId),
    /// Hierarchy error (e.g., inserting an ancestor into its descendant)
    #[error("hierarchy request error: cannot insert {child} into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    /// Selector text could not be parsed
    #[error("invalid selector {selector:?}: {reason}")]
    InvalidSelector { selector: String, reason: String },
    /// Inline style value could not be parsed
    #[error("invalid value {value:?} for style property {property:?}")]
    InvalidStyle { property: String, value: String },
}

impl DomError {
    pub(crate) fn selector(selector: &str, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.into(),
        }
    }
}
