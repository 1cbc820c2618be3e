//! fOS DOM - Document Object Model
//!
//! Arena-backed DOM tree with the host primitives page utilities need:
//! inline style, block layout measurement, image resources, load/resize
//! events, timers and opacity animations.
//!
//! Time never advances on its own. The embedder drives it through
//! [`Document::advance`], which fires due timers and ticks animations.

mod animation;
mod document;
mod error;
mod events;
mod image;
mod layout;
mod node;
mod selector;
mod style;
mod timers;
mod tree;

pub use animation::{OpacityAnimation, Timeline};
pub use document::{Document, Quirks};
pub use error::{DomError, DomResult};
pub use events::{Event, EventHandler, EventTarget, EventType, ListenerId};
pub use image::{ImageData, ImageState};
pub use layout::Size;
pub use node::{ElementData, Node, NodeData};
pub use selector::{Selector, SelectorList};
pub use style::{Display, InlineStyle, Length, Overflow};
pub use timers::{TimerHandler, TimerId};
pub use tree::{Ancestors, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Root (document) node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Arena index of this node
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
