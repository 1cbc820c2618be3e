//! DOM Events
//!
//! Listener registry for `load` and `resize`. Handlers receive the
//! document mutably, so the registry hands a handler out for the duration
//! of its call and takes it back afterwards.

use std::fmt;
use std::time::Duration;

use crate::{Document, NodeId};

/// Event type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Resource finished loading
    Load,
    /// Viewport size changed
    Resize,
}

impl EventType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Resize => "resize",
        }
    }
}

/// Where a listener is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The window / viewport
    Window,
    /// A node in the document
    Node(NodeId),
}

/// A dispatched event
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub event_type: EventType,
    pub target: EventTarget,
    /// Document clock at dispatch
    pub timestamp: Duration,
}

/// Listener registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Event callback
pub type EventHandler = Box<dyn FnMut(&mut Document, &Event)>;

struct Listener {
    id: ListenerId,
    target: EventTarget,
    event_type: EventType,
    once: bool,
    /// `None` while the handler is running
    handler: Option<EventHandler>,
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("id", &self.id)
            .field("target", &self.target)
            .field("event_type", &self.event_type)
            .field("once", &self.once)
            .finish_non_exhaustive()
    }
}

/// Registered listeners, in registration order
#[derive(Debug, Default)]
pub(crate) struct ListenerRegistry {
    next_id: u64,
    listeners: Vec<Listener>,
}

impl ListenerRegistry {
    pub fn add(
        &mut self,
        target: EventTarget,
        event_type: EventType,
        once: bool,
        handler: EventHandler,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push(Listener {
            id,
            target,
            event_type,
            once,
            handler: Some(handler),
        });
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    pub fn contains(&self, id: ListenerId) -> bool {
        self.listeners.iter().any(|l| l.id == id)
    }

    /// Snapshot of listeners for a dispatch
    pub fn matching(&self, target: EventTarget, event_type: EventType) -> Vec<ListenerId> {
        self.listeners
            .iter()
            .filter(|l| l.target == target && l.event_type == event_type)
            .map(|l| l.id)
            .collect()
    }

    /// Take a handler out for invocation. One-shot listeners are
    /// unregistered here, before they run.
    pub fn take(&mut self, id: ListenerId) -> Option<(EventHandler, bool)> {
        let index = self.listeners.iter().position(|l| l.id == id)?;
        let once = self.listeners[index].once;
        if once {
            let listener = self.listeners.remove(index);
            listener.handler.map(|h| (h, true))
        } else {
            self.listeners[index].handler.take().map(|h| (h, false))
        }
    }

    /// Return a handler after invocation, unless it was removed meanwhile
    pub fn restore(&mut self, id: ListenerId, handler: EventHandler) {
        if let Some(listener) = self.listeners.iter_mut().find(|l| l.id == id) {
            listener.handler = Some(handler);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn count_for(&self, target: EventTarget) -> usize {
        self.listeners.iter().filter(|l| l.target == target).count()
    }
}
