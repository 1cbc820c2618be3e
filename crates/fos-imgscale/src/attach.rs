//! Attaching the scaler to a document
//!
//! [`attach`] resolves each image's container once, hides the container
//! until the image is ready, and wires up load and resize listeners. The
//! returned [`ScaleHandle`] owns every listener and timer it registered,
//! and [`ScaleHandle::detach`] removes them all.

use std::cell::RefCell;
use std::rc::Rc;

use fos_dom::{
    Document, EventHandler, EventTarget, EventType, ListenerId, NodeId, Overflow, SelectorList,
};

use crate::compat;
use crate::debounce::ResizeDebounce;
use crate::scale::{Arrival, scale_image};
use crate::ScaleConfig;

/// Which images to manage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Targets {
    /// Every element matching a selector, in document order
    Selector(String),
    /// An explicit element list
    Elements(Vec<NodeId>),
}

impl From<&str> for Targets {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for Targets {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<Vec<NodeId>> for Targets {
    fn from(nodes: Vec<NodeId>) -> Self {
        Self::Elements(nodes)
    }
}

impl From<&[NodeId]> for Targets {
    fn from(nodes: &[NodeId]) -> Self {
        Self::Elements(nodes.to_vec())
    }
}

impl From<NodeId> for Targets {
    fn from(node: NodeId) -> Self {
        Self::Elements(vec![node])
    }
}

/// A managed image and the container it is scaled against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaleTarget {
    pub image: NodeId,
    pub container: NodeId,
}

/// State shared between the handle and its listeners
#[derive(Debug)]
struct Managed {
    config: ScaleConfig,
    targets: Vec<ScaleTarget>,
    /// Load listeners that have not fired yet, by image
    pending: Vec<(NodeId, ListenerId)>,
    debounce: ResizeDebounce,
}

impl Managed {
    fn new(config: ScaleConfig) -> Self {
        Self {
            config,
            targets: Vec::new(),
            pending: Vec::new(),
            debounce: ResizeDebounce::default(),
        }
    }

    /// Targets whose image is no longer waiting for `load`
    fn ready_targets(&self) -> Vec<ScaleTarget> {
        self.targets
            .iter()
            .filter(|t| !self.pending.iter().any(|&(img, _)| img == t.image))
            .copied()
            .collect()
    }
}

/// Handle to an attached scaler
#[derive(Debug)]
pub struct ScaleHandle {
    shared: Rc<RefCell<Managed>>,
    resize_listener: Option<ListenerId>,
}

impl ScaleHandle {
    fn empty(config: ScaleConfig) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Managed::new(config))),
            resize_listener: None,
        }
    }

    /// Managed `(image, container)` pairs, in attach order
    pub fn targets(&self) -> Vec<ScaleTarget> {
        self.shared.borrow().targets.clone()
    }

    /// Images still waiting for their `load` event
    pub fn pending_loads(&self) -> usize {
        self.shared.borrow().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.borrow().targets.is_empty()
    }

    pub fn config(&self) -> ScaleConfig {
        self.shared.borrow().config.clone()
    }

    /// Whether a debounced rescale is scheduled
    pub fn rescale_pending(&self) -> bool {
        self.shared.borrow().debounce.is_pending()
    }

    /// Re-run the scale pass for every loaded target now; returns how many
    /// images were scaled
    pub fn rescale(&self, doc: &mut Document) -> usize {
        rescale_all(doc, &self.shared)
    }

    /// Remove the resize listener, pending load listeners and any pending
    /// debounce timer. Styles already written stay as they are.
    pub fn detach(self, doc: &mut Document) {
        let mut removed = 0;
        if let Some(id) = self.resize_listener {
            removed += usize::from(doc.remove_event_listener(id));
        }

        let mut managed = self.shared.borrow_mut();
        for (_, id) in managed.pending.drain(..) {
            removed += usize::from(doc.remove_event_listener(id));
        }
        managed.debounce.cancel(doc);
        managed.targets.clear();

        tracing::debug!("Scaler detached, {} listener(s) removed", removed);
    }
}

/// Manage the scaling of `targets` within `doc`.
///
/// Elements that are not images, images without a container and
/// duplicates are skipped. Nothing here fails: an invalid selector
/// yields an empty handle.
pub fn attach(doc: &mut Document, targets: impl Into<Targets>, config: ScaleConfig) -> ScaleHandle {
    let candidates = match targets.into() {
        Targets::Selector(selector) => doc.query_selector_all(&selector).unwrap_or_else(|err| {
            tracing::warn!("Ignoring scale targets: {}", err);
            Vec::new()
        }),
        Targets::Elements(nodes) => nodes,
    };

    let container_selector = match config.container_selector.as_deref().map(SelectorList::parse) {
        Some(Ok(list)) => Some(list),
        Some(Err(err)) => {
            tracing::warn!("Container selector rejected, no image will be scaled: {}", err);
            return ScaleHandle::empty(config);
        }
        None => None,
    };

    let shared = Rc::new(RefCell::new(Managed::new(config.clone())));

    for image in candidates {
        if doc.image(image).is_none() {
            tracing::debug!("Skipping {}: not an image", image);
            continue;
        }
        if shared.borrow().targets.iter().any(|t| t.image == image) {
            continue;
        }
        let container = match &container_selector {
            Some(list) => list.closest_ancestor(doc.tree(), image),
            None => doc.parent(image).filter(|&p| doc.element(p).is_some()),
        };
        let Some(container) = container else {
            tracing::debug!("Skipping {}: no container", image);
            continue;
        };

        if let Some(style) = doc.style_mut(container) {
            style.overflow = Some(Overflow::Hidden);
        }
        doc.set_opacity(container, 0.0);

        let target = ScaleTarget { image, container };
        shared.borrow_mut().targets.push(target);

        if doc.is_image_complete(image) {
            scale_image(doc, image, container, &config, Arrival::Cached);
        } else {
            let id = doc.add_event_listener(
                EventTarget::Node(image),
                EventType::Load,
                true,
                on_load(&shared, target),
            );
            shared.borrow_mut().pending.push((image, id));
            compat::rekick_cached_load(doc, image);
        }
    }

    let (managed, pending) = {
        let m = shared.borrow();
        (m.targets.len(), m.pending.len())
    };
    let resize_listener = (config.rescale_on_resize && managed > 0).then(|| {
        doc.add_event_listener(EventTarget::Window, EventType::Resize, false, on_resize(&shared))
    });

    tracing::debug!(
        "Scaler attached to {} image(s), {} waiting for load ({})",
        managed,
        pending,
        config.scale
    );
    ScaleHandle {
        shared,
        resize_listener,
    }
}

fn on_load(shared: &Rc<RefCell<Managed>>, target: ScaleTarget) -> EventHandler {
    let shared = Rc::clone(shared);
    Box::new(move |doc, _event| {
        let config = {
            let mut managed = shared.borrow_mut();
            managed.pending.retain(|&(img, _)| img != target.image);
            managed.config.clone()
        };
        scale_image(doc, target.image, target.container, &config, Arrival::Fetched);
    })
}

fn on_resize(shared: &Rc<RefCell<Managed>>) -> EventHandler {
    let shared = Rc::clone(shared);
    Box::new(move |doc, _event| {
        let delay = shared.borrow().config.resize_debounce();
        if delay.is_zero() {
            rescale_all(doc, &shared);
            return;
        }
        let fire = Rc::clone(&shared);
        shared.borrow_mut().debounce.rearm(
            doc,
            delay,
            Box::new(move |doc| {
                fire.borrow_mut().debounce.fired();
                rescale_all(doc, &fire);
            }),
        );
    })
}

fn rescale_all(doc: &mut Document, shared: &Rc<RefCell<Managed>>) -> usize {
    let (targets, config) = {
        let managed = shared.borrow();
        (managed.ready_targets(), managed.config.clone())
    };
    let mut scaled = 0;
    for t in &targets {
        if scale_image(doc, t.image, t.container, &config, Arrival::Rescale).is_scaled() {
            scaled += 1;
        }
    }
    tracing::debug!("Rescaled {} of {} image(s)", scaled, targets.len());
    scaled
}
