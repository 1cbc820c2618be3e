//! Document - High-level document API
//!
//! Owns the tree plus everything that happens to it over time: the
//! viewport, image resources, event listeners, timers and animations.

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::events::ListenerRegistry;
use crate::layout::Layout;
use crate::timers::TimerQueue;
use crate::{
    DomError, DomResult, DomTree, ElementData, Event, EventHandler, EventTarget, EventType,
    ImageData, ImageState, InlineStyle, ListenerId, NodeId, OpacityAnimation, SelectorList, Size,
    Timeline, TimerHandler, TimerId,
};

/// Engine behaviours that differ between environments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quirks {
    /// An image whose `src` is already in the memory cache completes
    /// without dispatching `load`.
    pub drops_cached_load_event: bool,
}

/// Deferred work run by [`Document::run_tasks`]
#[derive(Debug)]
enum Task {
    /// Complete an image from the memory cache if its `src` is unchanged
    CompleteFromCache { node: NodeId, src: String },
}

/// HTML Document
#[derive(Debug)]
pub struct Document {
    tree: DomTree,
    html: NodeId,
    body: NodeId,
    viewport: Size,
    quirks: Quirks,
    /// Natural sizes of fetched images, by `src`
    image_cache: HashMap<String, Size>,
    tasks: VecDeque<Task>,
    listeners: ListenerRegistry,
    timers: TimerQueue,
    timeline: Timeline,
    now: Duration,
}

impl Document {
    /// Create a document with an `html > body` skeleton
    pub fn new(viewport_width: f64, viewport_height: f64) -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let body = tree.create_element("body");
        // Fresh nodes under the root cannot violate the hierarchy.
        let _ = tree.append_child(tree.root(), html);
        let _ = tree.append_child(html, body);

        Self {
            tree,
            html,
            body,
            viewport: Size::new(viewport_width, viewport_height),
            quirks: Quirks::default(),
            image_cache: HashMap::new(),
            tasks: VecDeque::new(),
            listeners: ListenerRegistry::default(),
            timers: TimerQueue::default(),
            timeline: Timeline::default(),
            now: Duration::ZERO,
        }
    }

    /// Builder-style quirk configuration
    pub fn with_quirks(mut self, quirks: Quirks) -> Self {
        self.quirks = quirks;
        self
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    /// Access the DOM tree
    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    /// Access the DOM tree mutably
    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Get <html> element
    pub fn document_element(&self) -> NodeId {
        self.html
    }

    /// Get <body> element
    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Current document clock
    pub fn now(&self) -> Duration {
        self.now
    }

    // === Tree ===

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.tree.create_element(tag)
    }

    /// Create a detached `<img>` whose load is in flight
    pub fn create_image(&mut self, src: &str) -> NodeId {
        let img = self.tree.create_element("img");
        if let Some(el) = self.tree.element_mut(img) {
            el.set_attr("src", src);
            el.image = Some(ImageData::new(src));
        }
        img
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<()> {
        self.tree.append_child(parent, child)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.tree.parent(node)
    }

    pub fn element(&self, node: NodeId) -> Option<&ElementData> {
        self.tree.element(node)
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.tree.try_element_mut(node)?.set_attr(name, value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) -> DomResult<Option<String>> {
        Ok(self.tree.try_element_mut(node)?.remove_attr(name))
    }

    pub fn get_attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.tree.element(node)?.get_attr(name)
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) -> DomResult<()> {
        self.tree.try_element_mut(node)?.add_class(class);
        Ok(())
    }

    // === Selectors ===

    /// `element.matches(selector)`
    pub fn matches(&self, node: NodeId, selector: &str) -> DomResult<bool> {
        Ok(SelectorList::parse(selector)?.matches(&self.tree, node))
    }

    /// Nearest ancestor matching `selector`, excluding `node` itself
    pub fn closest_ancestor(&self, node: NodeId, selector: &str) -> DomResult<Option<NodeId>> {
        Ok(SelectorList::parse(selector)?.closest_ancestor(&self.tree, node))
    }

    /// `document.querySelectorAll(selector)`, in document order
    pub fn query_selector_all(&self, selector: &str) -> DomResult<Vec<NodeId>> {
        Ok(SelectorList::parse(selector)?.query_all(&self.tree, self.tree.root()))
    }

    // === Style ===

    pub fn style(&self, node: NodeId) -> Option<&InlineStyle> {
        self.tree.element(node).map(|el| &el.style)
    }

    pub fn style_mut(&mut self, node: NodeId) -> Option<&mut InlineStyle> {
        self.tree.element_mut(node).map(|el| &mut el.style)
    }

    /// `element.style.setProperty(property, value)`
    pub fn set_style(&mut self, node: NodeId, property: &str, value: &str) -> DomResult<()> {
        if property.trim().eq_ignore_ascii_case("opacity") {
            self.timeline.cancel(node);
        }
        self.tree.try_element_mut(node)?.style.set_property(property, value)
    }

    /// Serialized inline style, empty for non-elements
    pub fn style_text(&self, node: NodeId) -> String {
        self.style(node).map(InlineStyle::css_text).unwrap_or_default()
    }

    /// Set opacity immediately, stopping any running opacity animation
    pub fn set_opacity(&mut self, node: NodeId, opacity: f32) {
        self.timeline.cancel(node);
        if let Some(style) = self.style_mut(node) {
            style.opacity = Some(opacity.clamp(0.0, 1.0));
        }
    }

    /// Effective inline opacity (1 when unset)
    pub fn opacity(&self, node: NodeId) -> f32 {
        self.style(node).and_then(|s| s.opacity).unwrap_or(1.0)
    }

    // === Layout ===

    fn layout(&self) -> Layout<'_> {
        Layout {
            tree: &self.tree,
            viewport: self.viewport,
            roots: [self.html, self.body],
        }
    }

    /// Content-box size of a node in CSS pixels
    pub fn content_size(&self, node: NodeId) -> Size {
        self.layout().content_size(node)
    }

    /// Whether the node and all its ancestors are displayed
    pub fn is_rendered(&self, node: NodeId) -> bool {
        self.layout().is_rendered(node)
    }

    /// Change the viewport size and dispatch `resize` on the window
    pub fn resize_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Size::new(width, height);
        tracing::debug!("Viewport resized to {}", self.viewport);
        self.dispatch_event(EventTarget::Window, EventType::Resize);
    }

    // === Images ===

    pub fn image(&self, node: NodeId) -> Option<&ImageData> {
        self.tree.element(node)?.image.as_ref()
    }

    fn image_mut(&mut self, node: NodeId) -> DomResult<&mut ImageData> {
        self.tree
            .try_element_mut(node)?
            .image
            .as_mut()
            .ok_or(DomError::NotAnImage(node))
    }

    /// `HTMLImageElement.complete`; `false` for non-images
    pub fn is_image_complete(&self, node: NodeId) -> bool {
        self.image(node).is_some_and(ImageData::is_complete)
    }

    /// Seed the memory cache as if `src` had been fetched before
    pub fn prime_image_cache(&mut self, src: &str, natural: Size) {
        self.image_cache.insert(src.to_string(), natural);
    }

    pub fn is_cached(&self, src: &str) -> bool {
        self.image_cache.contains_key(src)
    }

    /// The fetch for an image finished: record its natural size, mark it
    /// complete and dispatch `load`.
    ///
    /// With [`Quirks::drops_cached_load_event`], an image served from the
    /// memory cache completes silently.
    pub fn finish_image_load(&mut self, node: NodeId, width: f64, height: f64) -> DomResult<()> {
        let natural = Size::new(width, height);
        let drops_event = self.quirks.drops_cached_load_event;
        let image = self.image_mut(node)?;
        let src = image.src.clone();
        image.state = ImageState::Complete;
        image.natural = natural;

        let was_cached = self.image_cache.insert(src.clone(), natural).is_some();
        if drops_event && was_cached {
            tracing::trace!("Load event for cached image {} dropped", src);
            return Ok(());
        }
        tracing::trace!("Image {} loaded ({})", src, natural);
        self.dispatch_event(EventTarget::Node(node), EventType::Load);
        Ok(())
    }

    /// The fetch for an image failed
    pub fn fail_image_load(&mut self, node: NodeId) -> DomResult<()> {
        self.image_mut(node)?.state = ImageState::Broken;
        Ok(())
    }

    /// Assign `img.src`, restarting the load
    ///
    /// Cached sources and `data:` URIs complete on the next
    /// [`run_tasks`](Self::run_tasks) and always dispatch `load`.
    pub fn set_image_src(&mut self, node: NodeId, src: &str) -> DomResult<()> {
        self.image_mut(node)?.restart(src);
        self.tree.try_element_mut(node)?.set_attr("src", src);
        if self.image_cache.contains_key(src) || src.starts_with("data:") {
            self.tasks.push_back(Task::CompleteFromCache {
                node,
                src: src.to_string(),
            });
        }
        Ok(())
    }

    /// Run queued tasks; returns how many ran
    pub fn run_tasks(&mut self) -> usize {
        let mut ran = 0;
        while let Some(task) = self.tasks.pop_front() {
            ran += 1;
            match task {
                Task::CompleteFromCache { node, src } => self.complete_from_cache(node, &src),
            }
        }
        ran
    }

    fn complete_from_cache(&mut self, node: NodeId, src: &str) {
        // A data: URI placeholder is a 1x1 image.
        let natural = self
            .image_cache
            .get(src)
            .copied()
            .unwrap_or(Size::new(1.0, 1.0));
        let Ok(image) = self.image_mut(node) else {
            return;
        };
        if image.src != src {
            tracing::trace!("Stale cache completion for {} skipped", src);
            return;
        }
        image.state = ImageState::Complete;
        image.natural = natural;
        self.dispatch_event(EventTarget::Node(node), EventType::Load);
    }

    // === Events ===

    pub fn add_event_listener(
        &mut self,
        target: EventTarget,
        event_type: EventType,
        once: bool,
        handler: EventHandler,
    ) -> ListenerId {
        self.listeners.add(target, event_type, once, handler)
    }

    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub fn has_listener(&self, id: ListenerId) -> bool {
        self.listeners.contains(id)
    }

    /// Total registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Listeners registered on one target
    pub fn listener_count_for(&self, target: EventTarget) -> usize {
        self.listeners.count_for(target)
    }

    /// Invoke the listeners registered for `target` and `event_type`;
    /// returns how many ran.
    ///
    /// The listener set is snapshotted first: listeners added during
    /// dispatch wait for the next event, removed ones are skipped.
    pub fn dispatch_event(&mut self, target: EventTarget, event_type: EventType) -> usize {
        let event = Event {
            event_type,
            target,
            timestamp: self.now,
        };
        let mut fired = 0;
        for id in self.listeners.matching(target, event_type) {
            let Some((mut handler, once)) = self.listeners.take(id) else {
                continue;
            };
            handler(self, &event);
            if !once {
                self.listeners.restore(id, handler);
            }
            fired += 1;
        }
        tracing::trace!("Dispatched {} to {} listener(s)", event_type.as_str(), fired);
        fired
    }

    // === Timers & animation ===

    /// `setTimeout`
    pub fn set_timeout(&mut self, delay: Duration, handler: TimerHandler) -> TimerId {
        self.timers.schedule(self.now, delay, handler)
    }

    /// `clearTimeout`
    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Animate opacity linearly from its current value to `to`
    pub fn animate_opacity(&mut self, node: NodeId, to: f32, duration: Duration) {
        if duration.is_zero() {
            self.set_opacity(node, to);
            return;
        }
        let from = self.opacity(node);
        self.timeline.start(OpacityAnimation {
            node,
            from,
            to: to.clamp(0.0, 1.0),
            start: self.now,
            duration,
        });
    }

    pub fn is_animating(&self, node: NodeId) -> bool {
        self.timeline.get(node).is_some()
    }

    /// Move the clock forward: run queued tasks, fire due timers in order
    /// and sample animations.
    pub fn advance(&mut self, dt: Duration) {
        self.run_tasks();
        let deadline = self.now + dt;
        while let Some(timer) = self.timers.pop_due(deadline) {
            self.now = self.now.max(timer.due);
            self.sample_animations();
            (timer.handler)(self);
        }
        self.now = deadline;
        self.sample_animations();
    }

    fn sample_animations(&mut self) {
        for (node, value) in self.timeline.tick(self.now) {
            if let Some(style) = self.tree.element_mut(node).map(|el| &mut el.style) {
                style.opacity = Some(value);
            }
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(1024.0, 768.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_skeleton() {
        let doc = Document::new(800.0, 600.0);

        assert_eq!(doc.parent(doc.body()), Some(doc.document_element()));
        assert_eq!(doc.content_size(doc.body()), Size::new(800.0, 600.0));
        assert_eq!(doc.query_selector_all("body").unwrap(), vec![doc.body()]);
    }

    #[test]
    fn test_load_dispatch_once() {
        let mut doc = Document::default();
        let img = doc.create_image("a.jpg");
        doc.append_child(doc.body(), img).unwrap();

        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        doc.add_event_listener(
            EventTarget::Node(img),
            EventType::Load,
            true,
            Box::new(move |_, _| counter.set(counter.get() + 1)),
        );

        doc.finish_image_load(img, 10.0, 10.0).unwrap();
        doc.finish_image_load(img, 10.0, 10.0).unwrap();

        assert_eq!(hits.get(), 1);
        assert_eq!(doc.listener_count(), 0);
        assert!(doc.is_image_complete(img));
    }

    #[test]
    fn test_quirk_drops_cached_load() {
        let mut doc = Document::default().with_quirks(Quirks {
            drops_cached_load_event: true,
        });
        doc.prime_image_cache("a.jpg", Size::new(10.0, 10.0));
        let img = doc.create_image("a.jpg");

        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        doc.add_event_listener(
            EventTarget::Node(img),
            EventType::Load,
            false,
            Box::new(move |_, _| counter.set(counter.get() + 1)),
        );

        doc.finish_image_load(img, 10.0, 10.0).unwrap();
        assert_eq!(hits.get(), 0);

        // Re-assigning src completes from cache with a real event.
        doc.set_image_src(img, "a.jpg").unwrap();
        assert!(!doc.is_image_complete(img));
        assert_eq!(doc.run_tasks(), 1);
        assert_eq!(hits.get(), 1);
        assert!(doc.is_image_complete(img));
    }

    #[test]
    fn test_stale_cache_completion_is_skipped() {
        let mut doc = Document::default();
        doc.prime_image_cache("b.jpg", Size::new(20.0, 10.0));
        let img = doc.create_image("a.jpg");

        doc.set_image_src(img, "data:image/gif;base64,R0lGOD").unwrap();
        doc.set_image_src(img, "b.jpg").unwrap();
        doc.run_tasks();

        let image = doc.image(img).unwrap();
        assert_eq!(image.src, "b.jpg");
        assert_eq!(image.natural, Size::new(20.0, 10.0));
        assert_eq!(doc.get_attribute(img, "src"), Some("b.jpg"));
    }

    #[test]
    fn test_listener_removed_during_dispatch_is_skipped() {
        let mut doc = Document::default();
        let hits = Rc::new(Cell::new(0));

        let second = Rc::new(Cell::new(None));
        let to_remove = Rc::clone(&second);
        doc.add_event_listener(
            EventTarget::Window,
            EventType::Resize,
            false,
            Box::new(move |doc, _| {
                if let Some(id) = to_remove.get() {
                    doc.remove_event_listener(id);
                }
            }),
        );
        let counter = Rc::clone(&hits);
        let id = doc.add_event_listener(
            EventTarget::Window,
            EventType::Resize,
            false,
            Box::new(move |_, _| counter.set(counter.get() + 1)),
        );
        second.set(Some(id));

        doc.resize_viewport(640.0, 480.0);
        assert_eq!(hits.get(), 0);
        assert_eq!(doc.listener_count(), 1);
        assert_eq!(doc.viewport(), Size::new(640.0, 480.0));
    }

    #[test]
    fn test_timers_fire_in_order() {
        let mut doc = Document::default();
        let log = Rc::new(std::cell::RefCell::new(Vec::new()));

        for (name, ms) in [("late", 30), ("early", 10)] {
            let log = Rc::clone(&log);
            doc.set_timeout(
                Duration::from_millis(ms),
                Box::new(move |doc: &mut Document| log.borrow_mut().push((name, doc.now()))),
            );
        }
        let cancelled = doc.set_timeout(Duration::from_millis(20), Box::new(|_| panic!("cancelled")));
        assert!(doc.clear_timeout(cancelled));

        doc.advance(Duration::from_millis(50));
        assert_eq!(
            *log.borrow(),
            vec![("early", Duration::from_millis(10)), ("late", Duration::from_millis(30))]
        );
        assert_eq!(doc.now(), Duration::from_millis(50));
        assert_eq!(doc.pending_timers(), 0);
    }

    #[test]
    fn test_animate_opacity() {
        let mut doc = Document::default();
        let div = doc.create_element("div");
        doc.append_child(doc.body(), div).unwrap();
        doc.set_style(div, "opacity", "0").unwrap();

        doc.animate_opacity(div, 1.0, Duration::from_millis(300));
        doc.advance(Duration::from_millis(150));
        assert_eq!(doc.opacity(div), 0.5);
        assert!(doc.is_animating(div));

        doc.advance(Duration::from_millis(150));
        assert_eq!(doc.opacity(div), 1.0);
        assert!(!doc.is_animating(div));
    }

    #[test]
    fn test_set_opacity_cancels_animation() {
        let mut doc = Document::default();
        let div = doc.create_element("div");
        doc.set_opacity(div, 0.0);
        doc.animate_opacity(div, 1.0, Duration::from_millis(100));

        doc.set_opacity(div, 0.25);
        doc.advance(Duration::from_millis(100));
        assert_eq!(doc.opacity(div), 0.25);
    }

    #[test]
    fn test_attribute_errors() {
        let mut doc = Document::default();
        let text = doc.tree_mut().create_text("hi");

        assert_eq!(doc.set_attribute(text, "id", "x"), Err(DomError::NotAnElement(text)));
        assert_eq!(
            doc.finish_image_load(doc.body(), 1.0, 1.0),
            Err(DomError::NotAnImage(doc.body()))
        );
        assert!(doc.set_style(doc.body(), "color", "red").is_err());
    }
}
