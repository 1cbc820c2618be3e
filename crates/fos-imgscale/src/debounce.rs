//! Resize debouncing
//!
//! Holds at most one document timer. Every resize re-arms it, so a burst
//! of resizes ends in a single rescale once the viewport is quiet.

use std::time::Duration;

use fos_dom::{Document, TimerHandler, TimerId};

#[derive(Debug, Default)]
pub(crate) struct ResizeDebounce {
    timer: Option<TimerId>,
}

impl ResizeDebounce {
    /// Cancel the pending timer, if any, and schedule `handler` after `delay`
    pub fn rearm(&mut self, doc: &mut Document, delay: Duration, handler: TimerHandler) -> TimerId {
        self.cancel(doc);
        let id = doc.set_timeout(delay, handler);
        self.timer = Some(id);
        id
    }

    /// The timer ran; nothing is pending anymore
    pub fn fired(&mut self) {
        self.timer = None;
    }

    /// Clear the pending timer; returns whether one was pending
    pub fn cancel(&mut self, doc: &mut Document) -> bool {
        self.timer.take().is_some_and(|id| doc.clear_timeout(id))
    }

    pub fn is_pending(&self) -> bool {
        self.timer.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_rearm_replaces_pending_timer() {
        let mut doc = Document::default();
        let mut debounce = ResizeDebounce::default();
        let hits = Rc::new(Cell::new(0));

        for _ in 0..3 {
            let counter = Rc::clone(&hits);
            debounce.rearm(
                &mut doc,
                Duration::from_millis(100),
                Box::new(move |_| counter.set(counter.get() + 1)),
            );
            doc.advance(Duration::from_millis(40));
        }
        assert_eq!(doc.pending_timers(), 1);
        assert!(debounce.is_pending());

        doc.advance(Duration::from_millis(100));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_cancel() {
        let mut doc = Document::default();
        let mut debounce = ResizeDebounce::default();
        assert!(!debounce.cancel(&mut doc));

        debounce.rearm(&mut doc, Duration::from_millis(10), Box::new(|_| panic!("cancelled")));
        assert!(debounce.cancel(&mut doc));
        assert!(!debounce.is_pending());

        doc.advance(Duration::from_millis(20));
        assert_eq!(doc.pending_timers(), 0);
    }
}
