//! Timers (`setTimeout` / `clearTimeout`)

use std::fmt;
use std::time::Duration;

use crate::Document;

/// Timer registration handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Timer callback
pub type TimerHandler = Box<dyn FnOnce(&mut Document)>;

pub(crate) struct Timer {
    pub id: TimerId,
    pub due: Duration,
    pub handler: TimerHandler,
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer")
            .field("id", &self.id)
            .field("due", &self.due)
            .finish_non_exhaustive()
    }
}

/// Pending timers
#[derive(Debug, Default)]
pub(crate) struct TimerQueue {
    next_id: u64,
    timers: Vec<Timer>,
}

impl TimerQueue {
    pub fn schedule(&mut self, now: Duration, delay: Duration, handler: TimerHandler) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.push(Timer {
            id,
            due: now + delay,
            handler,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Earliest timer due at or before `deadline`; ties fire in
    /// scheduling order
    pub fn pop_due(&mut self, deadline: Duration) -> Option<Timer> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= deadline)
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)?;
        Some(self.timers.remove(index))
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }
}
