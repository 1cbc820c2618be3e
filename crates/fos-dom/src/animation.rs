//! Opacity animations
//!
//! Linear `opacity` tweens, the only animation page utilities in this
//! workspace need. The timeline is sampled by [`Document::advance`](crate::Document::advance).

use std::time::Duration;

use crate::NodeId;

/// One running opacity tween
#[derive(Debug, Clone, PartialEq)]
pub struct OpacityAnimation {
    pub node: NodeId,
    pub from: f32,
    pub to: f32,
    pub start: Duration,
    pub duration: Duration,
}

impl OpacityAnimation {
    /// Progress in `0.0..=1.0` at time `now`
    pub fn progress(&self, now: Duration) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.start);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0) as f32
    }

    /// Interpolated opacity at time `now`
    pub fn value_at(&self, now: Duration) -> f32 {
        let t = self.progress(now);
        self.from + (self.to - self.from) * t
    }

    pub fn is_finished(&self, now: Duration) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Running animations, at most one per node
#[derive(Debug, Default)]
pub struct Timeline {
    animations: Vec<OpacityAnimation>,
}

impl Timeline {
    /// Start an animation, replacing any running one on the same node
    pub fn start(&mut self, animation: OpacityAnimation) {
        self.cancel(animation.node);
        self.animations.push(animation);
    }

    /// Stop the animation on `node`, leaving its current value in place
    pub fn cancel(&mut self, node: NodeId) -> bool {
        let before = self.animations.len();
        self.animations.retain(|a| a.node != node);
        self.animations.len() != before
    }

    pub fn get(&self, node: NodeId) -> Option<&OpacityAnimation> {
        self.animations.iter().find(|a| a.node == node)
    }

    /// Sample every animation at `now`; finished ones are dropped after
    /// reporting their final value.
    pub fn tick(&mut self, now: Duration) -> Vec<(NodeId, f32)> {
        let samples = self
            .animations
            .iter()
            .map(|a| (a.node, a.value_at(now)))
            .collect();
        self.animations.retain(|a| !a.is_finished(now));
        samples
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fade(node: u32, start_ms: u64, duration_ms: u64) -> OpacityAnimation {
        OpacityAnimation {
            node: NodeId(node),
            from: 0.0,
            to: 1.0,
            start: Duration::from_millis(start_ms),
            duration: Duration::from_millis(duration_ms),
        }
    }

    #[test]
    fn test_linear_interpolation() {
        let anim = fade(1, 100, 300);

        assert_eq!(anim.value_at(Duration::from_millis(50)), 0.0);
        assert_eq!(anim.value_at(Duration::from_millis(250)), 0.5);
        assert_eq!(anim.value_at(Duration::from_millis(400)), 1.0);
        assert!(anim.is_finished(Duration::from_millis(400)));
        assert!(!anim.is_finished(Duration::from_millis(399)));
    }

    #[test]
    fn test_zero_duration_is_immediate() {
        let anim = fade(1, 0, 0);
        assert_eq!(anim.value_at(Duration::ZERO), 1.0);
    }

    #[test]
    fn test_tick_drops_finished() {
        let mut timeline = Timeline::default();
        timeline.start(fade(1, 0, 100));
        timeline.start(fade(2, 0, 400));

        let samples = timeline.tick(Duration::from_millis(200));
        assert_eq!(samples, vec![(NodeId(1), 1.0), (NodeId(2), 0.5)]);
        assert_eq!(timeline.len(), 1);
        assert!(timeline.get(NodeId(2)).is_some());
    }

    #[test]
    fn test_restart_replaces() {
        let mut timeline = Timeline::default();
        timeline.start(fade(1, 0, 100));
        timeline.start(fade(1, 50, 100));

        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.get(NodeId(1)).map(|a| a.start), Some(Duration::from_millis(50)));
        assert!(timeline.cancel(NodeId(1)));
        assert!(timeline.is_empty());
    }
}
