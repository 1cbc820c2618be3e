//! Scale geometry
//!
//! The host-independent part of scaling: which dimension to pin, the
//! size that results, and the margins that center the overflow.

use fos_dom::Size;

use crate::ScaleMode;

/// The single dimension a scale pass assigns; the other stays `auto`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Assignment {
    /// Width pinned to this many px
    Width(f64),
    /// Height pinned to this many px
    Height(f64),
}

impl Assignment {
    /// Size of an image of `natural` size after this assignment, keeping
    /// its aspect ratio
    pub fn apply_to(self, natural: Size) -> Size {
        match self {
            Self::Width(w) => Size::new(w, w * natural.height / natural.width),
            Self::Height(h) => Size::new(h * natural.width / natural.height, h),
        }
    }
}

/// Pick the dimension to pin.
///
/// When the container is relatively wider than the image
/// (`cw / iw > ch / ih`), height limits a fit and width drives a fill;
/// otherwise the reverse. Returns `None` when either size is empty or
/// not finite, since the ratio comparison is meaningless there.
pub fn scale_assignment(container: Size, image: Size, mode: ScaleMode) -> Option<Assignment> {
    if !container.is_measurable() || !image.is_measurable() {
        return None;
    }
    let container_is_wider =
        container.width / image.width > container.height / image.height;

    Some(match (container_is_wider, mode) {
        (true, ScaleMode::Fit) => Assignment::Height(container.height),
        (true, ScaleMode::Fill) => Assignment::Width(container.width),
        (false, ScaleMode::Fit) => Assignment::Width(container.width),
        (false, ScaleMode::Fill) => Assignment::Height(container.height),
    })
}

/// Margin offsets in px
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Margins {
    pub left: f64,
    pub top: f64,
}

/// Negative margins that center `scaled` over `container`.
///
/// Each overflowing dimension gets `-floor(overflow / 2)`; dimensions
/// that fit get `0`.
pub fn center_offsets(scaled: Size, container: Size) -> Margins {
    Margins {
        left: centering_offset(scaled.width, container.width),
        top: centering_offset(scaled.height, container.height),
    }
}

fn centering_offset(scaled: f64, container: f64) -> f64 {
    let overflow = scaled - container;
    if overflow.is_nan() || overflow <= 0.0 {
        return 0.0;
    }
    let half = (overflow / 2.0).floor();
    if half > 0.0 { -half } else { 0.0 }
}
