//! The scale pass
//!
//! One synchronous pass over an image/container pair: reset, measure,
//! pin one dimension, center, reveal. Nothing here fails; inapplicable
//! input degrades to "skip and reveal".

use std::time::Duration;

use fos_dom::Size;

use crate::geometry::{Assignment, Margins, center_offsets, scale_assignment};
use crate::{ScaleConfig, ScaleHost};

/// How the image arrived, which decides between fading and showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// Already complete when scaling was requested
    Cached,
    /// Delivered by a load event after the scaler attached
    Fetched,
    /// A repeat pass over an image that was already revealed; container
    /// opacity, and any fade still running on it, is left alone
    Rescale,
}

/// How the container was made visible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    Instant,
    Fade(Duration),
    /// Opacity untouched (rescale passes)
    Unchanged,
}

/// Why a pass left the image untouched
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SkipReason {
    /// Container measured empty or non-finite
    EmptyContainer(Size),
    /// Image measured empty or non-finite (not loaded, broken, hidden)
    EmptyImage(Size),
}

/// Result of one scale pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleOutcome {
    Scaled {
        assignment: Assignment,
        /// Image size after scaling
        size: Size,
        /// Margins applied when centering is on
        margins: Option<Margins>,
        reveal: Reveal,
    },
    Skipped {
        reason: SkipReason,
        /// Never a fade
        reveal: Reveal,
    },
}

impl ScaleOutcome {
    pub fn is_scaled(&self) -> bool {
        matches!(self, Self::Scaled { .. })
    }

    /// How the container was revealed
    pub fn reveal(&self) -> Reveal {
        match self {
            Self::Scaled { reveal, .. } | Self::Skipped { reveal, .. } => *reveal,
        }
    }
}

/// Scale `image` against `container`.
///
/// The image counts as [`Arrival::Cached`] if it is complete now and as
/// [`Arrival::Fetched`] otherwise. An incomplete image measures empty, so
/// this entry point never fades; callers that learn of the load event
/// themselves pass [`Arrival::Fetched`] to [`scale_image`], as
/// [`attach`](crate::attach()) does.
pub fn scale<H: ScaleHost>(
    host: &mut H,
    image: H::Node,
    container: H::Node,
    config: &ScaleConfig,
) -> ScaleOutcome {
    let arrival = if host.is_complete(image) {
        Arrival::Cached
    } else {
        Arrival::Fetched
    };
    scale_image(host, image, container, config, arrival)
}

/// Scale `image` against `container` with an explicit arrival
pub fn scale_image<H: ScaleHost>(
    host: &mut H,
    image: H::Node,
    container: H::Node,
    config: &ScaleConfig,
    arrival: Arrival,
) -> ScaleOutcome {
    host.clear_dimensions(image);
    let forced = force_visible(host, image);

    let container_size = host.measure(container);
    let image_size = host.measure(image);
    tracing::trace!(
        "Measured container {:?} at {} and image {:?} at {}",
        container,
        container_size,
        image,
        image_size
    );

    let Some(assignment) = scale_assignment(container_size, image_size, config.scale) else {
        restore_hidden(host, forced);
        let reveal = if arrival == Arrival::Rescale {
            Reveal::Unchanged
        } else {
            host.set_opacity(container, 1.0);
            Reveal::Instant
        };
        let reason = if container_size.is_measurable() {
            SkipReason::EmptyImage(image_size)
        } else {
            SkipReason::EmptyContainer(container_size)
        };
        tracing::debug!("Skipped scaling {:?}: {:?}", image, reason);
        return ScaleOutcome::Skipped { reason, reveal };
    };

    match assignment {
        Assignment::Width(px) => host.set_width(image, px),
        Assignment::Height(px) => host.set_height(image, px),
    }

    let size = host.measure(image);
    let margins = config.center.then(|| {
        let margins = center_offsets(size, container_size);
        host.set_margins(image, margins.left, margins.top);
        margins
    });

    restore_hidden(host, forced);
    let reveal = reveal(host, container, config, arrival);

    tracing::debug!(
        "Scaled {:?} ({}) to {} in {}, {:?}",
        image,
        config.scale,
        size,
        container_size,
        reveal
    );
    ScaleOutcome::Scaled {
        assignment,
        size,
        margins,
        reveal,
    }
}

/// Show every `display: none` node from the image up to the body,
/// returning the nodes that were forced
fn force_visible<H: ScaleHost>(host: &mut H, image: H::Node) -> Vec<H::Node> {
    let mut forced = Vec::new();
    let mut current = Some(image);
    while let Some(node) = current {
        if host.is_body(node) {
            break;
        }
        if host.is_hidden(node) {
            host.set_hidden(node, false);
            forced.push(node);
        }
        current = host.parent(node);
    }
    forced
}

fn restore_hidden<H: ScaleHost>(host: &mut H, forced: Vec<H::Node>) {
    for node in forced {
        host.set_hidden(node, true);
    }
}

fn reveal<H: ScaleHost>(
    host: &mut H,
    container: H::Node,
    config: &ScaleConfig,
    arrival: Arrival,
) -> Reveal {
    match arrival {
        Arrival::Rescale => Reveal::Unchanged,
        Arrival::Fetched if config.fade_duration_ms > 0 => {
            let duration = config.fade_duration();
            host.fade_in(container, duration);
            Reveal::Fade(duration)
        }
        Arrival::Fetched | Arrival::Cached => {
            host.set_opacity(container, 1.0);
            Reveal::Instant
        }
    }
}
