//! fOS Image Scale
//!
//! Resize an image so it fits inside or fills its container, center the
//! overflow with negative margins, fade the container in once the image
//! has loaded and rescale when the viewport changes.
//!
//! # Example
//! ```rust,ignore
//! use fos_dom::Document;
//! use fos_imgscale::{attach, ScaleConfig};
//!
//! let mut doc = Document::new(1280.0, 720.0);
//! // ... build `.gallery > div > img` ...
//! let handle = attach(&mut doc, ".gallery img", ScaleConfig::default().with_fade(300));
//! doc.resize_viewport(800.0, 600.0);
//! handle.detach(&mut doc);
//! ```
//!
//! The algorithm itself ([`scale`]) is written against the [`ScaleHost`]
//! trait; `fos_dom::Document` is the host used by [`attach`].

mod attach;
pub mod compat;
mod config;
mod debounce;
mod dom;
pub mod geometry;
mod host;
mod scale;

pub use attach::{ScaleHandle, ScaleTarget, Targets, attach};
pub use config::{ConfigError, ScaleConfig, ScaleMode};
pub use geometry::{Assignment, Margins};
pub use host::ScaleHost;
pub use scale::{Arrival, Reveal, ScaleOutcome, SkipReason, scale, scale_image};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
