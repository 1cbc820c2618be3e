//! Cached image load workaround
//!
//! Some engines complete an image served from the memory cache without
//! ever dispatching `load`. Listeners attached while such an image is
//! still loading would wait forever. Re-assigning `src` through a
//! different URL makes the engine start a fresh load, which does fire.

use fos_dom::{Document, NodeId};

/// 1x1 transparent GIF
pub const PLACEHOLDER_SRC: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///ywAAAAAAQABAAACAUwAOw==";

/// Force a fresh `load` for an in-flight image whose `src` is cached, on
/// documents that drop cached load events. Returns whether the load was
/// restarted.
pub fn rekick_cached_load(doc: &mut Document, image: NodeId) -> bool {
    if !doc.quirks().drops_cached_load_event {
        return false;
    }
    let Some(src) = doc
        .image(image)
        .filter(|img| !img.is_complete() && !img.is_data_uri())
        .map(|img| img.src.clone())
    else {
        return false;
    };
    if !doc.is_cached(&src) {
        return false;
    }

    let restarted = doc
        .set_image_src(image, PLACEHOLDER_SRC)
        .and_then(|()| doc.set_image_src(image, &src));
    match restarted {
        Ok(()) => {
            tracing::debug!("Re-requested cached image {} on {}", src, image);
            true
        }
        Err(err) => {
            tracing::warn!("Could not re-request {}: {}", src, err);
            false
        }
    }
}
