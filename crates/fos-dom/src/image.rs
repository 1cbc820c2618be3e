//! Image resources
//!
//! `<img>` load state. Fetching is outside the DOM: the embedder reports
//! completion through [`Document::finish_image_load`](crate::Document::finish_image_load).

use crate::Size;

/// Image load state, mirroring `HTMLImageElement.complete`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageState {
    /// Request in flight
    #[default]
    Loading,
    /// Decoded; natural size known
    Complete,
    /// Request failed
    Broken,
}

/// Image resource attached to an `<img>` element
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    /// Current `src`
    pub src: String,
    pub state: ImageState,
    /// Intrinsic size; zero until complete
    pub natural: Size,
}

impl ImageData {
    pub fn new(src: &str) -> Self {
        Self {
            src: src.to_string(),
            state: ImageState::Loading,
            natural: Size::ZERO,
        }
    }

    /// `HTMLImageElement.complete`
    ///
    /// A broken image is also complete: nothing more will arrive.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.state != ImageState::Loading
    }

    /// Check for a `data:` URI, which never needs a network fetch
    pub fn is_data_uri(&self) -> bool {
        self.src.starts_with("data:")
    }

    pub(crate) fn restart(&mut self, src: &str) {
        self.src = src.to_string();
        self.state = ImageState::Loading;
        self.natural = Size::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_image_is_loading() {
        let img = ImageData::new("photo.jpg");
        assert_eq!(img.state, ImageState::Loading);
        assert!(!img.is_complete());
        assert!(!img.is_data_uri());
    }

    #[test]
    fn test_broken_counts_as_complete() {
        let mut img = ImageData::new("missing.jpg");
        img.state = ImageState::Broken;
        assert!(img.is_complete());

        img.restart("data:image/gif;base64,AAAA");
        assert!(!img.is_complete());
        assert!(img.is_data_uri());
        assert_eq!(img.natural, Size::ZERO);
    }
}
