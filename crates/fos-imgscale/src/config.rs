//! Scaler configuration

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize};

/// How the image relates to its container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleMode {
    /// Entirely inside the container, possibly leaving empty space
    Fit,
    /// Covers the container; the excess is clipped
    #[default]
    Fill,
}

impl ScaleMode {
    /// Parse a mode name. Anything other than `fit` means `fill`.
    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("fit") {
            Self::Fit
        } else {
            Self::Fill
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fit => "fit",
            Self::Fill => "fill",
        }
    }
}

impl FromStr for ScaleMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ScaleMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Self::parse(&name))
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid scale config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Scaler options
///
/// Deserializes from camelCase keys; the legacy plugin names
/// `fade_duration`, `rescale_after_resize` and `parent_css_selector` are
/// accepted as aliases. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScaleConfig {
    /// Fit inside or fill the container
    pub scale: ScaleMode,
    /// Center overflow with negative margins
    pub center: bool,
    /// Fade the container in over this many milliseconds when the image
    /// had to be fetched; `0` reveals instantly
    #[serde(alias = "fade_duration")]
    pub fade_duration_ms: u64,
    /// Rescale managed images when the viewport is resized
    #[serde(alias = "rescale_after_resize")]
    pub rescale_on_resize: bool,
    /// Ancestor selector for the container; `None` uses the parent
    #[serde(alias = "parent_css_selector")]
    pub container_selector: Option<String>,
    /// Coalesce resize events, rescaling once the viewport has been quiet
    /// this long; `0` rescales on every resize
    pub resize_debounce_ms: u64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            scale: ScaleMode::Fill,
            center: true,
            fade_duration_ms: 0,
            rescale_on_resize: true,
            container_selector: None,
            resize_debounce_ms: 0,
        }
    }
}

impl ScaleConfig {
    /// Load from JSON text
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn fit(mut self) -> Self {
        self.scale = ScaleMode::Fit;
        self
    }

    pub fn fill(mut self) -> Self {
        self.scale = ScaleMode::Fill;
        self
    }

    pub fn centered(mut self, center: bool) -> Self {
        self.center = center;
        self
    }

    pub fn with_fade(mut self, millis: u64) -> Self {
        self.fade_duration_ms = millis;
        self
    }

    pub fn with_rescale_on_resize(mut self, rescale: bool) -> Self {
        self.rescale_on_resize = rescale;
        self
    }

    pub fn with_container(mut self, selector: impl Into<String>) -> Self {
        self.container_selector = Some(selector.into());
        self
    }

    pub fn with_resize_debounce(mut self, millis: u64) -> Self {
        self.resize_debounce_ms = millis;
        self
    }

    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}
