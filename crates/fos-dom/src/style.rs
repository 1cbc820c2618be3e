//! Inline Style
//!
//! The subset of CSS properties settable through an element's `style`
//! attribute that layout and page utilities care about. A `None` field
//! means the declaration is absent and the initial value applies.

use std::fmt;

use crate::{DomError, DomResult};

/// Length value for `width` / `height`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// `auto`
    Auto,
    /// Absolute CSS pixels
    Px(f64),
    /// Percentage of the containing block
    Percent(f64),
}

impl Length {
    /// Parse `auto`, `12px`, `12` (treated as px) or `50%`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Some(Self::Auto);
        }
        if let Some(pct) = s.strip_suffix('%') {
            return pct.trim().parse().ok().filter(|v: &f64| v.is_finite()).map(Self::Percent);
        }
        let px = s.strip_suffix("px").unwrap_or(s);
        px.trim().parse().ok().filter(|v: &f64| v.is_finite()).map(Self::Px)
    }

    /// Resolve against a basis; `auto` resolves to nothing
    pub fn resolve(self, basis: f64) -> Option<f64> {
        match self {
            Self::Auto => None,
            Self::Px(v) => Some(v),
            Self::Percent(p) => Some(basis * p / 100.0),
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Px(v) => write!(f, "{v}px"),
            Self::Percent(p) => write!(f, "{p}%"),
        }
    }
}

/// `display` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    #[default]
    Block,
    Inline,
    None,
}

impl Display {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Some(Self::Block),
            "inline" | "inline-block" => Some(Self::Inline),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Inline => "inline",
            Self::None => "none",
        }
    }
}

/// `overflow` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
}

impl Overflow {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "visible" => Some(Self::Visible),
            "hidden" => Some(Self::Hidden),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Visible => "visible",
            Self::Hidden => "hidden",
        }
    }
}

/// Inline style declarations of one element
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    pub width: Option<Length>,
    pub height: Option<Length>,
    /// `margin-left` in px
    pub margin_left: Option<f64>,
    /// `margin-top` in px
    pub margin_top: Option<f64>,
    /// `opacity`, clamped to `0.0..=1.0`
    pub opacity: Option<f32>,
    pub overflow: Option<Overflow>,
    pub display: Option<Display>,
}

impl InlineStyle {
    /// Set a property from CSS text, like `element.style.setProperty`
    ///
    /// An empty value removes the declaration.
    pub fn set_property(&mut self, property: &str, value: &str) -> DomResult<()> {
        let property = property.trim().to_ascii_lowercase();
        let value = value.trim();
        let invalid = || DomError::InvalidStyle {
            property: property.clone(),
            value: value.to_string(),
        };

        if value.is_empty() {
            return self.remove_property(&property).then_some(()).ok_or_else(invalid);
        }

        match property.as_str() {
            "width" => self.width = Some(Length::parse(value).ok_or_else(invalid)?),
            "height" => self.height = Some(Length::parse(value).ok_or_else(invalid)?),
            "margin-left" => self.margin_left = Some(parse_px(value).ok_or_else(invalid)?),
            "margin-top" => self.margin_top = Some(parse_px(value).ok_or_else(invalid)?),
            "opacity" => {
                let opacity: f32 = value.parse().map_err(|_| invalid())?;
                if !opacity.is_finite() {
                    return Err(invalid());
                }
                self.opacity = Some(opacity.clamp(0.0, 1.0));
            }
            "overflow" => self.overflow = Some(Overflow::parse(value).ok_or_else(invalid)?),
            "display" => self.display = Some(Display::parse(value).ok_or_else(invalid)?),
            _ => return Err(invalid()),
        }
        Ok(())
    }

    /// Remove a declaration; returns `false` for unknown properties
    pub fn remove_property(&mut self, property: &str) -> bool {
        match property {
            "width" => self.width = None,
            "height" => self.height = None,
            "margin-left" => self.margin_left = None,
            "margin-top" => self.margin_top = None,
            "opacity" => self.opacity = None,
            "overflow" => self.overflow = None,
            "display" => self.display = None,
            _ => return false,
        }
        true
    }

    /// Check for `display: none`
    #[inline]
    pub fn is_display_none(&self) -> bool {
        self.display == Some(Display::None)
    }

    /// Serialize the declarations that are set, in a fixed order
    pub fn css_text(&self) -> String {
        let mut decls = Vec::new();
        if let Some(v) = self.width {
            decls.push(format!("width: {v}"));
        }
        if let Some(v) = self.height {
            decls.push(format!("height: {v}"));
        }
        if let Some(v) = self.margin_left {
            decls.push(format!("margin-left: {v}px"));
        }
        if let Some(v) = self.margin_top {
            decls.push(format!("margin-top: {v}px"));
        }
        if let Some(v) = self.opacity {
            decls.push(format!("opacity: {v}"));
        }
        if let Some(v) = self.overflow {
            decls.push(format!("overflow: {}", v.as_str()));
        }
        if let Some(v) = self.display {
            decls.push(format!("display: {}", v.as_str()));
        }
        decls.join("; ")
    }
}

fn parse_px(s: &str) -> Option<f64> {
    let s = s.strip_suffix("px").unwrap_or(s);
    s.trim().parse().ok().filter(|v: &f64| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_length() {
        assert_eq!(Length::parse("auto"), Some(Length::Auto));
        assert_eq!(Length::parse("400px"), Some(Length::Px(400.0)));
        assert_eq!(Length::parse(" 12.5 "), Some(Length::Px(12.5)));
        assert_eq!(Length::parse("50%"), Some(Length::Percent(50.0)));
        assert_eq!(Length::parse("wide"), None);
        assert_eq!(Length::parse("NaN"), None);
    }

    #[test]
    fn test_resolve_length() {
        assert_eq!(Length::Percent(25.0).resolve(800.0), Some(200.0));
        assert_eq!(Length::Px(10.0).resolve(800.0), Some(10.0));
        assert_eq!(Length::Auto.resolve(800.0), None);
    }

    #[test]
    fn test_set_and_serialize() {
        let mut style = InlineStyle::default();
        style.set_property("width", "auto").unwrap();
        style.set_property("margin-left", "-200px").unwrap();
        style.set_property("opacity", "1.5").unwrap();
        style.set_property("overflow", "hidden").unwrap();

        assert_eq!(
            style.css_text(),
            "width: auto; margin-left: -200px; opacity: 1; overflow: hidden"
        );
    }

    #[test]
    fn test_invalid_values() {
        let mut style = InlineStyle::default();
        assert!(style.set_property("display", "grid").is_err());
        assert!(style.set_property("color", "red").is_err());
        assert!(style.set_property("opacity", "half").is_err());
        assert_eq!(style, InlineStyle::default());
    }

    #[test]
    fn test_empty_value_removes() {
        let mut style = InlineStyle::default();
        style.set_property("display", "none").unwrap();
        assert!(style.is_display_none());

        style.set_property("display", "").unwrap();
        assert_eq!(style.display, None);
    }
}
