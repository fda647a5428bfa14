#![forbid(unsafe_code)]

//! Overlay paint: content union, inline style and class composition.
//!
//! The overlay is drawn detached from the anchor's layout flow (attached at
//! the document root) with `position: fixed` at viewport coordinates, so no
//! ancestor `overflow` or positioning context can clip or shift it.
//!
//! Two paint modes, picked by the content variant:
//!
//! - [`TooltipContent::Text`]: translucent tinted background, backdrop blur,
//!   drop shadow, and a text wrapper with the heading font.
//! - [`TooltipContent::Visual`]: caller-supplied visual, no background
//!   styling at all.
//!
//! Caller style comes first; the component's own declarations override it
//! property by property.

use hovertip_core::placement::OverlayCoords;

use crate::color::resolve_tint;
use crate::config::TooltipConfig;

/// Stacking order of the overlay.
pub const Z_INDEX: u32 = 1500;
/// Shadow under text tooltips.
pub const TEXT_SHADOW: &str = "0 4px 14.9px -3px rgba(0, 0, 0, 0.3)";
/// Backdrop filter for text tooltips.
pub const TEXT_BACKDROP: &str = "blur(5px)";
/// Class always present on the overlay.
pub const BASE_CLASS: &str = "tooltip";
/// Class present while the overlay is painted visible (drives the CSS fade).
pub const VISIBLE_CLASS: &str = "tooltip--visible";

/// Tooltip content: plain text, or an arbitrary host visual of type `N`.
#[derive(Debug, Clone, PartialEq)]
pub enum TooltipContent<N> {
    Text(String),
    Visual(N),
}

impl<N> TooltipContent<N> {
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Visual(_) => None,
        }
    }
}

impl<N> From<&str> for TooltipContent<N> {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl<N> From<String> for TooltipContent<N> {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// Ordered list of CSS declarations.
///
/// Setting a property that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    decls: Vec<(String, String)>,
}

impl InlineStyle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a declaration. `property` may be kebab-case (`background-color`)
    /// or camelCase (`backgroundColor`); it is stored in kebab-case.
    pub fn set(&mut self, property: &str, value: impl Into<String>) {
        let property = normalize_property(property);
        let value = value.into();
        match self.decls.iter_mut().find(|(p, _)| *p == property) {
            Some((_, v)) => *v = value,
            None => self.decls.push((property, value)),
        }
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, property: &str, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        let property = normalize_property(property);
        self.decls
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        let property = normalize_property(property);
        let idx = self.decls.iter().position(|(p, _)| *p == property)?;
        Some(self.decls.remove(idx).1)
    }

    /// Apply every declaration of `other` on top of this one.
    pub fn merge(&mut self, other: &InlineStyle) {
        for (p, v) in &other.decls {
            self.set(p, v.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.decls.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Render as a `style` attribute value: `prop: value; prop: value;`.
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        for (i, (p, v)) in self.decls.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(p);
            out.push_str(": ");
            out.push_str(v);
            out.push(';');
        }
        out
    }
}

/// `backgroundColor` → `background-color`. Custom properties (`--x`) and
/// names that already contain a dash are returned unchanged.
fn normalize_property(property: &str) -> String {
    if property.starts_with("--") || property.contains('-') {
        return property.to_string();
    }
    let mut out = String::with_capacity(property.len() + 4);
    // `ms` is the one vendor prefix written lowercase in camelCase.
    if property
        .strip_prefix("ms")
        .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_uppercase()))
    {
        out.push('-');
    }
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// One paint of the overlay: where it is, whether it is faded in, and the
/// exact attributes the host applies.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayFrame {
    pub coords: OverlayCoords,
    pub painted: bool,
    pub classes: Vec<String>,
    pub style: InlineStyle,
}

impl OverlayFrame {
    /// Space-separated class attribute value.
    #[must_use]
    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }
}

/// Precomputed paint for one tooltip.
///
/// Tint resolution and style merging happen once; each [`frame`](Self::frame)
/// only patches position and the visible class.
#[derive(Debug, Clone)]
pub struct OverlayRenderer {
    base_style: InlineStyle,
    class_name: Option<String>,
    text: bool,
}

impl OverlayRenderer {
    /// Build the paint for `content` under `config`.
    #[must_use]
    pub fn new<N>(config: &TooltipConfig, content: &TooltipContent<N>) -> Self {
        let text = content.is_text();
        let mut style = config.style.clone();
        style.set("position", "fixed");
        style.set("left", "0px");
        style.set("top", "0px");
        style.set("z-index", Z_INDEX.to_string());
        style.set("pointer-events", "none");
        if text {
            let tint = resolve_tint(config.color.as_deref(), config.opacity);
            style.set("background-color", tint.to_css());
            style.set("box-shadow", TEXT_SHADOW);
            style.set("backdrop-filter", TEXT_BACKDROP);
        } else {
            style.set("background-color", "none");
            style.set("box-shadow", "none");
            style.set("backdrop-filter", "none");
        }

        Self {
            base_style: style,
            class_name: config.class_name.clone().filter(|c| !c.trim().is_empty()),
            text,
        }
    }

    /// Whether this renderer paints text content.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.text
    }

    /// Style of the wrapper around text content.
    #[must_use]
    pub fn text_style() -> InlineStyle {
        InlineStyle::new()
            .with("font-size", "14px")
            .with("font-family", "var(--font-family-head)")
    }

    /// Paint at `coords`, faded in when `painted`.
    #[must_use]
    pub fn frame(&self, coords: OverlayCoords, painted: bool) -> OverlayFrame {
        let mut style = self.base_style.clone();
        style.set("left", coords.css_left());
        style.set("top", coords.css_top());

        let mut classes = vec![BASE_CLASS.to_string()];
        if painted {
            classes.push(VISIBLE_CLASS.to_string());
        }
        if let Some(extra) = &self.class_name {
            classes.extend(extra.split_whitespace().map(str::to_string));
        }

        OverlayFrame {
            coords,
            painted,
            classes,
            style,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    type Content = TooltipContent<()>;

    #[test]
    fn normalize_camel_case() {
        assert_eq!(normalize_property("backgroundColor"), "background-color");
        assert_eq!(normalize_property("zIndex"), "z-index");
        assert_eq!(normalize_property("color"), "color");
        assert_eq!(normalize_property("--font-family-head"), "--font-family-head");
        assert_eq!(normalize_property("box-shadow"), "box-shadow");
        assert_eq!(normalize_property("WebkitBackdropFilter"), "-webkit-backdrop-filter");
        assert_eq!(normalize_property("MozUserSelect"), "-moz-user-select");
        assert_eq!(normalize_property("msTransform"), "-ms-transform");
        assert_eq!(normalize_property("msOverflowStyle"), "-ms-overflow-style");
        assert_eq!(normalize_property("ms"), "ms");
    }

    #[test]
    fn set_replaces_in_place() {
        let mut s = InlineStyle::new().with("color", "red").with("margin", "0");
        s.set("color", "blue");
        assert_eq!(s.to_css(), "color: blue; margin: 0;");
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn camel_and_kebab_are_the_same_property() {
        let mut s = InlineStyle::new().with("backgroundColor", "red");
        s.set("background-color", "blue");
        assert_eq!(s.len(), 1);
        assert_eq!(s.get("backgroundColor"), Some("blue"));
        assert_eq!(s.remove("background-color").as_deref(), Some("blue"));
        assert!(s.is_empty());
    }

    #[test]
    fn merge_overrides() {
        let mut base = InlineStyle::new().with("color", "red").with("top", "1px");
        base.merge(&InlineStyle::new().with("top", "2px").with("left", "3px"));
        let pairs: Vec<_> = base.iter().collect();
        assert_eq!(pairs, vec![("color", "red"), ("top", "2px"), ("left", "3px")]);
    }

    #[test]
    fn empty_style_renders_empty() {
        assert_eq!(InlineStyle::new().to_css(), "");
    }

    #[test]
    fn text_frame_has_tint_blur_and_shadow() {
        let config = TooltipConfig::default();
        let r = OverlayRenderer::new(&config, &Content::from("Save"));
        let f = r.frame(OverlayCoords::new(108.0, 115.0), false);

        assert_eq!(f.style.get("position"), Some("fixed"));
        assert_eq!(f.style.get("left"), Some("108px"));
        assert_eq!(f.style.get("top"), Some("115px"));
        assert_eq!(f.style.get("z-index"), Some("1500"));
        assert_eq!(f.style.get("pointer-events"), Some("none"));
        assert_eq!(f.style.get("background-color"), Some("rgba(0, 0, 0, 0.4)"));
        assert_eq!(f.style.get("box-shadow"), Some(TEXT_SHADOW));
        assert_eq!(f.style.get("backdrop-filter"), Some(TEXT_BACKDROP));
        assert_eq!(f.class_name(), "tooltip");
        assert!(r.is_text());
    }

    #[test]
    fn visual_frame_has_no_background_styling() {
        let config = TooltipConfig::default().color("#ff0000");
        let r = OverlayRenderer::new(&config, &TooltipContent::Visual(()));
        let f = r.frame(OverlayCoords::new(0.0, 0.0), true);
        assert_eq!(f.style.get("background-color"), Some("none"));
        assert_eq!(f.style.get("box-shadow"), Some("none"));
        assert_eq!(f.style.get("backdrop-filter"), Some("none"));
        assert!(!r.is_text());
    }

    #[test]
    fn color_and_opacity_drive_tint() {
        let config = TooltipConfig::default().color("#3366ff").opacity(0.75);
        let r = OverlayRenderer::new(&config, &Content::from("x"));
        let f = r.frame(OverlayCoords::default(), true);
        assert_eq!(
            f.style.get("background-color"),
            Some("rgba(51, 102, 255, 0.75)")
        );
    }

    #[test]
    fn painted_adds_visible_class_and_caller_class() {
        let config = TooltipConfig::default().class_name("hint  hint--wide");
        let r = OverlayRenderer::new(&config, &Content::from("x"));
        assert_eq!(
            r.frame(OverlayCoords::default(), true).class_name(),
            "tooltip tooltip--visible hint hint--wide"
        );
        assert_eq!(
            r.frame(OverlayCoords::default(), false).class_name(),
            "tooltip hint hint--wide"
        );
    }

    #[test]
    fn component_declarations_override_caller_style() {
        let style = InlineStyle::new()
            .with("position", "relative")
            .with("color", "white")
            .with("zIndex", "3");
        let config = TooltipConfig::default().style(style);
        let r = OverlayRenderer::new(&config, &Content::from("x"));
        let f = r.frame(OverlayCoords::new(5.0, 6.0), false);
        assert_eq!(f.style.get("position"), Some("fixed"));
        assert_eq!(f.style.get("z-index"), Some("1500"));
        assert_eq!(f.style.get("color"), Some("white"));
        // Caller declarations keep their original slot.
        assert_eq!(f.style.iter().next(), Some(("position", "fixed")));
    }

    #[test]
    fn text_wrapper_style() {
        assert_eq!(
            OverlayRenderer::text_style().to_css(),
            "font-size: 14px; font-family: var(--font-family-head);"
        );
    }

    #[test]
    fn content_accessors() {
        let t = Content::from(String::from("hi"));
        assert_eq!(t.as_text(), Some("hi"));
        let v: TooltipContent<u8> = TooltipContent::Visual(7);
        assert!(!v.is_text());
        assert_eq!(v.as_text(), None);
    }
}
