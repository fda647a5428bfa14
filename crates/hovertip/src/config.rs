#![forbid(unsafe_code)]

//! Tooltip configuration.
//!
//! Every field is optional for the caller. Delays and opacity affect only
//! timing and paint; they never change the visibility state graph.
//!
//! # Example
//!
//! ```
//! use core::time::Duration;
//! use hovertip::config::TooltipConfig;
//!
//! let config = TooltipConfig::default()
//!     .display_delay(Duration::from_millis(300))
//!     .opacity(0.6)
//!     .color("#1e293b");
//! assert_eq!(config.hide_delay, Duration::from_millis(500));
//! ```

use core::time::Duration;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::color::clamp_unit;
use crate::render::InlineStyle;

/// Default delay before the tooltip shows.
pub const DEFAULT_DISPLAY_DELAY: Duration = Duration::from_millis(200);
/// Default delay between fade-out and unmount.
pub const DEFAULT_HIDE_DELAY: Duration = Duration::from_millis(500);
/// Default background opacity for text tooltips.
pub const DEFAULT_OPACITY: f32 = 0.4;

/// Tooltip configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipConfig {
    /// Delay before showing (default: 200ms).
    pub display_delay: Duration,
    /// Delay between fade-out and unmount (default: 500ms).
    pub hide_delay: Duration,
    /// Background opacity for text content, `0..=1` (default: 0.4).
    pub opacity: f32,
    /// Background tint as a hex colour. `None` tints black.
    pub color: Option<String>,
    /// Extra classes on the overlay element.
    pub class_name: Option<String>,
    /// Caller style, applied under the component's own declarations.
    pub style: InlineStyle,
}

impl Default for TooltipConfig {
    fn default() -> Self {
        Self {
            display_delay: DEFAULT_DISPLAY_DELAY,
            hide_delay: DEFAULT_HIDE_DELAY,
            opacity: DEFAULT_OPACITY,
            color: None,
            class_name: None,
            style: InlineStyle::default(),
        }
    }
}

impl TooltipConfig {
    /// Set delay before showing.
    #[must_use]
    pub fn display_delay(mut self, delay: Duration) -> Self {
        self.display_delay = delay;
        self
    }

    /// Set delay between fade-out and unmount.
    #[must_use]
    pub fn hide_delay(mut self, delay: Duration) -> Self {
        self.hide_delay = delay;
        self
    }

    /// Set background opacity. Clamped to `[0, 1]`; non-finite values keep
    /// the default.
    #[must_use]
    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = clamp_unit(opacity, DEFAULT_OPACITY);
        self
    }

    /// Set background tint.
    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set extra overlay classes.
    #[must_use]
    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Set caller style.
    #[must_use]
    pub fn style(mut self, style: InlineStyle) -> Self {
        self.style = style;
        self
    }

    /// Decode host-supplied JSON options.
    ///
    /// Field names are camelCase (`displayDelay`, `hideDelay`, `opacity`,
    /// `color`, `className`, `style`); delays are milliseconds. Missing
    /// fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        let json: TooltipOptionsJson = serde_json::from_str(s)?;
        Ok(Self::from(json))
    }
}

/// JSON shape of [`TooltipConfig`] as passed from a host page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipOptionsJson {
    #[serde(default)]
    pub display_delay: Option<f64>,
    #[serde(default)]
    pub hide_delay: Option<f64>,
    #[serde(default)]
    pub opacity: Option<f32>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub class_name: Option<String>,
    /// Declarations in the order the caller wrote them; `null` means none.
    #[serde(default)]
    pub style: Option<Map<String, Value>>,
}

impl From<TooltipOptionsJson> for TooltipConfig {
    fn from(json: TooltipOptionsJson) -> Self {
        let mut config = Self::default();
        if let Some(ms) = json.display_delay {
            config.display_delay = millis_to_duration(ms);
        }
        if let Some(ms) = json.hide_delay {
            config.hide_delay = millis_to_duration(ms);
        }
        if let Some(opacity) = json.opacity {
            config = config.opacity(opacity);
        }
        config.color = json.color.filter(|c| !c.trim().is_empty());
        config.class_name = json.class_name;
        for (property, value) in json.style.iter().flatten() {
            match value {
                Value::String(s) => config.style.set(property, s.clone()),
                Value::Number(n) => config.style.set(property, n.to_string()),
                other => {
                    hovertip_core::debug!(property = %property, value = %other, "ignoring non-scalar style value");
                }
            }
        }
        config
    }
}

/// Negative, NaN, or infinite delays behave like a zero `setTimeout`.
fn millis_to_duration(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_nanos((ms * 1_000_000.0).round() as u64)
    } else {
        Duration::ZERO
    }
}
