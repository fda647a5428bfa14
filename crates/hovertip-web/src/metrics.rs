#![forbid(unsafe_code)]

//! Conversions from raw DOM readings to core geometry.
//!
//! Kept free of `web-sys` so the arithmetic is testable on native targets.

use core::time::Duration;

use hovertip_core::anchor::{BoxMetrics, parse_css_px};
use hovertip_core::geometry::{Rect, Sides};

/// Computed-style padding properties, in [`Sides`] order.
pub const PADDING_PROPERTIES: [&str; 4] =
    ["padding-top", "padding-right", "padding-bottom", "padding-left"];

/// Build anchor metrics from a client rect and computed padding strings
/// (top, right, bottom, left). Unparsable padding counts as zero.
#[must_use]
pub fn box_metrics(x: f64, y: f64, width: f64, height: f64, padding: [&str; 4]) -> BoxMetrics {
    let [top, right, bottom, left] = padding.map(parse_css_px);
    BoxMetrics::new(
        Rect::new(x, y, width, height),
        Sides::new(top, right, bottom, left),
    )
}

/// `setTimeout` delay for `delay`, saturating at the largest value the
/// browser accepts.
#[must_use]
pub fn timeout_millis(delay: Duration) -> i32 {
    i32::try_from(delay.as_millis()).unwrap_or(i32::MAX)
}
