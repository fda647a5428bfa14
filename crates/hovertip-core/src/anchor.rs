#![forbid(unsafe_code)]

//! Anchor measurement and the cached geometry used for placement.
//!
//! The host reports an anchor's bounding box and computed padding as a
//! [`BoxMetrics`]. [`measure`] turns that into an [`AnchorRect`] holding both
//! the outer box and the padding-excluded content box.
//!
//! [`GeometryTracker`] caches the most recent anchor rect and viewport size.
//! Window resize and page scroll invalidate the cache; the owner remeasures
//! before the next placement so a pre-resize rect or viewport is never used.
//!
//! # Failure Modes
//!
//! - Anchor not mounted or has no element child: the host returns `None`
//!   and the tracker keeps the previous rect (zeroed before the first
//!   successful measurement).

use crate::geometry::{Point, Rect, Sides, Size};
use crate::placement::{OverlayCoords, place};

/// Raw box reading from the host: bounding client rect plus computed padding.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxMetrics {
    pub bounds: Rect,
    pub padding: Sides,
}

impl BoxMetrics {
    #[inline]
    pub const fn new(bounds: Rect, padding: Sides) -> Self {
        Self { bounds, padding }
    }
}

/// Outer box and content box of the hovered element, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnchorRect {
    /// Full bounding box.
    pub outer: Rect,
    /// Bounding box minus padding.
    pub content: Rect,
}

impl AnchorRect {
    pub fn x(&self) -> f64 {
        self.outer.x
    }

    pub fn y(&self) -> f64 {
        self.outer.y
    }

    pub fn width(&self) -> f64 {
        self.outer.width
    }

    pub fn height(&self) -> f64 {
        self.outer.height
    }

    pub fn content_x(&self) -> f64 {
        self.content.x
    }

    pub fn content_y(&self) -> f64 {
        self.content.y
    }

    pub fn content_width(&self) -> f64 {
        self.content.width
    }

    pub fn content_height(&self) -> f64 {
        self.content.height
    }
}

/// Compute the anchor rect from a host box reading.
#[must_use]
pub fn measure(metrics: &BoxMetrics) -> AnchorRect {
    AnchorRect {
        outer: metrics.bounds,
        content: metrics.bounds.inner(metrics.padding),
    }
}

/// Parse a computed-style length such as `"12.5px"`.
///
/// Mirrors a browser's `parseFloat`: the longest numeric prefix is used and
/// anything after it (the unit) is ignored. Input with no numeric prefix
/// yields `0.0`, the same as an element with no padding.
#[must_use]
pub fn parse_css_px(value: &str) -> f64 {
    let s = value.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }
    // Optional exponent, only if it carries digits.
    if seen_digit && end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while matches!(bytes.get(exp_end), Some(b'0'..=b'9')) {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    if !seen_digit {
        return 0.0;
    }
    s[..end].parse::<f64>().unwrap_or(0.0)
}

/// What triggered an invalidation of the cached geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidationCause {
    /// First attach, or the pointer entered the anchor.
    Mount,
    /// Window resized: both viewport and anchor rect are stale.
    Resize,
    /// Page scrolled: the anchor rect moved relative to the viewport.
    Scroll,
}

/// Cached anchor rect and viewport, with explicit invalidation.
#[derive(Debug, Clone, Default)]
pub struct GeometryTracker {
    anchor: AnchorRect,
    viewport: Size,
    stale: bool,
    last_cause: Option<InvalidationCause>,
    measure_count: u64,
}

impl GeometryTracker {
    /// Create a tracker with a zeroed rect. It starts stale.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stale: true,
            ..Self::default()
        }
    }

    /// Latest anchor measurement.
    #[inline]
    #[must_use]
    pub fn anchor(&self) -> AnchorRect {
        self.anchor
    }

    /// Latest viewport size.
    #[inline]
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Whether an invalidation arrived since the last remeasure.
    #[inline]
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Cause of the most recent invalidation.
    #[inline]
    #[must_use]
    pub fn last_invalidation(&self) -> Option<InvalidationCause> {
        self.last_cause
    }

    /// Number of successful anchor measurements (diagnostic).
    #[inline]
    #[must_use]
    pub fn measure_count(&self) -> u64 {
        self.measure_count
    }

    /// Mark cached geometry as out of date.
    pub fn invalidate(&mut self, cause: InvalidationCause) {
        crate::trace!(?cause, "geometry invalidated");
        self.stale = true;
        self.last_cause = Some(cause);
    }

    /// Record a fresh viewport size.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    /// Store a new anchor measurement.
    ///
    /// `None` means the host could not measure the anchor; the previous
    /// rect is retained. Either way the tracker is no longer stale, since
    /// the host has been asked for the current state.
    pub fn remeasure(&mut self, metrics: Option<BoxMetrics>) -> AnchorRect {
        match metrics {
            Some(m) => {
                self.anchor = measure(&m);
                self.measure_count += 1;
            }
            None => {
                crate::debug!("anchor not measurable, keeping previous rect");
            }
        }
        self.stale = false;
        self.anchor
    }

    /// Place an overlay of `overlay` size against the cached viewport.
    #[must_use]
    pub fn place(&self, pointer: Point, overlay: Size) -> OverlayCoords {
        place(pointer, overlay, self.viewport)
    }
}
