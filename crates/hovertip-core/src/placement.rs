#![forbid(unsafe_code)]

//! Cursor-relative overlay placement.
//!
//! The overlay sits below-right of the pointer by a fixed offset. When that
//! would push it past the right or bottom edge of the viewport it is pulled
//! back inside:
//!
//! - **Right overflow**: the overlay is pinned `EDGE_MARGIN` px from the
//!   right edge.
//! - **Bottom overflow**: the overlay flips above the pointer, leaving
//!   `EDGE_MARGIN` px between its bottom edge and the pointer.
//!
//! # Invariants
//!
//! 1. For a pointer inside the viewport and an overlay no larger than the
//!    viewport, `x + width <= viewport.width` and `y + height <= viewport.height`.
//! 2. Left and top edges are never corrected. An overlay wider than the
//!    space left of the pointer, or taller than the space above it, can end
//!    up at a negative coordinate. The tooltip normally opens below-right of
//!    the cursor, so only the far edges are clamped.

use crate::geometry::{Point, Size};

/// Horizontal distance from the pointer to the overlay's left edge.
pub const OFFSET_X: f64 = 8.0;
/// Vertical distance from the pointer to the overlay's top edge.
pub const OFFSET_Y: f64 = 15.0;
/// Gap kept between a clamped overlay and the viewport edge (or the pointer,
/// when flipped above it).
pub const EDGE_MARGIN: f64 = 15.0;

/// Top-left corner at which the floating overlay is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlayCoords {
    pub x: f64,
    pub y: f64,
}

impl OverlayCoords {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unclamped position: pointer plus the fixed offset.
    #[inline]
    pub fn provisional(pointer: Point) -> Self {
        Self::new(pointer.x + OFFSET_X, pointer.y + OFFSET_Y)
    }

    /// CSS `left` value, e.g. `"108px"`.
    pub fn css_left(&self) -> String {
        css_px(self.x)
    }

    /// CSS `top` value, e.g. `"115px"`.
    pub fn css_top(&self) -> String {
        css_px(self.y)
    }
}

impl From<OverlayCoords> for Point {
    fn from(c: OverlayCoords) -> Self {
        Point::new(c.x, c.y)
    }
}

/// Compute where to draw an overlay of `overlay` size for the given pointer.
#[must_use]
pub fn place(pointer: Point, overlay: Size, viewport: Size) -> OverlayCoords {
    let OverlayCoords { mut x, mut y } = OverlayCoords::provisional(pointer);

    if x + overlay.width > viewport.width {
        x = viewport.width - overlay.width - EDGE_MARGIN;
    }

    if y + overlay.height > viewport.height {
        y = pointer.y - overlay.height - EDGE_MARGIN;
    }

    OverlayCoords { x, y }
}

fn css_px(v: f64) -> String {
    if v.fract() == 0.0 && v.is_finite() {
        format!("{}px", v as i64)
    } else {
        format!("{v}px")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unclamped_applies_offset() {
        let c = place(
            Point::new(100.0, 100.0),
            Size::new(80.0, 40.0),
            Size::new(1024.0, 768.0),
        );
        assert_eq!(c, OverlayCoords::new(108.0, 115.0));
    }

    #[test]
    fn right_overflow_pins_to_edge() {
        let c = place(
            Point::new(100.0, 20.0),
            Size::new(80.0, 40.0),
            Size::new(150.0, 150.0),
        );
        assert_eq!(c.x, 150.0 - 80.0 - 15.0);
        assert_eq!(c.y, 35.0);
    }

    #[test]
    fn bottom_overflow_flips_above_pointer() {
        let c = place(
            Point::new(10.0, 120.0),
            Size::new(80.0, 40.0),
            Size::new(400.0, 150.0),
        );
        assert_eq!(c.x, 18.0);
        assert_eq!(c.y, 120.0 - 40.0 - 15.0);
    }

    #[test]
    fn exact_fit_is_not_clamped() {
        // 108 + 42 == 150: touching the edge is not overflow.
        let c = place(
            Point::new(100.0, 0.0),
            Size::new(42.0, 10.0),
            Size::new(150.0, 150.0),
        );
        assert_eq!(c.x, 108.0);
    }

    #[test]
    fn left_and_top_overflow_are_left_alone() {
        // Overlay wider than the viewport: pinned x goes negative and stays.
        let c = place(
            Point::new(5.0, 5.0),
            Size::new(200.0, 200.0),
            Size::new(150.0, 150.0),
        );
        assert_eq!(c.x, 150.0 - 200.0 - 15.0);
        assert!(c.x < 0.0);
        assert_eq!(c.y, 5.0 - 200.0 - 15.0);
        assert!(c.y < 0.0);
    }

    #[test]
    fn css_values() {
        let c = OverlayCoords::new(108.0, 115.5);
        assert_eq!(c.css_left(), "108px");
        assert_eq!(c.css_top(), "115.5px");
        assert_eq!(OverlayCoords::new(-65.0, 0.0).css_left(), "-65px");
    }
}
