#![forbid(unsafe_code)]

//! Host event vocabulary.
//!
//! Everything the host event loop can deliver to a single tooltip instance.
//! Pointer events are already scoped to the anchor by the host.

use crate::geometry::{Point, Size};
use crate::timer::TimerId;

/// Pointer event phase over the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Enter,
    Leave,
    Move,
}

/// A pointer event in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: Point,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(phase: PointerPhase, position: Point) -> Self {
        Self { phase, position }
    }

    #[must_use]
    pub const fn enter(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Enter, Point::new(x, y))
    }

    #[must_use]
    pub const fn leave(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Leave, Point::new(x, y))
    }

    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Move, Point::new(x, y))
    }
}

/// One input from the host event loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// Pointer enter/leave/move over the anchor.
    Pointer(PointerEvent),
    /// Window resized to the given viewport size.
    Resize(Size),
    /// Page (or an ancestor) scrolled.
    Scroll,
    /// A previously scheduled timer elapsed.
    Timer(TimerId),
    /// The anchor is being removed from the tree.
    Unmount,
}

impl From<PointerEvent> for HostEvent {
    fn from(ev: PointerEvent) -> Self {
        Self::Pointer(ev)
    }
}
