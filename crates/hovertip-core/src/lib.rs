#![forbid(unsafe_code)]

//! Core: geometry, anchor measurement, cursor placement, host events, and timers.

pub mod anchor;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod placement;
pub mod timer;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, warn};
