#![forbid(unsafe_code)]

//! Cursor-following tooltip.
//!
//! A [`TooltipOverlay`] shows `content` near the pointer after the pointer
//! rests on an anchor for `display_delay`, follows the pointer while shown,
//! keeps itself inside the right and bottom edges of the viewport, and fades
//! out `hide_delay` after the pointer leaves. All host interaction goes
//! through [`TooltipHost`]; [`HeadlessHost`] is a deterministic in-memory
//! implementation.

pub mod color;
pub mod config;
pub mod headless;
pub mod overlay;
pub mod render;
pub mod visibility;

pub use config::TooltipConfig;
pub use headless::{HeadlessHost, HostOp};
pub use overlay::{HostError, TooltipHost, TooltipOverlay};
pub use render::{InlineStyle, OverlayFrame, OverlayRenderer, TooltipContent};
pub use visibility::{Directive, VisibilityController, VisibilityState};
