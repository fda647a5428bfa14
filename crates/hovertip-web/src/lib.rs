#![forbid(unsafe_code)]

//! DOM binding for hovertip.
//!
//! Exposes [`WebTooltip`] to JavaScript. It listens for `mouseenter`,
//! `mouseleave`, and `mousemove` on an anchor wrapper and for `resize` and
//! `scroll` on `window`, schedules its delays with `setTimeout`, and mounts
//! the overlay as a `div` appended to `document.body`.
//!
//! ```js
//! const tip = new WebTooltip(wrapper, "Delete item", { displayDelay: 300 });
//! // later
//! tip.destroy();
//! ```

pub mod metrics;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{DomHost, ListenerGuard, WebTooltip};

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct WebTooltip;

#[cfg(not(target_arch = "wasm32"))]
impl WebTooltip {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }

    /// Nothing to release natively.
    pub fn destroy(&mut self) {}

    /// Always `false` natively: there is no DOM to attach to.
    #[must_use]
    pub fn is_active(&self) -> bool {
        false
    }
}
