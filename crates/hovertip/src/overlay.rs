#![forbid(unsafe_code)]

//! Composition of geometry, visibility, and paint for one anchor.
//!
//! [`TooltipOverlay`] is the whole tooltip: it receives every [`HostEvent`]
//! for its anchor, drives the [`VisibilityController`], keeps the
//! [`GeometryTracker`] fresh, and tells the [`TooltipHost`] what to paint.
//!
//! # Mount protocol
//!
//! Placement needs the overlay's own size, which is only known once it is
//! in the tree. On show the overlay is therefore mounted unpainted at the
//! provisional offset, measured, placed, and updated in place before the
//! reveal tick paints it.

use std::fmt;

use hovertip_core::anchor::{AnchorRect, BoxMetrics, GeometryTracker, InvalidationCause};
use hovertip_core::event::{HostEvent, PointerPhase};
use hovertip_core::geometry::Size;
use hovertip_core::placement::OverlayCoords;
use hovertip_core::timer::Timers;

use crate::config::TooltipConfig;
use crate::render::{OverlayFrame, OverlayRenderer, TooltipContent};
use crate::visibility::{Directive, VisibilityController, VisibilityState};

/// Why a host could not mount the overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    /// No root to attach the overlay to (no document body, no window).
    PortalUnavailable,
    /// The host rejected the mount for another reason.
    Mount(String),
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PortalUnavailable => write!(f, "no root element to attach the overlay to"),
            Self::Mount(msg) => write!(f, "overlay mount failed: {msg}"),
        }
    }
}

impl std::error::Error for HostError {}

/// Services a UI host provides to one tooltip.
///
/// `N` is the host's visual node type for [`TooltipContent::Visual`].
pub trait TooltipHost<N>: Timers {
    /// Current viewport size in CSS pixels.
    fn viewport(&self) -> Size;

    /// Bounding box and padding of the anchor, or `None` when it is not
    /// measurable (not mounted, no child element).
    fn measure_anchor(&self) -> Option<BoxMetrics>;

    /// Attach the overlay at the document root with `frame` applied.
    fn mount(&mut self, frame: &OverlayFrame, content: &TooltipContent<N>) -> Result<(), HostError>;

    /// Re-apply position, classes, and style to the mounted overlay.
    fn update(&mut self, frame: &OverlayFrame);

    /// Rendered size of the mounted overlay.
    fn measure_overlay(&self) -> Option<Size>;

    /// Detach the overlay. A no-op when nothing is mounted.
    fn unmount(&mut self);
}

/// One tooltip bound to one anchor.
#[derive(Debug, Clone)]
pub struct TooltipOverlay<N> {
    content: TooltipContent<N>,
    renderer: OverlayRenderer,
    geometry: GeometryTracker,
    visibility: VisibilityController,
    coords: Option<OverlayCoords>,
    overlay_size: Size,
    mounted: bool,
    suppressed: u64,
}

impl<N> TooltipOverlay<N> {
    /// Create a hidden tooltip showing `content`.
    #[must_use]
    pub fn new(content: impl Into<TooltipContent<N>>, config: TooltipConfig) -> Self {
        let content = content.into();
        let renderer = OverlayRenderer::new(&config, &content);
        Self {
            content,
            renderer,
            geometry: GeometryTracker::new(),
            visibility: VisibilityController::new(config.display_delay, config.hide_delay),
            coords: None,
            overlay_size: Size::ZERO,
            mounted: false,
            suppressed: 0,
        }
    }

    /// Take the initial anchor and viewport measurement.
    pub fn attach<H: TooltipHost<N> + ?Sized>(&mut self, host: &mut H) {
        self.geometry.invalidate(InvalidationCause::Mount);
        self.geometry.set_viewport(host.viewport());
        self.geometry.remeasure(host.measure_anchor());
    }

    /// Dispatch one host event.
    pub fn handle<H: TooltipHost<N> + ?Sized>(&mut self, event: HostEvent, host: &mut H) -> Directive {
        let span = hovertip_core::debug_span!(
            "tooltip.handle",
            event = ?event,
            state = ?self.visibility.state()
        );
        let _guard = span.enter();

        let directive = match event {
            HostEvent::Pointer(pointer) => {
                if pointer.phase == PointerPhase::Enter {
                    self.geometry.remeasure(host.measure_anchor());
                }
                self.visibility.on_pointer(pointer, host)
            }
            HostEvent::Resize(viewport) => {
                self.geometry.invalidate(InvalidationCause::Resize);
                self.geometry.set_viewport(viewport);
                self.geometry.remeasure(host.measure_anchor());
                Directive::None
            }
            HostEvent::Scroll => {
                self.geometry.invalidate(InvalidationCause::Scroll);
                self.geometry.remeasure(host.measure_anchor());
                Directive::None
            }
            HostEvent::Timer(id) => self.visibility.on_timer(id, host),
            HostEvent::Unmount => {
                self.teardown(host);
                return Directive::Unmount;
            }
        };

        self.apply(directive, host);
        directive
    }

    /// Cancel all timers and remove the overlay.
    pub fn teardown<H: TooltipHost<N> + ?Sized>(&mut self, host: &mut H) {
        self.visibility.teardown(host);
        self.remove(host);
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> VisibilityState {
        self.visibility.state()
    }

    /// Whether the overlay is painted visible.
    #[inline]
    #[must_use]
    pub fn painted(&self) -> bool {
        self.visibility.painted()
    }

    /// Whether the overlay is in the host tree.
    #[inline]
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Placed coordinates. `None` unless the overlay is mounted.
    #[inline]
    #[must_use]
    pub fn overlay_coords(&self) -> Option<OverlayCoords> {
        self.coords
    }

    /// Latest anchor measurement.
    #[inline]
    #[must_use]
    pub fn anchor_rect(&self) -> AnchorRect {
        self.geometry.anchor()
    }

    /// Viewport the next placement will use.
    #[inline]
    #[must_use]
    pub fn viewport(&self) -> Size {
        self.geometry.viewport()
    }

    #[inline]
    #[must_use]
    pub fn content(&self) -> &TooltipContent<N> {
        &self.content
    }

    /// Number of shows abandoned because the host could not render.
    #[inline]
    #[must_use]
    pub fn suppressed_count(&self) -> u64 {
        self.suppressed
    }

    fn apply<H: TooltipHost<N> + ?Sized>(&mut self, directive: Directive, host: &mut H) {
        match directive {
            Directive::None => {}
            Directive::Show => self.show(host),
            Directive::Reposition | Directive::Restore => self.reposition(host),
            Directive::FadeOut | Directive::Reveal => self.repaint(host),
            Directive::Unmount => self.remove(host),
        }
    }

    fn show<H: TooltipHost<N> + ?Sized>(&mut self, host: &mut H) {
        self.ensure_fresh(host);
        let pointer = self.visibility.pointer();
        let provisional = OverlayCoords::provisional(pointer);
        let frame = self.renderer.frame(provisional, false);

        if let Err(err) = host.mount(&frame, &self.content) {
            hovertip_core::warn!(%err, "tooltip suppressed");
            self.suppress(host);
            return;
        }
        self.mounted = true;

        let Some(size) = host.measure_overlay() else {
            hovertip_core::debug!("overlay not measurable after mount, suppressing");
            self.suppress(host);
            return;
        };
        self.overlay_size = size;

        let coords = self.geometry.place(pointer, size);
        self.coords = Some(coords);
        host.update(&self.renderer.frame(coords, false));
    }

    fn reposition<H: TooltipHost<N> + ?Sized>(&mut self, host: &mut H) {
        if !self.mounted {
            return;
        }
        self.ensure_fresh(host);
        if let Some(size) = host.measure_overlay() {
            self.overlay_size = size;
        }
        let coords = self.geometry.place(self.visibility.pointer(), self.overlay_size);
        self.coords = Some(coords);
        host.update(&self.renderer.frame(coords, self.visibility.painted()));
    }

    fn repaint<H: TooltipHost<N> + ?Sized>(&mut self, host: &mut H) {
        if let (true, Some(coords)) = (self.mounted, self.coords) {
            host.update(&self.renderer.frame(coords, self.visibility.painted()));
        }
    }

    fn remove<H: TooltipHost<N> + ?Sized>(&mut self, host: &mut H) {
        if self.mounted {
            host.unmount();
            self.mounted = false;
        }
        self.coords = None;
    }

    fn suppress<H: TooltipHost<N> + ?Sized>(&mut self, host: &mut H) {
        self.remove(host);
        self.visibility.abort_show(host);
        self.suppressed += 1;
    }

    fn ensure_fresh<H: TooltipHost<N> + ?Sized>(&mut self, host: &mut H) {
        if self.geometry.is_stale() {
            self.geometry.set_viewport(host.viewport());
            self.geometry.remeasure(host.measure_anchor());
        }
    }
}
