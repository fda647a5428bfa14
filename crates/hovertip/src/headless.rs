#![forbid(unsafe_code)]

//! Deterministic in-memory host.
//!
//! [`HeadlessHost`] stands in for a real UI: timers live in a
//! [`TimerQueue`] that only moves when [`advance`](HeadlessHost::advance) is
//! called, the viewport and element sizes are plain settable values, and
//! every mount/update/unmount is recorded as a [`HostOp`] for inspection.
//!
//! ```
//! use core::time::Duration;
//! use hovertip::{HeadlessHost, TooltipConfig, TooltipOverlay};
//! use hovertip_core::event::PointerEvent;
//! use hovertip_core::geometry::Size;
//!
//! let mut host = HeadlessHost::new(Size::new(800.0, 600.0))
//!     .with_overlay_size(Size::new(100.0, 24.0));
//! let mut tip: TooltipOverlay<()> = TooltipOverlay::new("Copy", TooltipConfig::default());
//! tip.attach(&mut host);
//!
//! host.dispatch(PointerEvent::enter(10.0, 10.0), &mut tip);
//! host.advance(Duration::from_millis(250), &mut tip);
//! assert!(tip.painted());
//! ```

use core::time::Duration;

use hovertip_core::anchor::BoxMetrics;
use hovertip_core::event::HostEvent;
use hovertip_core::geometry::Size;
use hovertip_core::timer::{TimerId, TimerKind, TimerQueue, Timers};

use crate::overlay::{HostError, TooltipHost, TooltipOverlay};
use crate::render::{OverlayFrame, TooltipContent};
use crate::visibility::Directive;

/// One paint operation performed on the headless host.
#[derive(Debug, Clone, PartialEq)]
pub enum HostOp {
    Mount(OverlayFrame),
    Update(OverlayFrame),
    Unmount,
}

/// In-memory [`TooltipHost`] with a host-advanced clock.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    timers: TimerQueue,
    viewport: Size,
    anchor: Option<BoxMetrics>,
    overlay_size: Option<Size>,
    portal_available: bool,
    current: Option<OverlayFrame>,
    ops: Vec<HostOp>,
}

impl HeadlessHost {
    /// Create a host with the given viewport, no measurable anchor, and a
    /// zero-sized overlay.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            timers: TimerQueue::new(),
            viewport,
            anchor: None,
            overlay_size: Some(Size::ZERO),
            portal_available: true,
            current: None,
            ops: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_anchor(mut self, metrics: BoxMetrics) -> Self {
        self.anchor = Some(metrics);
        self
    }

    #[must_use]
    pub fn with_overlay_size(mut self, size: Size) -> Self {
        self.overlay_size = Some(size);
        self
    }

    /// Change the viewport without notifying anyone. Use
    /// [`resize`](Self::resize) to also deliver the event.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn set_anchor(&mut self, metrics: Option<BoxMetrics>) {
        self.anchor = metrics;
    }

    /// Size reported for the mounted overlay. `None` makes it unmeasurable.
    pub fn set_overlay_size(&mut self, size: Option<Size>) {
        self.overlay_size = size;
    }

    /// Whether `mount` succeeds.
    pub fn set_portal_available(&mut self, available: bool) {
        self.portal_available = available;
    }

    /// Current clock reading.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Number of outstanding timers.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.timers.pending()
    }

    /// Number of outstanding timers of `kind`.
    #[must_use]
    pub fn pending_of(&self, kind: TimerKind) -> usize {
        self.timers.pending_of(kind)
    }

    /// Every paint operation so far, oldest first.
    #[must_use]
    pub fn ops(&self) -> &[HostOp] {
        &self.ops
    }

    /// Drain the operation log.
    pub fn take_ops(&mut self) -> Vec<HostOp> {
        std::mem::take(&mut self.ops)
    }

    /// Whether an overlay is attached.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.current.is_some()
    }

    /// Frame most recently applied to the attached overlay.
    #[must_use]
    pub fn current_frame(&self) -> Option<&OverlayFrame> {
        self.current.as_ref()
    }

    /// Deliver one event to `overlay`.
    pub fn dispatch<N>(
        &mut self,
        event: impl Into<HostEvent>,
        overlay: &mut TooltipOverlay<N>,
    ) -> Directive {
        overlay.handle(event.into(), self)
    }

    /// Resize the viewport and deliver the resize event.
    pub fn resize<N>(&mut self, viewport: Size, overlay: &mut TooltipOverlay<N>) -> Directive {
        self.viewport = viewport;
        self.dispatch(HostEvent::Resize(viewport), overlay)
    }

    /// Advance the clock by `dt`, delivering each due timer to `overlay` in
    /// deadline order. Returns the directive produced by each delivery.
    pub fn advance<N>(&mut self, dt: Duration, overlay: &mut TooltipOverlay<N>) -> Vec<Directive> {
        let until = self.timers.now().saturating_add(dt);
        let mut directives = Vec::new();
        while let Some(expired) = self.timers.next_due(until) {
            directives.push(overlay.handle(HostEvent::Timer(expired.id), self));
        }
        self.timers.settle(until);
        directives
    }
}

impl Timers for HeadlessHost {
    fn schedule(&mut self, kind: TimerKind, delay: Duration) -> TimerId {
        self.timers.schedule(kind, delay)
    }

    fn cancel(&mut self, id: TimerId) {
        self.timers.cancel(id);
    }
}

impl<N> TooltipHost<N> for HeadlessHost {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn measure_anchor(&self) -> Option<BoxMetrics> {
        self.anchor
    }

    fn mount(&mut self, frame: &OverlayFrame, _content: &TooltipContent<N>) -> Result<(), HostError> {
        if !self.portal_available {
            return Err(HostError::PortalUnavailable);
        }
        self.current = Some(frame.clone());
        self.ops.push(HostOp::Mount(frame.clone()));
        Ok(())
    }

    fn update(&mut self, frame: &OverlayFrame) {
        if self.current.is_some() {
            self.current = Some(frame.clone());
            self.ops.push(HostOp::Update(frame.clone()));
        }
    }

    fn measure_overlay(&self) -> Option<Size> {
        self.current.as_ref().and(self.overlay_size)
    }

    fn unmount(&mut self) {
        if self.current.take().is_some() {
            self.ops.push(HostOp::Unmount);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TooltipConfig;
    use hovertip_core::event::PointerEvent;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn clock_only_moves_on_advance() {
        let mut host = HeadlessHost::new(Size::new(100.0, 100.0));
        let mut tip: TooltipOverlay<()> = TooltipOverlay::new("x", TooltipConfig::default());
        assert_eq!(host.now(), Duration::ZERO);
        host.advance(ms(42), &mut tip);
        assert_eq!(host.now(), ms(42));
    }

    #[test]
    fn update_without_mount_is_ignored() {
        let mut host = HeadlessHost::new(Size::new(100.0, 100.0));
        let frame = crate::render::OverlayRenderer::new(
            &TooltipConfig::default(),
            &TooltipContent::<()>::from("x"),
        )
        .frame(hovertip_core::placement::OverlayCoords::new(0.0, 0.0), true);
        TooltipHost::<()>::update(&mut host, &frame);
        assert!(host.ops().is_empty());
        assert_eq!(TooltipHost::<()>::measure_overlay(&host), None);
    }

    #[test]
    fn timers_fire_in_deadline_order_with_handler_feedback() {
        let mut host = HeadlessHost::new(Size::new(500.0, 500.0)).with_overlay_size(Size::new(10.0, 10.0));
        let mut tip: TooltipOverlay<()> = TooltipOverlay::new("x", TooltipConfig::default());
        tip.attach(&mut host);
        host.dispatch(PointerEvent::enter(1.0, 1.0), &mut tip);

        // The show timer schedules the reveal timer, which must fire within
        // the same advance.
        let directives = host.advance(ms(1000), &mut tip);
        assert_eq!(directives, vec![Directive::Show, Directive::Reveal]);
        assert_eq!(host.now(), ms(1000));
    }

    #[test]
    fn take_ops_drains() {
        let mut host = HeadlessHost::new(Size::new(500.0, 500.0)).with_overlay_size(Size::new(10.0, 10.0));
        let mut tip: TooltipOverlay<()> = TooltipOverlay::new("x", TooltipConfig::default());
        host.dispatch(PointerEvent::enter(1.0, 1.0), &mut tip);
        host.advance(ms(200), &mut tip);
        assert_eq!(host.take_ops().len(), 2);
        assert!(host.ops().is_empty());
    }
}
