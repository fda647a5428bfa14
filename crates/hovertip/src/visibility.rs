#![forbid(unsafe_code)]

//! Debounced show/hide state machine.
//!
//! Converts raw pointer enter/leave/move events into delayed visibility
//! transitions, so that a quick pass over the anchor never flashes the
//! tooltip and a quick re-entry never cancels it.
//!
//! # State graph
//!
//! ```text
//!            enter (start show timer)
//!   Hidden ──────────────────────────► PendingShow
//!     ▲  ◄──────────────────────────── │  │
//!     │     leave (cancel show timer)  │  │ show timer
//!     │                                   ▼
//!     │ hide timer               ┌──► Visible ◄─┐ move: reposition
//!     │                    enter │       │      └─┘
//!     │                (cancel   │       │ leave (fade out,
//!     │                 hide)    │       ▼        start hide timer)
//!     └──────────────────────── PendingHide
//! ```
//!
//! # Invariants
//!
//! 1. At most one show timer and one hide timer are outstanding.
//! 2. A move during `PendingShow` refreshes the stored pointer but never
//!    restarts the show timer.
//! 3. A timer event whose id is not the outstanding timer of that kind is
//!    stale and ignored.
//! 4. Paint visibility (`painted`) is separate from the state: the overlay
//!    fades out at the start of `PendingHide` and is only unmounted when the
//!    hide timer fires.

use core::time::Duration;

use hovertip_core::event::{PointerEvent, PointerPhase};
use hovertip_core::geometry::Point;
use hovertip_core::timer::{TimerId, TimerKind, Timers};

/// Delay between mounting the overlay and painting it visible.
pub const REVEAL_DELAY: Duration = Duration::from_millis(10);

/// Visibility of one tooltip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisibilityState {
    #[default]
    Hidden,
    PendingShow,
    Visible,
    PendingHide,
}

impl VisibilityState {
    /// Whether the overlay is in the tree in this state.
    #[must_use]
    pub const fn is_mounted(self) -> bool {
        matches!(self, Self::Visible | Self::PendingHide)
    }
}

/// What the composition layer must do after a handler ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Nothing to paint.
    None,
    /// Mount the overlay, measure it, place it.
    Show,
    /// Recompute coordinates from the current pointer.
    Reposition,
    /// Paint not-visible; the overlay stays mounted.
    FadeOut,
    /// Re-entered while fading out: reposition and paint visible again.
    Restore,
    /// Mounted overlay may now be painted visible.
    Reveal,
    /// Remove the overlay from the tree.
    Unmount,
}

/// Debounced visibility controller.
#[derive(Debug, Clone)]
pub struct VisibilityController {
    state: VisibilityState,
    display_delay: Duration,
    hide_delay: Duration,
    pointer: Point,
    show_timer: Option<TimerId>,
    hide_timer: Option<TimerId>,
    reveal_timer: Option<TimerId>,
    painted: bool,
    transitions: u64,
}

impl VisibilityController {
    /// Create a controller in `Hidden`.
    #[must_use]
    pub fn new(display_delay: Duration, hide_delay: Duration) -> Self {
        Self {
            state: VisibilityState::Hidden,
            display_delay,
            hide_delay,
            pointer: Point::ORIGIN,
            show_timer: None,
            hide_timer: None,
            reveal_timer: None,
            painted: false,
            transitions: 0,
        }
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> VisibilityState {
        self.state
    }

    /// Last known pointer position. Survives hides.
    #[inline]
    #[must_use]
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Whether the overlay is painted visible (as opposed to mounted).
    #[inline]
    #[must_use]
    pub fn painted(&self) -> bool {
        self.painted
    }

    /// Outstanding show timer, if any.
    #[inline]
    #[must_use]
    pub fn show_timer(&self) -> Option<TimerId> {
        self.show_timer
    }

    /// Outstanding hide timer, if any.
    #[inline]
    #[must_use]
    pub fn hide_timer(&self) -> Option<TimerId> {
        self.hide_timer
    }

    /// Number of state changes so far (diagnostic).
    #[inline]
    #[must_use]
    pub fn transition_count(&self) -> u64 {
        self.transitions
    }

    /// Handle a pointer event over the anchor.
    pub fn on_pointer<T: Timers + ?Sized>(
        &mut self,
        event: PointerEvent,
        timers: &mut T,
    ) -> Directive {
        use PointerPhase::{Enter, Leave, Move};
        use VisibilityState::{Hidden, PendingHide, PendingShow, Visible};

        if matches!(event.phase, Enter | Move) {
            self.pointer = event.position;
        }

        match (self.state, event.phase) {
            (Hidden, Enter) => {
                self.start_show(timers);
                self.transition(PendingShow);
                Directive::None
            }
            (PendingShow, Enter) => {
                // A repeated enter restarts the debounce.
                self.start_show(timers);
                Directive::None
            }
            (PendingShow, Leave) => {
                cancel(&mut self.show_timer, timers);
                self.transition(Hidden);
                Directive::None
            }
            (Visible, Enter | Move) => Directive::Reposition,
            (Visible, Leave) => {
                cancel(&mut self.reveal_timer, timers);
                self.painted = false;
                cancel(&mut self.hide_timer, timers);
                self.hide_timer = Some(timers.schedule(TimerKind::Hide, self.hide_delay));
                self.transition(PendingHide);
                Directive::FadeOut
            }
            (PendingHide, Enter) => {
                cancel(&mut self.hide_timer, timers);
                self.painted = true;
                self.transition(Visible);
                Directive::Restore
            }
            (Hidden | PendingShow | PendingHide, Move) | (Hidden | PendingHide, Leave) => {
                Directive::None
            }
        }
    }

    /// Handle an elapsed timer.
    pub fn on_timer<T: Timers + ?Sized>(&mut self, id: TimerId, timers: &mut T) -> Directive {
        if self.show_timer == Some(id) {
            self.show_timer = None;
            if self.state != VisibilityState::PendingShow {
                return Directive::None;
            }
            self.painted = false;
            self.reveal_timer = Some(timers.schedule(TimerKind::Reveal, REVEAL_DELAY));
            self.transition(VisibilityState::Visible);
            return Directive::Show;
        }

        if self.hide_timer == Some(id) {
            self.hide_timer = None;
            if self.state != VisibilityState::PendingHide {
                return Directive::None;
            }
            self.painted = false;
            self.transition(VisibilityState::Hidden);
            return Directive::Unmount;
        }

        if self.reveal_timer == Some(id) {
            self.reveal_timer = None;
            if self.state != VisibilityState::Visible {
                return Directive::None;
            }
            self.painted = true;
            return Directive::Reveal;
        }

        hovertip_core::trace!(timer = id.raw(), state = ?self.state, "stale timer ignored");
        Directive::None
    }

    /// Abandon a show that the host could not render.
    ///
    /// Returns to `Hidden` without a hide delay; the next enter starts over.
    pub fn abort_show<T: Timers + ?Sized>(&mut self, timers: &mut T) {
        cancel(&mut self.reveal_timer, timers);
        self.painted = false;
        self.transition(VisibilityState::Hidden);
    }

    /// Cancel every outstanding timer and return to `Hidden`.
    pub fn teardown<T: Timers + ?Sized>(&mut self, timers: &mut T) {
        cancel(&mut self.show_timer, timers);
        cancel(&mut self.hide_timer, timers);
        cancel(&mut self.reveal_timer, timers);
        self.painted = false;
        self.transition(VisibilityState::Hidden);
    }

    fn start_show<T: Timers + ?Sized>(&mut self, timers: &mut T) {
        cancel(&mut self.show_timer, timers);
        self.show_timer = Some(timers.schedule(TimerKind::Show, self.display_delay));
    }

    fn transition(&mut self, to: VisibilityState) {
        if self.state == to {
            return;
        }
        hovertip_core::debug!(from = ?self.state, to = ?to, "visibility transition");
        self.state = to;
        self.transitions += 1;
    }
}

fn cancel<T: Timers + ?Sized>(slot: &mut Option<TimerId>, timers: &mut T) {
    if let Some(id) = slot.take() {
        timers.cancel(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hovertip_core::timer::TimerQueue;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn controller() -> VisibilityController {
        VisibilityController::new(ms(200), ms(500))
    }

    /// Advance the queue, feeding each expiry back into the controller.
    fn run(c: &mut VisibilityController, q: &mut TimerQueue, dt: Duration) -> Vec<Directive> {
        let until = q.now() + dt;
        let mut out = Vec::new();
        while let Some(e) = q.next_due(until) {
            out.push(c.on_timer(e.id, q));
        }
        q.settle(until);
        out
    }

    #[test]
    fn initial_state_is_hidden() {
        let c = controller();
        assert_eq!(c.state(), VisibilityState::Hidden);
        assert!(!c.painted());
        assert_eq!(c.transition_count(), 0);
    }

    #[test]
    fn enter_schedules_show() {
        let mut c = controller();
        let mut q = TimerQueue::new();
        assert_eq!(c.on_pointer(PointerEvent::enter(100.0, 100.0), &mut q), Directive::None);
        assert_eq!(c.state(), VisibilityState::PendingShow);
        assert_eq!(q.pending_of(TimerKind::Show), 1);
        assert_eq!(c.pointer(), Point::new(100.0, 100.0));
    }

    #[test]
    fn show_fires_after_display_delay() {
        let mut c = controller();
        let mut q = TimerQueue::new();
        c.on_pointer(PointerEvent::enter(100.0, 100.0), &mut q);
        assert!(run(&mut c, &mut q, ms(199)).is_empty());
        assert_eq!(run(&mut c, &mut q, ms(1)), vec![Directive::Show]);
        assert_eq!(c.state(), VisibilityState::Visible);
        assert!(!c.painted(), "mounted but not yet painted");
        assert_eq!(run(&mut c, &mut q, REVEAL_DELAY), vec![Directive::Reveal]);
        assert!(c.painted());
    }

    #[test]
    fn leave_before_delay_cancels_show() {
        let mut c = controller();
        let mut q = TimerQueue::new();
        c.on_pointer(PointerEvent::enter(0.0, 0.0), &mut q);
        run(&mut c, &mut q, ms(150));
        assert_eq!(c.on_pointer(PointerEvent::leave(0.0, 0.0), &mut q), Directive::None);
        assert_eq!(c.state(), VisibilityState::Hidden);
        assert_eq!(q.pending(), 0);
        assert!(run(&mut c, &mut q, ms(1000)).is_empty());
    }

    #[test]
    fn move_during_pending_show_does_not_restart_timer() {
        let mut c = controller();
        let mut q = TimerQueue::new();
        c.on_pointer(PointerEvent::enter(0.0, 0.0), &mut q);
        let show = c.show_timer();
        run(&mut c, &mut q, ms(150));
        c.on_pointer(PointerEvent::moved(40.0, 50.0), &mut q);
        assert_eq!(c.show_timer(), show);
        assert_eq!(run(&mut c, &mut q, ms(50)), vec![Directive::Show]);
        assert_eq!(c.pointer(), Point::new(40.0, 50.0));
    }

    #[test]
    fn repeated_enter_restarts_show() {
        let mut c = controller();
        let mut q = TimerQueue::new();
        c.on_pointer(PointerEvent::enter(0.0, 0.0), &mut q);
        run(&mut c, &mut q, ms(150));
        c.on_pointer(PointerEvent::enter(1.0, 1.0), &mut q);
        assert_eq!(q.pending_of(TimerKind::Show), 1);
        assert!(run(&mut c, &mut q, ms(150)).is_empty());
        assert_eq!(run(&mut c, &mut q, ms(50)), vec![Directive::Show]);
    }

    #[test]
    fn move_while_visible_repositions() {
        let mut c = controller();
        let mut q = TimerQueue::new();
        c.on_pointer(PointerEvent::enter(0.0, 0.0), &mut q);
        run(&mut c, &mut q, ms(200));
        assert_eq!(
            c.on_pointer(PointerEvent::moved(5.0, 6.0), &mut q),
            Directive::Reposition
        );
        assert_eq!(c.pointer(), Point::new(5.0, 6.0));
    }

    #[test]
    fn leave_while_visible_fades_then_unmounts() {
        let mut c = controller();
        let mut q = TimerQueue::new();
        c.on_pointer(PointerEvent::enter(0.0, 0.0), &mut q);
        run(&mut c, &mut q, ms(300));
        assert!(c.painted());

        assert_eq!(c.on_pointer(PointerEvent::leave(0.0, 0.0), &mut q), Directive::FadeOut);
        assert_eq!(c.state(), VisibilityState::PendingHide);
        assert!(!c.painted());
        assert!(run(&mut c, &mut q, ms(499)).is_empty());
        assert_eq!(run(&mut c, &mut q, ms(1)), vec![Directive::Unmount]);
        assert_eq!(c.state(), VisibilityState::Hidden);
    }

    #[test]
    fn reentry_during_pending_hide_restores() {
        let mut c = controller();
        let mut q = TimerQueue::new();
        c.on_pointer(PointerEvent::enter(0.0, 0.0), &mut q);
        run(&mut c, &mut q, ms(300));
        c.on_pointer(PointerEvent::leave(0.0, 0.0), &mut q);
        let hide = c.hide_timer().expect("hide scheduled");
        run(&mut c, &mut q, ms(300));

        assert_eq!(c.on_pointer(PointerEvent::enter(2.0, 2.0), &mut q), Directive::Restore);
        assert_eq!(c.state(), VisibilityState::Visible);
        assert!(c.painted());
        assert!(!q.is_pending(hide));
        assert_eq!(q.pending_of(TimerKind::Show), 0, "re-entry must not restart the show timer");
        assert!(run(&mut c, &mut q, ms(1000)).is_empty());
        assert_eq!(c.state(), VisibilityState::Visible);
    }

    #[test]
    fn leave_before_reveal_cancels_reveal() {
        let mut c = controller();
        let mut q = TimerQueue::new();
        c.on_pointer(PointerEvent::enter(0.0, 0.0), &mut q);
        run(&mut c, &mut q, ms(200));
        assert_eq!(q.pending_of(TimerKind::Reveal), 1);
        c.on_pointer(PointerEvent::leave(0.0, 0.0), &mut q);
        assert_eq!(q.pending_of(TimerKind::Reveal), 0);
        assert!(!c.painted());
    }

    #[test]
    fn stale_timer_is_ignored() {
        let mut c = controller();
        let mut q = TimerQueue::new();
        c.on_pointer(PointerEvent::enter(0.0, 0.0), &mut q);
        let stale = c.show_timer().expect("show scheduled");
        c.on_pointer(PointerEvent::leave(0.0, 0.0), &mut q);
        // Host delivered the callback anyway (cancel raced with expiry).
        assert_eq!(c.on_timer(stale, &mut q), Directive::None);
        assert_eq!(c.state(), VisibilityState::Hidden);
        assert_eq!(c.on_timer(TimerId::from_raw(9999), &mut q), Directive::None);
    }

    #[test]
    fn at_most_one_timer_of_each_kind() {
        let mut c = controller();
        let mut q = TimerQueue::new();
        for _ in 0..5 {
            c.on_pointer(PointerEvent::enter(0.0, 0.0), &mut q);
        }
        assert_eq!(q.pending_of(TimerKind::Show), 1);
        run(&mut c, &mut q, ms(250));
        for _ in 0..5 {
            c.on_pointer(PointerEvent::leave(0.0, 0.0), &mut q);
            c.on_pointer(PointerEvent::enter(0.0, 0.0), &mut q);
            c.on_pointer(PointerEvent::leave(0.0, 0.0), &mut q);
        }
        assert_eq!(q.pending_of(TimerKind::Show), 0);
        assert_eq!(q.pending_of(TimerKind::Hide), 1);
    }

    #[test]
    fn teardown_cancels_everything() {
        let mut c = controller();
        let mut q = TimerQueue::new();
        c.on_pointer(PointerEvent::enter(0.0, 0.0), &mut q);
        run(&mut c, &mut q, ms(200));
        c.on_pointer(PointerEvent::leave(0.0, 0.0), &mut q);
        c.teardown(&mut q);
        assert_eq!(q.pending(), 0);
        assert_eq!(c.state(), VisibilityState::Hidden);
        assert!(c.show_timer().is_none() && c.hide_timer().is_none());
    }

    #[test]
    fn pointer_persists_across_hide() {
        let mut c = controller();
        let mut q = TimerQueue::new();
        c.on_pointer(PointerEvent::enter(7.0, 8.0), &mut q);
        c.on_pointer(PointerEvent::leave(99.0, 99.0), &mut q);
        assert_eq!(c.pointer(), Point::new(7.0, 8.0));
    }

    #[test]
    fn abort_show_returns_to_hidden() {
        let mut c = controller();
        let mut q = TimerQueue::new();
        c.on_pointer(PointerEvent::enter(0.0, 0.0), &mut q);
        run(&mut c, &mut q, ms(200));
        c.abort_show(&mut q);
        assert_eq!(c.state(), VisibilityState::Hidden);
        assert_eq!(q.pending(), 0);
    }

    #[test]
    fn mounted_states() {
        assert!(!VisibilityState::Hidden.is_mounted());
        assert!(!VisibilityState::PendingShow.is_mounted());
        assert!(VisibilityState::Visible.is_mounted());
        assert!(VisibilityState::PendingHide.is_mounted());
    }
}
