#![forbid(unsafe_code)]

//! Cancellable one-shot timers and a deterministic, host-advanced queue.
//!
//! The tooltip never sleeps. It asks its host to schedule a callback after a
//! delay and later receives [`HostEvent::Timer`](crate::event::HostEvent::Timer)
//! with the same [`TimerId`]. In a browser the host backs this with
//! `setTimeout`; natively (and in tests) [`TimerQueue`] does the bookkeeping
//! against a [`DeterministicClock`] that only moves when the host says so.
//!
//! # Invariants
//!
//! 1. Ids are allocated monotonically and never reused, so an id observed
//!    after cancellation can be recognized as stale.
//! 2. Expiry order is deadline first, then scheduling order.

use core::time::Duration;

/// What a timer is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Display delay: fires the transition to visible.
    Show,
    /// Hide delay: fires the unmount after fade-out.
    Hide,
    /// Short tick between mounting and painting, so a fade-in can run.
    Reveal,
}

/// Opaque handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Wrap a raw id (hosts that allocate their own ids).
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Schedule-after-delay and cancel: the only timing facility the tooltip needs.
pub trait Timers {
    /// Schedule a one-shot timer. The host must later deliver
    /// `HostEvent::Timer(id)` unless the timer is cancelled first.
    fn schedule(&mut self, kind: TimerKind, delay: Duration) -> TimerId;

    /// Cancel a pending timer. Cancelling an unknown or fired id is a no-op.
    fn cancel(&mut self, id: TimerId);
}

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Set current monotonic time. Time never moves backwards.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

/// A timer that reached its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expired {
    pub id: TimerId,
    pub kind: TimerKind,
    pub deadline: Duration,
}

#[derive(Debug, Clone)]
struct Pending {
    id: TimerId,
    kind: TimerKind,
    deadline: Duration,
}

/// Host-advanced timer queue.
#[derive(Debug, Default, Clone)]
pub struct TimerQueue {
    clock: DeterministicClock,
    pending: Vec<Pending>,
    next_id: u64,
    scheduled_total: u64,
    cancelled_total: u64,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time on the queue's clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    /// Number of pending timers.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Number of pending timers of one kind.
    #[must_use]
    pub fn pending_of(&self, kind: TimerKind) -> usize {
        self.pending.iter().filter(|p| p.kind == kind).count()
    }

    /// Whether `id` is still pending.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    /// Total timers ever scheduled (diagnostic).
    #[must_use]
    pub fn scheduled_total(&self) -> u64 {
        self.scheduled_total
    }

    /// Total timers cancelled while pending (diagnostic).
    #[must_use]
    pub fn cancelled_total(&self) -> u64 {
        self.cancelled_total
    }

    /// Pop the earliest timer due at or before `until`, moving the clock to
    /// its deadline.
    ///
    /// Hosts should deliver each popped timer before popping the next one:
    /// the handler may cancel or schedule timers that change what is due.
    pub fn next_due(&mut self, until: Duration) -> Option<Expired> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.deadline <= until)
            .min_by_key(|(_, p)| (p.deadline, p.id))
            .map(|(i, _)| i)?;
        let p = self.pending.remove(idx);
        self.clock.set(p.deadline);
        Some(Expired {
            id: p.id,
            kind: p.kind,
            deadline: p.deadline,
        })
    }

    /// Move the clock to `until` without firing anything.
    ///
    /// Call after draining [`next_due`](Self::next_due).
    pub fn settle(&mut self, until: Duration) {
        self.clock.set(until);
    }

    /// Advance by `dt` and return every timer that expired, in order.
    ///
    /// Convenience for hosts that do not react to timers between expiries.
    pub fn advance(&mut self, dt: Duration) -> Vec<Expired> {
        let until = self.clock.now().saturating_add(dt);
        let mut fired = Vec::new();
        while let Some(e) = self.next_due(until) {
            fired.push(e);
        }
        self.settle(until);
        fired
    }
}

impl Timers for TimerQueue {
    fn schedule(&mut self, kind: TimerKind, delay: Duration) -> TimerId {
        self.next_id += 1;
        self.scheduled_total += 1;
        let id = TimerId(self.next_id);
        self.pending.push(Pending {
            id,
            kind,
            deadline: self.clock.now().saturating_add(delay),
        });
        id
    }

    fn cancel(&mut self, id: TimerId) {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        if self.pending.len() != before {
            self.cancelled_total += 1;
        }
    }
}
