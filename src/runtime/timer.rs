//! Cooperative timers polled from the frame stream.
//!
//! No threads, no callbacks: controllers arm a timer and ask it on each
//! tick whether it fired. Re-arming before expiry replaces the pending
//! deadline (cancel-and-reschedule).

use crate::foundation::core::Millis;

/// One-shot deadline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Deadline {
    at: Option<Millis>,
}

impl Deadline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, at: Millis) {
        self.at = Some(at);
    }

    pub fn cancel(&mut self) {
        self.at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.at.is_some()
    }

    /// True exactly once when `now` has reached the deadline; clears it.
    pub fn fire_if_due(&mut self, now: Millis) -> bool {
        match self.at {
            Some(at) if now >= at => {
                self.at = None;
                true
            }
            _ => false,
        }
    }
}

/// Trailing-edge debouncer: each trigger replaces the pending deadline;
/// the callback side runs only after a quiet window of `delay_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Debouncer {
    delay_ms: u64,
    deadline: Deadline,
}

impl Debouncer {
    pub fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            deadline: Deadline::new(),
        }
    }

    pub fn trigger(&mut self, now: Millis) {
        self.deadline.arm(now.plus(self.delay_ms));
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_armed()
    }

    /// True exactly once when the quiet window has elapsed.
    pub fn fire_if_due(&mut self, now: Millis) -> bool {
        self.deadline.fire_if_due(now)
    }
}
