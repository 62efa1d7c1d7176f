//! Cancelable one-shot deadlines driven by caller-supplied time.
//!
//! Nothing here reads the clock. Callers pass `now` into `arm` and `poll`,
//! which keeps the session deterministic under test.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneShot {
    deadline: Option<Instant>,
}

impl OneShot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) the countdown. Any previous deadline is dropped.
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline.map(|d| d.saturating_duration_since(now))
    }

    /// True exactly once, on the first poll at or after the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

/// A payload that is discarded when its deadline passes unless taken first.
#[derive(Debug, Clone)]
pub struct Deferred<T> {
    pending: Option<T>,
    timer: OneShot,
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self {
            pending: None,
            timer: OneShot::new(),
        }
    }
}

impl<T> Deferred<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `payload` until `now + window`. Returns whatever it replaced.
    pub fn schedule(&mut self, payload: T, now: Instant, window: Duration) -> Option<T> {
        self.timer.arm(now, window);
        self.pending.replace(payload)
    }

    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Claim the payload if the window has not elapsed yet.
    pub fn take(&mut self, now: Instant) -> Option<T> {
        if self.poll(now).is_some() {
            return None;
        }
        self.timer.cancel();
        self.pending.take()
    }

    pub fn cancel(&mut self) -> Option<T> {
        self.timer.cancel();
        self.pending.take()
    }

    /// Expire the payload once the window has elapsed, handing it back.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.timer.poll(now) {
            self.pending.take()
        } else {
            None
        }
    }
}
