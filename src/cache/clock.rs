//! Time sources for cache expiry.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

pub trait Clock: Send + Sync + fmt::Debug {
    fn now(&self) -> Instant;
}

/// Wall-clock monotonic time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Starts at the instant it was created; [`ManualClock::advance`] moves it
/// forward, saturating at the latest instant the platform can represent.
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    now: Mutex<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        let origin = Instant::now();
        Self {
            origin,
            now: Mutex::new(origin),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.lock();
        *now = saturating_add(*now, by);
    }

    /// Time elapsed since creation, as seen by this clock.
    pub fn elapsed(&self) -> Duration {
        self.lock().saturating_duration_since(self.origin)
    }

    fn lock(&self) -> MutexGuard<'_, Instant> {
        // an Instant is always valid, so a poisoned lock is still usable
        self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.lock()
    }
}

/// `t + by`, or the furthest instant reachable from `t` when that overflows.
fn saturating_add(t: Instant, by: Duration) -> Instant {
    if let Some(later) = t.checked_add(by) {
        return later;
    }
    let mut t = t;
    let mut step = by;
    while !step.is_zero() {
        step /= 2;
        if let Some(later) = t.checked_add(step) {
            t = later;
        }
    }
    t
}
