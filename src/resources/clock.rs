//! Millisecond stopwatch used for frame-rate sampling and timed lifetimes.
//!
//! A [`Clock`] measures wall-clock time since it was created, minus any time
//! spent frozen. The loop freezes every clock it owns (its own frame-rate
//! clock and the clock inside each timed modifier) while paused, so a pause
//! never counts toward a lifetime.
//!
//! [`Clock::interval_elapsed`] answers "has `ms` passed since the last time
//! this returned true?" and restarts its window when it does.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Clock {
    start: Instant,
    /// Frozen-adjusted elapsed value at which the current interval began.
    last_check: Duration,
    frozen_total: Duration,
    frozen_at: Option<Instant>,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    pub fn new() -> Self {
        Clock {
            start: Instant::now(),
            last_check: Duration::ZERO,
            frozen_total: Duration::ZERO,
            frozen_at: None,
        }
    }

    /// Active time since construction.
    pub fn elapsed(&self) -> Duration {
        let now = self.frozen_at.unwrap_or_else(Instant::now);
        now.duration_since(self.start)
            .saturating_sub(self.frozen_total)
    }

    /// Active milliseconds since construction.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }

    /// Returns true at most once per `ms` window and restarts the window
    /// when it does.
    pub fn interval_elapsed(&mut self, ms: u64) -> bool {
        let now = self.elapsed();
        if now.saturating_sub(self.last_check) >= Duration::from_millis(ms) {
            self.last_check = now;
            true
        } else {
            false
        }
    }

    /// Stop the clock. Time passing while frozen is not counted.
    pub fn freeze(&mut self) {
        if self.frozen_at.is_none() {
            self.frozen_at = Some(Instant::now());
        }
    }

    pub fn thaw(&mut self) {
        if let Some(at) = self.frozen_at.take() {
            self.frozen_total += at.elapsed();
        }
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_at.is_some()
    }
}
