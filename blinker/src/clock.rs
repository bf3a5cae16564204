//! Periodic ticks for sampling and blinking.
use std::thread;
use std::time::{Duration, Instant};

use log::debug;

use crate::config::MIN_INTERVAL;

/// A fixed-period tick source.
///
/// Ticks are deadline based so a slow loop body does not stretch the period.
/// If a deadline has already been missed when the next one is armed, the
/// ticker re-arms from the current time instead of firing a burst of late
/// ticks, so two ticks are never closer together than the interval.
#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next: Instant,
}

impl Ticker {
    /// Create a ticker whose first deadline is one interval from now.
    ///
    /// Intervals shorter than [`MIN_INTERVAL`] are raised to it.
    pub fn new(interval: Duration) -> Self {
        if interval < MIN_INTERVAL {
            debug!("Raising tick interval {interval:?} to {MIN_INTERVAL:?}");
        }
        let interval = interval.max(MIN_INTERVAL);
        Self {
            interval,
            next: Instant::now() + interval,
        }
    }

    /// Time left until the next tick, zero if it is already due.
    pub fn remaining(&self) -> Duration {
        self.next.saturating_duration_since(Instant::now())
    }

    /// Restart the period from now.
    pub fn reset(&mut self) {
        self.next = Instant::now() + self.interval;
    }

    /// Move the deadline one period on.
    pub fn advance(&mut self) {
        let now = Instant::now();
        self.next += self.interval;
        if self.next < now {
            self.next = now + self.interval;
        }
    }

    /// Block until the next tick, then arm the one after it.
    pub fn wait(&mut self) {
        let remaining = self.remaining();
        if !remaining.is_zero() {
            thread::sleep(remaining);
        }
        self.advance();
    }
}
