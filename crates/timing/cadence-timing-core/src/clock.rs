//! Monotonic time sources for driving engines outside a browser host.

use std::cell::Cell;
use std::rc::Rc;

use instant::Instant;

/// Source of host monotonic time in milliseconds.
pub trait Clock {
    /// Current monotonic time in milliseconds. The origin is arbitrary;
    /// engines only take differences.
    fn now_ms(&self) -> f64;
}

/// Real clock backed by [`instant::Instant`] (usable on wasm targets too).
#[derive(Debug, Clone)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Clock with its origin at construction time.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// Hand-advanced clock for deterministic tests.
///
/// Clones share the same time cell, so a test can hand one clone to a runner
/// and keep another to advance time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ms: Rc<Cell<f64>>,
}

impl ManualClock {
    /// Clock starting at 0 ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock starting at the given time.
    pub fn starting_at(now_ms: f64) -> Self {
        let clock = Self::default();
        clock.set(now_ms);
        clock
    }

    /// Jump to an absolute time.
    pub fn set(&self, now_ms: f64) {
        self.now_ms.set(now_ms);
    }

    /// Advance by a relative amount.
    pub fn advance(&self, by_ms: f64) {
        self.now_ms.set(self.now_ms.get() + by_ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now_ms.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shares_time_across_clones() {
        let clock = ManualClock::starting_at(1000.0);
        let other = clock.clone();
        clock.advance(250.0);
        assert_eq!(other.now_ms(), 1250.0);
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
