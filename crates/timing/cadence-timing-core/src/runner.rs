//! Explicit scheduler that drives one engine on the current thread.
//!
//! Outside a browser there is no host callback chain to ride, so the loop
//! has to be owned by someone. The runner makes it an explicit object with
//! deterministic teardown: a cloneable [`StopHandle`] ends the loop from a
//! signal handler, another thread, or a test.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use instant::Instant;
use log::debug;

use crate::clock::{Clock, SystemClock};
use crate::engine::{Engine, Rearm};

/// Cancellation handle for a [`Runner`] loop.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Request the running loop to end after the current pump.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Drives an engine by translating its [`Rearm`] directives into sleeps.
///
/// `Rearm::NextFrame` is simulated at a configurable refresh interval
/// (default 60 Hz) since there is no display to sync with.
pub struct Runner<E: Engine> {
    engine: E,
    clock: Box<dyn Clock>,
    frame_interval: Duration,
    stop: StopHandle,
}

impl<E: Engine> Runner<E> {
    /// Runner over the real system clock.
    pub fn new(engine: E) -> Self {
        Self::with_clock(engine, Box::new(SystemClock::new()))
    }

    /// Runner over an injected clock (tests use [`crate::ManualClock`]).
    pub fn with_clock(engine: E, clock: Box<dyn Clock>) -> Self {
        Self {
            engine,
            clock,
            frame_interval: Duration::from_micros(16_667),
            stop: StopHandle::default(),
        }
    }

    /// Interval used to simulate `Rearm::NextFrame`.
    pub fn set_frame_interval(&mut self, interval: Duration) {
        self.frame_interval = interval;
    }

    /// Handle that cancels [`run_for`](Runner::run_for) loops.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// The driven engine.
    #[inline]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The driven engine, mutably (to flip `launched`, subscribe listeners).
    #[inline]
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Execute a single pump at the clock's current time.
    pub fn step(&mut self) -> Rearm {
        self.engine.pump(self.clock.now_ms())
    }

    /// Pump the engine repeatedly for (roughly) the given wall-clock budget,
    /// honoring each pump's rearm directive, until the budget elapses or the
    /// stop handle fires.
    pub fn run_for(&mut self, budget: Duration) {
        debug!("runner loop starting, budget {budget:?}");
        let started = Instant::now();
        while !self.stop.is_stopped() && started.elapsed() < budget {
            let rearm = self.step();
            let delay = match rearm {
                Rearm::NextFrame => self.frame_interval,
                Rearm::After(ms) => Duration::from_secs_f64((ms / 1000.0).max(0.0)),
            };
            if delay.is_zero() {
                std::thread::yield_now();
            } else {
                let remaining = budget.saturating_sub(started.elapsed());
                std::thread::sleep(delay.min(remaining));
            }
        }
        debug!("runner loop finished after {:?}", started.elapsed());
    }
}
