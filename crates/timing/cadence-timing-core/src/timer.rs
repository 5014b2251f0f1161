//! Wall-clock timer engine: fixed rearm delay, no catch-up.

use crate::config::EngineConfig;
use crate::engine::{Engine, EngineCore, Rearm};
use crate::error::EngineError;
use crate::event::{EventDispatcher, EventListener};

/// Default rate limit in Hz.
pub const DEFAULT_TIMER_LIMIT_HZ: f64 = 60.0;

/// Engine rearmed for `1000/limit` ms after every fire.
///
/// The cadence tracks wall-clock time (subject to host timer slop) and is
/// independent of `launched`: the timer keeps firing, only delivery is
/// gated. Missed real time is lost, never compensated.
pub struct TimerEngine {
    core: EngineCore,
}

impl TimerEngine {
    /// Create a timer engine; defaults to 60 Hz.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Ok(Self {
            core: EngineCore::configured(DEFAULT_TIMER_LIMIT_HZ, config)?,
        })
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self {
            core: EngineCore::with_default_limit(DEFAULT_TIMER_LIMIT_HZ),
        }
    }
}

impl Engine for TimerEngine {
    fn launched(&self) -> bool {
        self.core.launched()
    }

    fn set_launched(&mut self, launched: bool) {
        self.core.set_launched(launched);
    }

    fn limit(&self) -> f64 {
        self.core.limit()
    }

    fn set_limit(&mut self, limit: f64) -> Result<(), EngineError> {
        self.core.set_limit(limit)
    }

    fn rate(&self) -> f64 {
        self.core.rate()
    }

    fn delta(&self) -> f64 {
        self.core.delta()
    }

    fn last_tick_ms(&self) -> f64 {
        self.core.last_tick_ms()
    }

    fn pump(&mut self, now_ms: f64) -> Rearm {
        match self.core.last_tick() {
            // First fire establishes the baseline.
            None => self.core.set_last_tick(now_ms),
            Some(last) => {
                let diff = now_ms - last;
                if self.core.launched() && diff > 0.0 {
                    self.core.set_rate(1000.0 / diff);
                    self.core.deliver_tick();
                }
                // The fire time is tracked even while not launched, so the
                // first delivered tick after a relaunch measures a real
                // interval instead of the whole paused span.
                self.core.set_last_tick(now_ms);
            }
        }
        Rearm::After(self.core.interval_ms())
    }

    fn add_listener(&mut self, listener: Box<dyn EventListener>) {
        self.core.add_listener(listener);
    }

    fn dispatcher_mut(&mut self) -> &mut EventDispatcher {
        self.core.dispatcher_mut()
    }
}
