//! Fixed-step engine: deterministic step cadence with catch-up bursts and an
//! injected activity gate.

use crate::config::EngineConfig;
use crate::engine::{Engine, EngineCore, Rearm};
use crate::error::EngineError;
use crate::event::{EventDispatcher, EventListener};

/// Default rate limit in Hz.
pub const DEFAULT_FIXED_STEP_LIMIT_HZ: f64 = 120.0;

/// Engine that decouples the update cadence from host frame timing.
///
/// Every pump drains whole `1000/limit` ms steps out of the elapsed real
/// time and delivers them as a burst of tick events, so consumers get a
/// rate-independent cadence that catches up instead of freezing when the
/// host throttles callbacks. The fractional remainder carries into the next
/// pump, which keeps the cadence drift-free.
///
/// Delivery requires both `launched` and the activity gate: while inactive,
/// step time still advances but the events are dropped, never queued for a
/// later replay. Adapters wire the gate to whatever "host has focus" signal
/// they have; the engine itself knows nothing about windows.
pub struct FixedStepEngine {
    core: EngineCore,
    active: bool,
}

impl FixedStepEngine {
    /// Create a fixed-step engine; defaults to 120 Hz and active.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Ok(Self {
            core: EngineCore::configured(DEFAULT_FIXED_STEP_LIMIT_HZ, config)?,
            active: true,
        })
    }

    /// Whether tick delivery is currently allowed by the activity gate.
    #[inline]
    pub fn active(&self) -> bool {
        self.active
    }

    /// Toggle the activity gate (e.g. from host focus/blur notifications).
    #[inline]
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }
}

impl Default for FixedStepEngine {
    fn default() -> Self {
        Self {
            core: EngineCore::with_default_limit(DEFAULT_FIXED_STEP_LIMIT_HZ),
            active: true,
        }
    }
}

impl Engine for FixedStepEngine {
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
            None => self.core.set_last_tick(now_ms),
            Some(last) => {
                let elapsed = now_ms - last;
                let step = self.core.interval_ms();
                if elapsed > 0.0 && step > 0.0 {
                    let count = (elapsed / step).floor() as u64;
                    if count > 0 {
                        // Reported rate reflects how many whole steps fit in
                        // the interval, not a single-step instantaneous rate.
                        self.core.set_rate(1000.0 * count as f64 / elapsed);
                        if self.core.launched() && self.active {
                            for _ in 0..count {
                                self.core.deliver_tick();
                            }
                        }
                        // Advance by whole steps only; the remainder carries
                        // into the next elapsed computation.
                        self.core.advance_last_tick(count as f64 * step);
                    }
                }
            }
        }
        Rearm::After(0.0)
    }

    fn add_listener(&mut self, listener: Box<dyn EventListener>) {
        self.core.add_listener(listener);
    }

    fn dispatcher_mut(&mut self) -> &mut EventDispatcher {
        self.core.dispatcher_mut()
    }
}
