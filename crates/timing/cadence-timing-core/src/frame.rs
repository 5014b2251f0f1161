//! Frame-synced engine: rides the host's display refresh and thins frames
//! down to the configured limit.

use crate::config::EngineConfig;
use crate::engine::{Engine, EngineCore, Rearm};
use crate::error::EngineError;
use crate::event::{EventDispatcher, EventListener};

/// Engine that accepts a tick whenever the elapsed time since the previous
/// accepted tick exceeds the interval implied by `limit`, and skips the host
/// frame otherwise.
///
/// With a limit below the host refresh rate this thins frames coarsely: the
/// achieved rate oscillates around the limit rather than matching it exactly,
/// because the frame times are host-controlled and cannot be rescheduled.
/// The default limit is unbounded, so every host frame is accepted.
pub struct FrameEngine {
    core: EngineCore,
}

impl FrameEngine {
    /// Create a frame-synced engine. The config's explicit limit is
    /// validated; the default is unbounded.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Ok(Self {
            core: EngineCore::configured(f64::INFINITY, config)?,
        })
    }
}

impl Default for FrameEngine {
    fn default() -> Self {
        Self {
            core: EngineCore::with_default_limit(f64::INFINITY),
        }
    }
}

impl Engine for FrameEngine {
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
            // First frame only samples the timestamp, so start-up never sees
            // a spurious delta.
            None => self.core.set_last_tick(now_ms),
            Some(last) => {
                let diff = now_ms - last;
                if diff > self.core.interval_ms() {
                    self.core.set_rate(1000.0 / diff);
                    self.core.set_last_tick(now_ms);
                    if self.core.launched() {
                        self.core.deliver_tick();
                    }
                }
                // Below the limit interval: skip silently, no state changes.
            }
        }
        Rearm::NextFrame
    }

    fn add_listener(&mut self, listener: Box<dyn EventListener>) {
        self.core.add_listener(listener);
    }

    fn dispatcher_mut(&mut self) -> &mut EventDispatcher {
        self.core.dispatcher_mut()
    }
}
