//! Engine contract and the tick-delivery state shared by all variants.

use log::warn;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::event::{EngineEvent, EventDispatcher, EventListener};

/// How the host should schedule the next callback after a `pump`.
///
/// Engines never stop asking to be rearmed; only tick *delivery* is gated by
/// `launched`. Adapters translate this directive into their host primitive
/// (`requestAnimationFrame`, `setTimeout`, a sleep in the native runner).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rearm {
    /// Ride the host's next display frame.
    NextFrame,
    /// Fire again after the given delay in milliseconds (0 means "as soon as
    /// possible").
    After(f64),
}

/// Common contract of the tick-strategy variants.
///
/// Timestamps are host monotonic milliseconds; engines only ever take
/// differences, so the origin is irrelevant. `delta()` is the reciprocal of
/// `rate()` and is defined as `0.0` while no tick has been measured yet.
pub trait Engine {
    /// Whether tick delivery is currently active.
    fn launched(&self) -> bool;

    /// Set tick delivery. Emits `Change` when the value actually flips and
    /// `Launch` on every `true` assignment, including repeated ones.
    fn set_launched(&mut self, launched: bool);

    /// Configured maximum tick rate in Hz.
    fn limit(&self) -> f64;

    /// Set the maximum tick rate. Non-finite or non-positive values are
    /// rejected with [`EngineError::InvalidLimit`] and leave state untouched.
    fn set_limit(&mut self, limit: f64) -> Result<(), EngineError>;

    /// Measured ticks per second over the last accepted interval (0 until
    /// the first tick).
    fn rate(&self) -> f64;

    /// Seconds per tick; `0.0` while `rate()` is zero.
    fn delta(&self) -> f64;

    /// Host monotonic time (ms) of the previous accepted tick, 0 before the
    /// first timestamp sample.
    fn last_tick_ms(&self) -> f64;

    /// Host-callback entry point. Called by the adapter on every scheduled
    /// callback with the current monotonic time in milliseconds.
    fn pump(&mut self, now_ms: f64) -> Rearm;

    /// Subscribe a listener to this engine's events.
    fn add_listener(&mut self, listener: Box<dyn EventListener>);

    /// Direct access to the dispatcher, used by consumers that re-dispatch
    /// synthetic events through the engine's listener set.
    fn dispatcher_mut(&mut self) -> &mut EventDispatcher;
}

/// State and event plumbing embedded in every concrete engine.
pub(crate) struct EngineCore {
    launched: bool,
    limit: f64,
    last_tick_ms: Option<f64>,
    rate: f64,
    started: bool,
    dispatcher: EventDispatcher,
}

impl EngineCore {
    /// Core with a variant default limit. The default may be unbounded
    /// (`f64::INFINITY`); the setter only ever accepts finite values.
    pub(crate) fn with_default_limit(limit: f64) -> Self {
        Self {
            launched: false,
            limit,
            last_tick_ms: None,
            rate: 0.0,
            started: false,
            dispatcher: EventDispatcher::new(),
        }
    }

    /// Apply construction options; an explicit limit is validated.
    pub(crate) fn configured(limit: f64, config: EngineConfig) -> Result<Self, EngineError> {
        let mut core = Self::with_default_limit(limit);
        core.launched = config.launch;
        if let Some(limit) = config.limit {
            core.set_limit(limit)?;
        }
        Ok(core)
    }

    #[inline]
    pub(crate) fn launched(&self) -> bool {
        self.launched
    }

    pub(crate) fn set_launched(&mut self, launched: bool) {
        let flipped = launched != self.launched;
        self.launched = launched;
        // Change first, so a Launch listener already observes the new value.
        if flipped {
            self.dispatcher.dispatch(&EngineEvent::Change);
        }
        if launched {
            self.dispatcher.dispatch(&EngineEvent::Launch);
        }
    }

    #[inline]
    pub(crate) fn limit(&self) -> f64 {
        self.limit
    }

    pub(crate) fn set_limit(&mut self, limit: f64) -> Result<(), EngineError> {
        if !limit.is_finite() || limit <= 0.0 {
            warn!("rejecting rate limit {limit} Hz");
            return Err(EngineError::InvalidLimit { limit });
        }
        self.limit = limit;
        Ok(())
    }

    /// Minimum interval between accepted ticks, in milliseconds. Zero when
    /// the limit is unbounded.
    #[inline]
    pub(crate) fn interval_ms(&self) -> f64 {
        1000.0 / self.limit
    }

    #[inline]
    pub(crate) fn rate(&self) -> f64 {
        self.rate
    }

    #[inline]
    pub(crate) fn set_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    #[inline]
    pub(crate) fn delta(&self) -> f64 {
        if self.rate == 0.0 {
            0.0
        } else {
            1.0 / self.rate
        }
    }

    #[inline]
    pub(crate) fn last_tick(&self) -> Option<f64> {
        self.last_tick_ms
    }

    #[inline]
    pub(crate) fn last_tick_ms(&self) -> f64 {
        self.last_tick_ms.unwrap_or(0.0)
    }

    #[inline]
    pub(crate) fn set_last_tick(&mut self, now_ms: f64) {
        self.last_tick_ms = Some(now_ms);
    }

    #[inline]
    pub(crate) fn advance_last_tick(&mut self, by_ms: f64) {
        if let Some(last) = self.last_tick_ms {
            self.last_tick_ms = Some(last + by_ms);
        }
    }

    /// Deliver one tick event, latching `Start` in front of the first one.
    pub(crate) fn deliver_tick(&mut self) {
        if !self.started {
            self.started = true;
            self.dispatcher.dispatch(&EngineEvent::Start);
        }
        self.dispatcher.dispatch(&EngineEvent::Tick);
    }

    pub(crate) fn add_listener(&mut self, listener: Box<dyn EventListener>) {
        self.dispatcher.add_listener(listener);
    }

    #[inline]
    pub(crate) fn dispatcher_mut(&mut self) -> &mut EventDispatcher {
        &mut self.dispatcher
    }
}
