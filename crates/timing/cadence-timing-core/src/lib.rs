//! Cadence timing core (host-agnostic)
//!
//! A small family of periodic-tick engines that drive render/update loops at
//! a target rate, measure the actually achieved rate, and expose a lifecycle
//! event model. The core never talks to a host directly: every engine is
//! driven through `pump(now_ms)` and answers with a [`Rearm`] directive, so
//! adapters (wasm, native runner, tests) decide how callbacks are scheduled.

pub mod clock;
pub mod config;
pub mod display;
pub mod engine;
pub mod error;
pub mod event;
pub mod fixed_step;
pub mod frame;
pub mod runner;
pub mod timer;

// Re-exports for consumers (adapters)
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use display::{Display, Surface};
pub use engine::{Engine, Rearm};
pub use error::EngineError;
pub use event::{
    CallbackListener, CollectingListener, EngineEvent, EventDispatcher, EventKind, EventListener,
    LoggingListener,
};
pub use fixed_step::FixedStepEngine;
pub use frame::FrameEngine;
pub use runner::{Runner, StopHandle};
pub use timer::TimerEngine;

/// Timing engine result type
pub type Result<T> = core::result::Result<T, EngineError>;
