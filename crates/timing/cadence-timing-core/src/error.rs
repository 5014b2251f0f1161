//! Error types for the timing engines.

use serde::{Deserialize, Serialize};

/// Errors raised by engine configuration and the event surface.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum EngineError {
    /// Rate limit rejected by a setter or a checked constructor.
    #[error("Invalid rate limit: {limit} Hz (must be finite and greater than zero)")]
    InvalidLimit { limit: f64 },

    /// Event name that does not map to any [`crate::EventKind`].
    #[error("Unknown event name: {name}")]
    UnknownEvent { name: String },
}

impl EngineError {
    /// Get error category for logging/metrics
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidLimit { .. } => "configuration",
            Self::UnknownEvent { .. } => "event",
        }
    }
}
