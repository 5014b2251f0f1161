//! Construction options shared by all engine variants.

use serde::{Deserialize, Serialize};

/// Options accepted by every engine constructor.
/// Keep this minimal; each variant supplies its own defaults for everything
/// the config leaves unset.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Start with tick delivery enabled.
    #[serde(default)]
    pub launch: bool,

    /// Override the variant's default rate limit (Hz). `None` keeps the
    /// variant default. Explicit values are validated at construction.
    #[serde(default)]
    pub limit: Option<f64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            launch: false,
            limit: None,
        }
    }
}

impl EngineConfig {
    /// Config that launches immediately with the variant's default limit.
    #[inline]
    pub fn launched() -> Self {
        Self {
            launch: true,
            limit: None,
        }
    }

    /// Set an explicit rate limit (Hz).
    #[inline]
    pub fn with_limit(mut self, limit: f64) -> Self {
        self.limit = Some(limit);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_yields_defaults() {
        let cfg: EngineConfig = serde_json::from_str("{}").unwrap();
        assert!(!cfg.launch);
        assert!(cfg.limit.is_none());
    }

    #[test]
    fn test_explicit_fields_roundtrip() {
        let cfg: EngineConfig = serde_json::from_str(r#"{"launch":true,"limit":30.0}"#).unwrap();
        assert!(cfg.launch);
        assert_eq!(cfg.limit, Some(30.0));

        let json = serde_json::to_string(&cfg).unwrap();
        let back: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.limit, Some(30.0));
    }
}
