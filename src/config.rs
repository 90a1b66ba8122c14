//! Engine configuration

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// Default ceiling on schema nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Largest `max_depth` a configuration may request.
///
/// Each schema level costs two levels of JSON nesting (array + object), so this
/// stays below the JSON reader's own recursion limit.
pub const MAX_DEPTH_CEILING: usize = 48;

/// Extraction engine configuration
///
/// ```rust
/// use schema_extractor::EngineConfig;
///
/// let config = EngineConfig::from_json_str(r#"{"max_depth": 8}"#).unwrap();
/// assert_eq!(config.max_depth, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum number of nested field levels a schema may declare
    pub max_depth: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl EngineConfig {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Load from a JSON document; missing keys keep their defaults
    pub fn from_json_str(json: &str) -> Result<Self, SchemaError> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| SchemaError::InvalidConfig {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.max_depth == 0 {
            return Err(SchemaError::InvalidConfig {
                message: "max_depth must be at least 1".to_string(),
            });
        }
        if self.max_depth > MAX_DEPTH_CEILING {
            return Err(SchemaError::InvalidConfig {
                message: format!(
                    "max_depth {} exceeds the ceiling of {}",
                    self.max_depth, MAX_DEPTH_CEILING
                ),
            });
        }
        Ok(())
    }
}
