//! Editor configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Tunables for the editor. Every field has a default, so partial JSON works.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Width and height of the exported poster, in pixels.
    pub canvas_size: u32,
    /// Size of the bottom-right resize handle.
    pub handle_size: f64,
    /// How far outside the element the handle still hits.
    pub handle_slop: f64,
    /// Minimum width/height a resize can produce.
    pub min_size: f64,
    /// Offset applied to both `left` and `top` of a duplicate.
    pub duplicate_offset: f64,
    pub export_file_name: String,
    /// How long the "copied" confirmation stays visible.
    pub copy_feedback_ms: u64,
    /// Source used by the "add image" tool.
    pub placeholder_image_src: String,
    pub outline_color: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_size: 720,
            handle_size: 12.0,
            handle_slop: 4.0,
            min_size: 50.0,
            duplicate_offset: 20.0,
            export_file_name: "poster.html".to_string(),
            copy_feedback_ms: 2000,
            placeholder_image_src: "/abstract-geometric-sculpture.png".to_string(),
            outline_color: "#06b6d4".to_string(),
        }
    }
}

impl EditorConfig {
    /// Load from JSON, filling missing fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_size == 0 {
            return Err(ConfigError::Invalid("canvas_size must be positive".into()));
        }
        if !(self.handle_size > 0.0) || self.handle_slop < 0.0 {
            return Err(ConfigError::Invalid("handle size must be positive".into()));
        }
        if !(self.min_size >= 0.0) {
            return Err(ConfigError::Invalid("min_size must not be negative".into()));
        }
        if self.export_file_name.trim().is_empty() {
            return Err(ConfigError::Invalid("export_file_name is empty".into()));
        }
        Ok(())
    }

    pub fn copy_feedback(&self) -> Duration {
        Duration::from_millis(self.copy_feedback_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!(config.canvas_size, 720);
        assert_eq!(config.min_size, 50.0);
        assert_eq!(config.copy_feedback(), Duration::from_secs(2));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json() {
        let config = EditorConfig::from_json(r#"{ "canvas_size": 1080 }"#).unwrap();
        assert_eq!(config.canvas_size, 1080);
        assert_eq!(config.export_file_name, "poster.html");
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(EditorConfig::from_json("{"), Err(ConfigError::Parse(_))));
        assert!(matches!(
            EditorConfig::from_json(r#"{ "canvas_size": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_json_round_trip() {
        let config = EditorConfig {
            duplicate_offset: 8.0,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(EditorConfig::from_json(&json).unwrap(), config);
    }
}
