//! Shared configuration for the sketch engine
//!
//! This crate provides the single source of truth for canvas dimensions,
//! stroke engine tuning, and history limits. Every section deserializes with
//! defaults, so a host can supply a partial JSON document.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default canvas width in pixels
pub const DEFAULT_WIDTH: u32 = 1024;

/// Default canvas height in pixels
pub const DEFAULT_HEIGHT: u32 = 768;

/// Default scale factor (1.0 = no scaling)
pub const DEFAULT_SCALE: f32 = 1.0;

/// Default canvas background
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Pointer speed (px/ms) at which simulated pressure bottoms out
pub const DEFAULT_MAX_VELOCITY: f32 = 10.0;

/// Number of raster snapshots kept for undo/redo
pub const DEFAULT_HISTORY_ENTRIES: usize = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Canvas configuration for the raster surface
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    /// Surface width in logical pixels
    pub width: u32,
    /// Surface height in logical pixels
    pub height: u32,
    /// Device pixel ratio applied by the host before feeding points
    pub scale: f32,
    /// Background colour as `#rrggbb`
    pub background: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            scale: DEFAULT_SCALE,
            background: DEFAULT_BACKGROUND.to_string(),
        }
    }
}

impl CanvasConfig {
    /// Create a new canvas config with the given dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Get scaled width (for physical pixel calculations)
    pub fn scaled_width(&self) -> u32 {
        (self.width as f32 * self.scale) as u32
    }

    /// Get scaled height (for physical pixel calculations)
    pub fn scaled_height(&self) -> u32 {
        (self.height as f32 * self.scale) as u32
    }
}

/// Stroke engine tuning
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct StrokeConfig {
    /// Velocity clamp used for pressure simulation (px/ms)
    pub max_velocity_px_per_ms: Option<f32>,
    /// Fixed seed for jitter and particle placement; `None` seeds from entropy
    pub rng_seed: Option<u64>,
}

impl StrokeConfig {
    /// Velocity clamp, falling back to [`DEFAULT_MAX_VELOCITY`]
    pub fn max_velocity(&self) -> f32 {
        self.max_velocity_px_per_ms.unwrap_or(DEFAULT_MAX_VELOCITY)
    }
}

/// Undo/redo snapshot limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HistoryConfig {
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_HISTORY_ENTRIES,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub canvas: CanvasConfig,
    pub stroke: StrokeConfig,
    pub history: HistoryConfig,
}

impl EngineConfig {
    /// Parse and validate a JSON document. Missing sections use defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas dimensions must be non-zero, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        if !(self.canvas.scale > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "canvas scale must be positive, got {}",
                self.canvas.scale
            )));
        }
        let max_velocity = self.stroke.max_velocity();
        if !(max_velocity > 0.0) || !max_velocity.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "max velocity must be a positive number, got {max_velocity}"
            )));
        }
        if self.history.max_entries == 0 {
            return Err(ConfigError::Invalid(
                "history must keep at least one entry".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.canvas.width, DEFAULT_WIDTH);
        assert_eq!(config.canvas.height, DEFAULT_HEIGHT);
        assert_eq!(config.canvas.scale, DEFAULT_SCALE);
        assert_eq!(config.stroke.max_velocity(), DEFAULT_MAX_VELOCITY);
        assert_eq!(config.history.max_entries, DEFAULT_HISTORY_ENTRIES);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scaled_dimensions() {
        let mut canvas = CanvasConfig::new(800, 600);
        canvas.scale = 2.0;
        assert_eq!(canvas.scaled_width(), 1600);
        assert_eq!(canvas.scaled_height(), 1200);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(r#"{ "canvas": { "width": 320 } }"#).unwrap();
        assert_eq!(config.canvas.width, 320);
        assert_eq!(config.canvas.height, DEFAULT_HEIGHT);
        assert_eq!(config.stroke.rng_seed, None);
        assert_eq!(config.history.max_entries, DEFAULT_HISTORY_ENTRIES);
    }

    #[test]
    fn test_json_roundtrip_keeps_seed() {
        let mut config = EngineConfig::default();
        config.stroke.rng_seed = Some(7);
        let json = config.to_json().unwrap();
        let parsed = EngineConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            EngineConfig::from_json(r#"{ "canvas": { "width": 0 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "stroke": { "max_velocity_px_per_ms": -1.0 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{ "history": { "max_entries": 0 } }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            EngineConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
