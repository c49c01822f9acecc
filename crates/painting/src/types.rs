use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::validation::ParameterError;

/// A raw pointer sample in raster coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f32,
    pub y: f32,
    /// Event time in milliseconds (any monotonic-ish baseline)
    pub timestamp_ms: i64,
}

impl SamplePoint {
    pub fn new(x: f32, y: f32, timestamp_ms: i64) -> Self {
        Self { x, y, timestamp_ms }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Brush style, selects the rendering algorithm and default compositing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Pencil,
    Pen,
    Marker,
    Watercolor,
    Spray,
}

impl StrokeStyle {
    pub const ALL: [StrokeStyle; 5] = [
        StrokeStyle::Pencil,
        StrokeStyle::Pen,
        StrokeStyle::Marker,
        StrokeStyle::Watercolor,
        StrokeStyle::Spray,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StrokeStyle::Pencil => "pencil",
            StrokeStyle::Pen => "pen",
            StrokeStyle::Marker => "marker",
            StrokeStyle::Watercolor => "watercolor",
            StrokeStyle::Spray => "spray",
        }
    }

    /// Compositing used when the brush's blend mode is left on the style default
    pub fn default_composite(&self) -> CompositeOp {
        match self {
            StrokeStyle::Marker => CompositeOp::Multiply,
            StrokeStyle::Watercolor => CompositeOp::Overlay,
            StrokeStyle::Pencil | StrokeStyle::Pen | StrokeStyle::Spray => CompositeOp::SourceOver,
        }
    }
}

impl fmt::Display for StrokeStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrokeStyle {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrokeStyle::ALL
            .into_iter()
            .find(|style| style.as_str() == s)
            .ok_or_else(|| ParameterError::UnknownStyle(s.to_string()))
    }
}

/// Pixel blend function applied when a mark lands on existing content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CompositeOp {
    #[default]
    SourceOver,
    Multiply,
    Overlay,
}

impl CompositeOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompositeOp::SourceOver => "source-over",
            CompositeOp::Multiply => "multiply",
            CompositeOp::Overlay => "overlay",
        }
    }
}

/// User-facing blend override on the brush
///
/// `Style` keeps the compositing fixed by the stroke style; any other value
/// forces that operation for every style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    #[default]
    Style,
    SourceOver,
    Multiply,
    Overlay,
}

impl BlendMode {
    /// Resolve to the composite operation used for `style`
    pub fn resolve(self, style: StrokeStyle) -> CompositeOp {
        match self {
            BlendMode::Style => style.default_composite(),
            BlendMode::SourceOver => CompositeOp::SourceOver,
            BlendMode::Multiply => CompositeOp::Multiply,
            BlendMode::Overlay => CompositeOp::Overlay,
        }
    }
}

impl FromStr for BlendMode {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "style" | "" => Ok(BlendMode::Style),
            "source-over" => Ok(BlendMode::SourceOver),
            "multiply" => Ok(BlendMode::Multiply),
            "overlay" => Ok(BlendMode::Overlay),
            other => Err(ParameterError::UnknownBlendMode(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_parse_roundtrip() {
        for style in StrokeStyle::ALL {
            assert_eq!(style.as_str().parse::<StrokeStyle>().unwrap(), style);
        }
    }

    #[test]
    fn test_unknown_style_rejected() {
        let err = "crayon".parse::<StrokeStyle>().unwrap_err();
        assert!(matches!(err, ParameterError::UnknownStyle(ref s) if s == "crayon"));
    }

    #[test]
    fn test_style_default_composite() {
        assert_eq!(StrokeStyle::Pencil.default_composite(), CompositeOp::SourceOver);
        assert_eq!(StrokeStyle::Pen.default_composite(), CompositeOp::SourceOver);
        assert_eq!(StrokeStyle::Marker.default_composite(), CompositeOp::Multiply);
        assert_eq!(StrokeStyle::Watercolor.default_composite(), CompositeOp::Overlay);
        assert_eq!(StrokeStyle::Spray.default_composite(), CompositeOp::SourceOver);
    }

    #[test]
    fn test_blend_override() {
        assert_eq!(BlendMode::Style.resolve(StrokeStyle::Marker), CompositeOp::Multiply);
        assert_eq!(BlendMode::SourceOver.resolve(StrokeStyle::Marker), CompositeOp::SourceOver);
        assert_eq!("overlay".parse::<BlendMode>().unwrap(), BlendMode::Overlay);
        assert!("screen".parse::<BlendMode>().is_err());
    }

    #[test]
    fn test_style_serde_lowercase() {
        let json = serde_json::to_string(&StrokeStyle::Watercolor).unwrap();
        assert_eq!(json, "\"watercolor\"");
        let mode: BlendMode = serde_json::from_str("\"source-over\"").unwrap();
        assert_eq!(mode, BlendMode::SourceOver);
    }
}
