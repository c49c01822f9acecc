use thiserror::Error;

use crate::constants::{MAX_PCT, MAX_SIZE_PX, MIN_FLOW_PCT, MIN_SIZE_PX, MIN_SPACING_PCT};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParameterError {
    #[error("Unknown stroke style: {0}")]
    UnknownStyle(String),
    #[error("Invalid colour '{0}', expected #rrggbb")]
    InvalidColor(String),
    #[error("Unknown blend mode: {0}")]
    UnknownBlendMode(String),
}

/// Clamp into `[lo, hi]`, mapping NaN to `lo`
#[inline]
pub fn clamp_range(value: f32, lo: f32, hi: f32) -> f32 {
    if value.is_nan() { lo } else { value.clamp(lo, hi) }
}

pub fn clamp_size(size: f32) -> f32 {
    clamp_range(size, MIN_SIZE_PX, MAX_SIZE_PX)
}

pub fn clamp_flow(flow: f32) -> f32 {
    clamp_range(flow, MIN_FLOW_PCT, MAX_PCT)
}

pub fn clamp_spacing(spacing: f32) -> f32 {
    clamp_range(spacing, MIN_SPACING_PCT, MAX_PCT)
}

/// Hardness, smoothness and scatter share the 0-100 range
pub fn clamp_percent(value: f32) -> f32 {
    clamp_range(value, 0.0, MAX_PCT)
}

/// Sanitize one incoming coordinate.
///
/// Negative values clamp to the surface origin. A non-finite value takes
/// `fallback` (the previous coordinate), turning the sample into a
/// zero-distance move.
#[inline]
pub fn sanitize_coord(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_bounds() {
        assert_eq!(clamp_size(500.0), 100.0);
        assert_eq!(clamp_size(0.0), 1.0);
        assert_eq!(clamp_flow(0.0), 1.0);
        assert_eq!(clamp_spacing(-3.0), 1.0);
        assert_eq!(clamp_percent(150.0), 100.0);
        assert_eq!(clamp_percent(-1.0), 0.0);
        assert_eq!(clamp_percent(42.5), 42.5);
    }

    #[test]
    fn test_clamp_nan() {
        assert_eq!(clamp_size(f32::NAN), 1.0);
        assert_eq!(clamp_percent(f32::NAN), 0.0);
    }

    #[test]
    fn test_sanitize_coord() {
        assert_eq!(sanitize_coord(12.0, 3.0), 12.0);
        assert_eq!(sanitize_coord(-5.0, 3.0), 0.0);
        assert_eq!(sanitize_coord(f32::NAN, 3.0), 3.0);
        assert_eq!(sanitize_coord(f32::INFINITY, 3.0), 3.0);
    }
}
