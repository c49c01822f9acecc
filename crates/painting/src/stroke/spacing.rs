//! Per-style spacing and buffering policy

use crate::types::StrokeStyle;

use super::smoothing::SmoothingOrder;

/// How a style paces and shapes its renders. The point stream reads the
/// spacing fields; renderers read smoothing and the pressure cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpacingPolicy {
    /// Threshold is `size * spacing / divisor`; a larger divisor samples
    /// more densely. `None` renders on every sample.
    pub divisor: Option<f32>,
    /// Buffered point count that forces a render regardless of distance
    pub buffer_cap: usize,
    /// Smoothing pass applied to each run before it is drawn
    pub smoothing: SmoothingOrder,
    /// Speed cap fraction for simulated pressure (see `Velocity::pressure_factor`)
    pub pressure_cap: f32,
}

impl SpacingPolicy {
    pub fn for_style(style: StrokeStyle) -> Self {
        match style {
            StrokeStyle::Pen => Self {
                divisor: Some(200.0),
                buffer_cap: 20,
                smoothing: SmoothingOrder::Cubic,
                pressure_cap: 0.0,
            },
            StrokeStyle::Pencil => Self {
                divisor: Some(100.0),
                buffer_cap: 15,
                smoothing: SmoothingOrder::Local,
                pressure_cap: 0.0,
            },
            StrokeStyle::Marker => Self {
                divisor: Some(75.0),
                buffer_cap: 8,
                smoothing: SmoothingOrder::Local,
                pressure_cap: 0.5,
            },
            StrokeStyle::Watercolor => Self {
                divisor: Some(50.0),
                buffer_cap: 6,
                smoothing: SmoothingOrder::None,
                pressure_cap: 0.0,
            },
            StrokeStyle::Spray => Self {
                divisor: None,
                buffer_cap: 1,
                smoothing: SmoothingOrder::None,
                pressure_cap: 0.7,
            },
        }
    }

    /// Minimum distance in pixels from the last rendered point before a run
    /// is handed to the renderer
    pub fn threshold(&self, size_px: f32, spacing_pct: f32) -> f32 {
        match self.divisor {
            Some(divisor) => (size_px * spacing_pct / divisor).max(0.0),
            None => 0.0,
        }
    }
}

/// Convenience for [`SpacingPolicy::threshold`] on a style
pub fn spacing_threshold(style: StrokeStyle, size_px: f32, spacing_pct: f32) -> f32 {
    SpacingPolicy::for_style(style).threshold(size_px, spacing_pct)
}
