//! Brush parameters
//!
//! [`BrushParameters`] is the state of the active brush. Every setter clamps
//! to the documented range, and deserialization goes through the same
//! setters, so an instance never holds an out-of-range value.

use serde::{Deserialize, Serialize};

use crate::color::Rgb24;
use crate::constants::WATERCOLOR_OPACITY_FACTOR;
use crate::types::{BlendMode, CompositeOp, StrokeStyle};
use crate::validation::{
    ParameterError, clamp_flow, clamp_percent, clamp_size, clamp_spacing,
};

/// Brush configuration read by the renderer during a stroke
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawParameters", into = "RawParameters")]
pub struct BrushParameters {
    style: StrokeStyle,
    size_px: f32,
    flow_pct: f32,
    hardness_pct: f32,
    spacing_pct: f32,
    smoothness_pct: f32,
    scatter_pct: f32,
    color: Rgb24,
    blend_mode: BlendMode,
}

impl Default for BrushParameters {
    fn default() -> Self {
        Self {
            style: StrokeStyle::Pencil,
            size_px: 3.0,
            flow_pct: 100.0,
            hardness_pct: 80.0,
            spacing_pct: 20.0,
            smoothness_pct: 50.0,
            scatter_pct: 0.0,
            color: Rgb24::BLACK,
            blend_mode: BlendMode::Style,
        }
    }
}

impl BrushParameters {
    pub fn new(style: StrokeStyle) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    pub fn style(&self) -> StrokeStyle {
        self.style
    }

    pub fn size(&self) -> f32 {
        self.size_px
    }

    pub fn flow(&self) -> f32 {
        self.flow_pct
    }

    pub fn hardness(&self) -> f32 {
        self.hardness_pct
    }

    pub fn spacing(&self) -> f32 {
        self.spacing_pct
    }

    pub fn smoothness(&self) -> f32 {
        self.smoothness_pct
    }

    pub fn scatter(&self) -> f32 {
        self.scatter_pct
    }

    pub fn color(&self) -> Rgb24 {
        self.color
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }

    /// Diameter in pixels, clamped to 1-100
    pub fn set_size(&mut self, size: f32) {
        self.size_px = clamp_size(size);
    }

    /// Flow in percent, clamped to 1-100
    pub fn set_flow(&mut self, flow: f32) {
        self.flow_pct = clamp_flow(flow);
    }

    /// Hardness in percent, clamped to 0-100
    pub fn set_hardness(&mut self, hardness: f32) {
        self.hardness_pct = clamp_percent(hardness);
    }

    /// Spacing in percent of size, clamped to 1-100
    pub fn set_spacing(&mut self, spacing: f32) {
        self.spacing_pct = clamp_spacing(spacing);
    }

    /// Smoothness in percent, clamped to 0-100
    pub fn set_smoothness(&mut self, smoothness: f32) {
        self.smoothness_pct = clamp_percent(smoothness);
    }

    /// Scatter in percent, clamped to 0-100
    pub fn set_scatter(&mut self, scatter: f32) {
        self.scatter_pct = clamp_percent(scatter);
    }

    pub fn set_color(&mut self, color: Rgb24) {
        self.color = color;
    }

    /// Parse and assign a `#rrggbb` colour. The colour is unchanged on error.
    pub fn set_color_hex(&mut self, hex: &str) -> Result<(), ParameterError> {
        self.color = Rgb24::from_hex(hex)?;
        Ok(())
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode = mode;
    }

    /// Mark opacity: flow scaled by the style's dilution.
    ///
    /// Renderers derive every alpha value from this.
    pub fn opacity(&self) -> f32 {
        let multiplier = match self.style {
            StrokeStyle::Watercolor => WATERCOLOR_OPACITY_FACTOR,
            _ => 1.0,
        };
        self.flow_pct / 100.0 * multiplier
    }

    /// Composite operation after applying the blend override
    pub fn composite(&self) -> CompositeOp {
        self.blend_mode.resolve(self.style)
    }

    /// Translucent RGBA in the brush colour, `alpha` relative to full opacity
    pub fn rgba(&self, alpha: f32) -> [f32; 4] {
        self.color.to_rgba(alpha)
    }
}

/// Unvalidated serde mirror of [`BrushParameters`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawParameters {
    style: StrokeStyle,
    size: f32,
    flow: f32,
    hardness: f32,
    spacing: f32,
    smoothness: f32,
    scatter: f32,
    color: Rgb24,
    blend_mode: BlendMode,
}

impl Default for RawParameters {
    fn default() -> Self {
        BrushParameters::default().into()
    }
}

impl From<RawParameters> for BrushParameters {
    fn from(raw: RawParameters) -> Self {
        let mut params = BrushParameters::new(raw.style);
        params.set_size(raw.size);
        params.set_flow(raw.flow);
        params.set_hardness(raw.hardness);
        params.set_spacing(raw.spacing);
        params.set_smoothness(raw.smoothness);
        params.set_scatter(raw.scatter);
        params.set_color(raw.color);
        params.set_blend_mode(raw.blend_mode);
        params
    }
}

impl From<BrushParameters> for RawParameters {
    fn from(params: BrushParameters) -> Self {
        Self {
            style: params.style,
            size: params.size_px,
            flow: params.flow_pct,
            hardness: params.hardness_pct,
            spacing: params.spacing_pct,
            smoothness: params.smoothness_pct,
            scatter: params.scatter_pct,
            color: params.color,
            blend_mode: params.blend_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setters_clamp() {
        let mut params = BrushParameters::default();
        params.set_size(500.0);
        assert_eq!(params.size(), 100.0);
        params.set_flow(0.0);
        assert_eq!(params.flow(), 1.0);
        params.set_hardness(-20.0);
        assert_eq!(params.hardness(), 0.0);
        params.set_spacing(0.0);
        assert_eq!(params.spacing(), 1.0);
        params.set_smoothness(101.0);
        assert_eq!(params.smoothness(), 100.0);
        params.set_scatter(250.0);
        assert_eq!(params.scatter(), 100.0);
    }

    #[test]
    fn test_opacity_from_flow() {
        let mut params = BrushParameters::new(StrokeStyle::Pen);
        params.set_flow(50.0);
        assert!((params.opacity() - 0.5).abs() < 1e-6);

        params.set_style(StrokeStyle::Watercolor);
        assert!((params.opacity() - 0.35).abs() < 1e-6);
    }

    #[test]
    fn test_bad_color_keeps_previous() {
        let mut params = BrushParameters::default();
        params.set_color_hex("#336699").unwrap();
        assert!(params.set_color_hex("#33669").is_err());
        assert_eq!(params.color(), Rgb24::new(0x33, 0x66, 0x99));
    }

    #[test]
    fn test_deserialize_clamps() {
        let json = r##"{ "style": "marker", "size": 900, "flow": 0, "color": "#ff0000" }"##;
        let params: BrushParameters = serde_json::from_str(json).unwrap();
        assert_eq!(params.style(), StrokeStyle::Marker);
        assert_eq!(params.size(), 100.0);
        assert_eq!(params.flow(), 1.0);
        assert_eq!(params.color(), Rgb24::new(255, 0, 0));
        // Unspecified fields fall back to defaults
        assert_eq!(params.hardness(), BrushParameters::default().hardness());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let mut params = BrushParameters::new(StrokeStyle::Spray);
        params.set_size(25.0);
        params.set_blend_mode(BlendMode::Multiply);
        let json = serde_json::to_string(&params).unwrap();
        let back: BrushParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_composite_resolution() {
        let mut params = BrushParameters::new(StrokeStyle::Marker);
        assert_eq!(params.composite(), CompositeOp::Multiply);
        params.set_blend_mode(BlendMode::SourceOver);
        assert_eq!(params.composite(), CompositeOp::SourceOver);
    }
}
