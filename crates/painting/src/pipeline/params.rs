//! Parameter and style changes for the brush engine

use std::rc::Rc;

use tracing::{debug, warn};

use crate::brush::BrushParameters;
use crate::color::Rgb24;
use crate::render::renderer_for;
use crate::types::{BlendMode, StrokeStyle};
use crate::validation::ParameterError;

use super::{BrushEngine, EngineState, PaintOp};

impl BrushEngine {
    pub fn params(&self) -> &BrushParameters {
        &self.params
    }

    /// Copy of the active parameters for a preset store
    pub fn export_parameters(&self) -> BrushParameters {
        self.params
    }

    /// Replace all parameters. A style change while drawing flushes the
    /// buffered points with the old style first.
    pub fn apply_parameters(&mut self, params: BrushParameters) {
        self.switch_to(params);
    }

    pub fn set_style(&mut self, style: StrokeStyle) {
        let mut params = self.params;
        params.set_style(style);
        self.switch_to(params);
    }

    /// Set the style by name; unknown names leave the brush unchanged
    pub fn set_style_name(&mut self, name: &str) -> Result<(), ParameterError> {
        match name.parse::<StrokeStyle>() {
            Ok(style) => {
                self.set_style(style);
                Ok(())
            }
            Err(e) => {
                warn!("BrushEngine::set_style_name: {}", e);
                Err(e)
            }
        }
    }

    pub fn set_size(&mut self, size: f32) {
        self.params.set_size(size);
    }

    pub fn set_flow(&mut self, flow: f32) {
        self.params.set_flow(flow);
    }

    pub fn set_hardness(&mut self, hardness: f32) {
        self.params.set_hardness(hardness);
    }

    pub fn set_spacing(&mut self, spacing: f32) {
        self.params.set_spacing(spacing);
    }

    pub fn set_smoothness(&mut self, smoothness: f32) {
        self.params.set_smoothness(smoothness);
    }

    pub fn set_scatter(&mut self, scatter: f32) {
        self.params.set_scatter(scatter);
    }

    pub fn set_color(&mut self, color: Rgb24) {
        self.params.set_color(color);
    }

    pub fn set_color_hex(&mut self, hex: &str) -> Result<(), ParameterError> {
        self.params.set_color_hex(hex).inspect_err(|e| {
            warn!("BrushEngine::set_color_hex: {}", e);
        })
    }

    pub fn set_blend_mode(&mut self, mode: BlendMode) {
        self.params.set_blend_mode(mode);
    }

    pub fn set_blend_mode_name(&mut self, name: &str) -> Result<(), ParameterError> {
        let mode = name.parse::<BlendMode>().inspect_err(|e| {
            warn!("BrushEngine::set_blend_mode_name: {}", e);
        })?;
        self.params.set_blend_mode(mode);
        Ok(())
    }

    fn switch_to(&mut self, params: BrushParameters) {
        let old_style = self.params.style();
        let new_style = params.style();
        if old_style == new_style {
            self.params = params;
            return;
        }

        let restyle = self.state == EngineState::Drawing;
        if restyle {
            // Finish the buffered points with the style they were paced for
            let tail: Vec<_> = self.stream.drain_buffer().iter().map(|p| p.position()).collect();
            let velocity = self.stream.velocity();
            if let Some(last) = self.stream.session().map(|s| s.last_point().position()) {
                self.queue(PaintOp::End { tail, last, velocity });
            }
        }

        self.params = params;
        self.renderer = Rc::from(renderer_for(new_style));
        debug!("BrushEngine: style {} -> {}", old_style, new_style);

        if restyle {
            if let Some(origin) = self.stream.session().map(|s| s.last_point().position()) {
                self.queue(PaintOp::Start { origin });
            }
        }
    }
}
