//! Marker: multiply-blended segments whose width follows simulated pressure

use glam::Vec2;
use rand::rngs::StdRng;
use tracing::debug;

use super::{StyleRenderer, apply_line_state};
use crate::brush::BrushParameters;
use crate::raster::{Gradient, RasterTarget};
use crate::stroke::{SpacingPolicy, Velocity, smooth};
use crate::types::StrokeStyle;

pub struct MarkerRenderer;

/// Soft dot: full colour up to the hardness radius, fading out at the rim
fn soft_dot(target: &mut dyn RasterTarget, params: &BrushParameters, center: Vec2) {
    let radius = params.size() / 2.0;
    let gradient = Gradient::radial(center, radius)
        .with_stop(0.0, params.rgba(1.0))
        .with_stop(params.hardness() / 100.0, params.rgba(1.0))
        .with_stop(1.0, params.rgba(0.0));
    apply_line_state(target, params, params.size());
    target.set_fill_paint(gradient.into());
    target.fill_circle(center, radius);
}

impl StyleRenderer for MarkerRenderer {
    fn style(&self) -> StrokeStyle {
        StrokeStyle::Marker
    }

    fn render_start(
        &self,
        target: &mut dyn RasterTarget,
        params: &BrushParameters,
        origin: Vec2,
        _rng: &mut StdRng,
    ) {
        soft_dot(target, params, origin);
    }

    fn render_run(
        &self,
        target: &mut dyn RasterTarget,
        params: &BrushParameters,
        run: &[Vec2],
        velocity: Velocity,
        _rng: &mut StdRng,
    ) {
        if run.len() < 2 {
            return;
        }
        let policy = SpacingPolicy::for_style(self.style());
        let points = smooth(run, policy.smoothing, params.smoothness());
        // Fastest strokes thin down to the policy's pressure floor
        let width = params.size() * velocity.pressure_factor(policy.pressure_cap);

        apply_line_state(target, params, width);
        // Segments are stroked one at a time so overlaps build up ink
        for pair in points.windows(2) {
            target.begin_path();
            target.move_to(pair[0]);
            target.line_to(pair[1]);
            target.stroke();
        }
        debug!(
            "MarkerRenderer::render_run: {} segments at width {:.2}",
            points.len() - 1,
            width
        );
    }

    fn render_end(
        &self,
        target: &mut dyn RasterTarget,
        params: &BrushParameters,
        tail: &[Vec2],
        last: Vec2,
        velocity: Velocity,
        rng: &mut StdRng,
    ) {
        self.render_run(target, params, tail, velocity, rng);
        soft_dot(target, params, last);
    }
}
