//! Pen: a Catmull-Rom spline through the smoothed run, drawn as cubic Beziers

use glam::Vec2;
use rand::rngs::StdRng;
use tracing::debug;

use super::{StyleRenderer, apply_line_state};
use crate::brush::BrushParameters;
use crate::raster::RasterTarget;
use crate::stroke::{SpacingPolicy, Velocity, smooth};
use crate::types::StrokeStyle;

pub struct PenRenderer;

/// Bezier control points for the Catmull-Rom segment `p1 -> p2`
fn catmull_rom_controls(p0: Vec2, p1: Vec2, p2: Vec2, p3: Vec2) -> (Vec2, Vec2) {
    (p1 + (p2 - p0) / 6.0, p2 - (p3 - p1) / 6.0)
}

impl StyleRenderer for PenRenderer {
    fn style(&self) -> StrokeStyle {
        StrokeStyle::Pen
    }

    fn render_start(
        &self,
        target: &mut dyn RasterTarget,
        params: &BrushParameters,
        origin: Vec2,
        _rng: &mut StdRng,
    ) {
        apply_line_state(target, params, params.size());
        target.fill_circle(origin, params.size() / 2.0);
    }

    fn render_run(
        &self,
        target: &mut dyn RasterTarget,
        params: &BrushParameters,
        run: &[Vec2],
        _velocity: Velocity,
        _rng: &mut StdRng,
    ) {
        if run.len() < 2 {
            return;
        }
        let smoothing = SpacingPolicy::for_style(self.style()).smoothing;
        let points = smooth(run, smoothing, params.smoothness());
        let last = points.len() - 1;

        apply_line_state(target, params, params.size());
        target.begin_path();
        target.move_to(points[0]);
        for i in 0..last {
            // End tangents reuse the endpoint itself
            let p0 = points[i.saturating_sub(1)];
            let p3 = points[(i + 2).min(last)];
            let (c1, c2) = catmull_rom_controls(p0, points[i], points[i + 1], p3);
            target.bezier_curve_to(c1, c2, points[i + 1]);
        }
        target.stroke();
        debug!("PenRenderer::render_run: {} segments", last);
    }

    fn render_end(
        &self,
        target: &mut dyn RasterTarget,
        params: &BrushParameters,
        tail: &[Vec2],
        _last: Vec2,
        velocity: Velocity,
        rng: &mut StdRng,
    ) {
        self.render_run(target, params, tail, velocity, rng);
    }
}
