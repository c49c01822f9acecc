//! Pencil: straight round-capped segments with a little graphite wobble

use glam::Vec2;
use rand::rngs::StdRng;
use tracing::debug;

use super::{StyleRenderer, apply_line_state, jitter};
use crate::brush::BrushParameters;
use crate::raster::RasterTarget;
use crate::stroke::{SpacingPolicy, Velocity, smooth};
use crate::types::StrokeStyle;

/// Every Nth interior vertex is displaced
const JITTER_EVERY: usize = 3;

pub struct PencilRenderer;

fn jitter_magnitude(size: f32) -> f32 {
    (size * 0.2).max(0.1)
}

impl StyleRenderer for PencilRenderer {
    fn style(&self) -> StrokeStyle {
        StrokeStyle::Pencil
    }

    fn render_start(
        &self,
        target: &mut dyn RasterTarget,
        params: &BrushParameters,
        origin: Vec2,
        _rng: &mut StdRng,
    ) {
        // Tip contact
        apply_line_state(target, params, params.size());
        target.fill_circle(origin, params.size() / 2.0);
    }

    fn render_run(
        &self,
        target: &mut dyn RasterTarget,
        params: &BrushParameters,
        run: &[Vec2],
        _velocity: Velocity,
        rng: &mut StdRng,
    ) {
        if run.len() < 2 {
            return;
        }
        let smoothing = SpacingPolicy::for_style(self.style()).smoothing;
        let points = smooth(run, smoothing, params.smoothness());
        let last = points.len() - 1;
        let magnitude = jitter_magnitude(params.size());

        apply_line_state(target, params, params.size());
        target.begin_path();
        target.move_to(points[0]);
        for (i, p) in points.iter().enumerate().skip(1) {
            // The endpoint stays put so the next run starts where this one ends
            let wobble = if i % JITTER_EVERY == 0 && i < last {
                jitter(rng, magnitude)
            } else {
                Vec2::ZERO
            };
            target.line_to(*p + wobble);
        }
        target.stroke();
        debug!("PencilRenderer::render_run: {} points", points.len());
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::*;

    #[test]
    fn test_start_dot() {
        let mut canvas = white_canvas(20, 20);
        let params = BrushParameters::new(StrokeStyle::Pencil);
        PencilRenderer.render_start(&mut canvas, &params, Vec2::new(10.0, 10.0), &mut rng());
        assert!(lightness(&canvas, 10, 10) < 0.1);
        assert_eq!(lightness(&canvas, 2, 2), 1.0);
    }

    #[test]
    fn test_run_paints_between_points() {
        let mut canvas = white_canvas(40, 20);
        let mut params = BrushParameters::new(StrokeStyle::Pencil);
        params.set_size(4.0);
        let run = [Vec2::new(5.0, 10.0), Vec2::new(20.0, 10.0), Vec2::new(35.0, 10.0)];
        PencilRenderer.render_run(&mut canvas, &params, &run, Velocity::at_rest(10.0), &mut rng());
        assert!(lightness(&canvas, 12, 10) < 0.1);
        assert!(lightness(&canvas, 28, 10) < 0.1);
        assert!(!canvas.has_open_path());
    }

    #[test]
    fn test_flow_sets_opacity() {
        let mut canvas = white_canvas(20, 20);
        let mut params = BrushParameters::new(StrokeStyle::Pencil);
        params.set_size(6.0);
        params.set_flow(50.0);
        PencilRenderer.render_start(&mut canvas, &params, Vec2::new(10.0, 10.0), &mut rng());
        assert!((lightness(&canvas, 10, 10) - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_short_run_is_noop() {
        let mut canvas = white_canvas(10, 10);
        let params = BrushParameters::default();
        PencilRenderer.render_run(&mut canvas, &params, &[Vec2::ONE], Velocity::at_rest(10.0), &mut rng());
        assert_eq!(painted(&canvas), 0);
    }

    #[test]
    fn test_jitter_magnitude_floor() {
        assert_eq!(jitter_magnitude(0.1), 0.1);
        assert_eq!(jitter_magnitude(10.0), 2.0);
    }
}
