//! Spray: independent particles, denser toward the nozzle centre
//!
//! Particle positions use `radius * sqrt(u)` so density falls off from the
//! centre; each particle fades with its distance. Fast pointer motion
//! thins the spray. Scatter widens the spray cone beyond the brush size.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand::rngs::StdRng;
use tracing::debug;

use super::StyleRenderer;
use crate::brush::BrushParameters;
use crate::raster::{Paint, RasterTarget};
use crate::stroke::{SpacingPolicy, Velocity};
use crate::types::StrokeStyle;

/// Extra particles while moving
const RUN_BOOST: f32 = 1.2;
const END_BURST_SCALE: f32 = 0.7;
const END_BURST_FLOW: f32 = 0.5;

pub struct SprayRenderer;

/// Particles for one burst of `size` at `flow_scale` times the brush flow
fn particle_count(size: f32, flow_pct: f32, flow_scale: f32) -> usize {
    (size * 3.0 * flow_pct / 100.0 * flow_scale).max(0.0).floor() as usize
}

fn burst(
    target: &mut dyn RasterTarget,
    params: &BrushParameters,
    center: Vec2,
    size: f32,
    flow_scale: f32,
    rng: &mut StdRng,
) -> usize {
    let count = particle_count(size, params.flow(), flow_scale);
    let reach = size * (1.0 + params.scatter() / 100.0);
    let alpha = (params.opacity() * flow_scale).min(1.0);

    target.set_composite(params.composite());
    target.set_global_alpha(1.0);
    for _ in 0..count {
        let angle = rng.random::<f32>() * TAU;
        let distance = reach * rng.random::<f32>().sqrt();
        let particle = center + distance * Vec2::from_angle(angle);
        let radius = 0.5 + rng.random::<f32>() * size * 0.15;
        let falloff = (1.0 - distance / reach).max(0.0);
        target.set_fill_paint(Paint::Solid(params.rgba(alpha * falloff)));
        target.fill_circle(particle, radius);
    }
    count
}

impl StyleRenderer for SprayRenderer {
    fn style(&self) -> StrokeStyle {
        StrokeStyle::Spray
    }

    fn render_start(
        &self,
        target: &mut dyn RasterTarget,
        params: &BrushParameters,
        origin: Vec2,
        rng: &mut StdRng,
    ) {
        burst(target, params, origin, params.size(), 1.0, rng);
    }

    fn render_run(
        &self,
        target: &mut dyn RasterTarget,
        params: &BrushParameters,
        run: &[Vec2],
        velocity: Velocity,
        rng: &mut StdRng,
    ) {
        let cap = SpacingPolicy::for_style(self.style()).pressure_cap;
        let density = velocity.pressure_factor(cap) * RUN_BOOST;
        // run[0] was sprayed by the previous call
        let particles: usize = run
            .iter()
            .skip(1)
            .map(|p| burst(target, params, *p, params.size(), density, rng))
            .sum();
        debug!("SprayRenderer::render_run: {} particles, density {:.2}", particles, density);
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
        burst(
            target,
            params,
            last,
            params.size() * END_BURST_SCALE,
            END_BURST_FLOW,
            rng,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_support::*;
    use crate::types::SamplePoint;

    fn spray(size: f32, flow: f32) -> BrushParameters {
        let mut params = BrushParameters::new(StrokeStyle::Spray);
        params.set_size(size);
        params.set_flow(flow);
        params
    }

    #[test]
    fn test_particle_count() {
        assert_eq!(particle_count(10.0, 100.0, 1.0), 30);
        assert_eq!(particle_count(10.0, 50.0, 1.0), 15);
        assert_eq!(particle_count(10.0, 100.0, 0.3 * 1.2), 10);
    }

    #[test]
    fn test_particles_stay_within_reach() {
        let mut canvas = white_canvas(60, 60);
        let params = spray(10.0, 100.0);
        burst(&mut canvas, &params, Vec2::new(30.0, 30.0), 10.0, 1.0, &mut rng());
        assert!(painted(&canvas) > 0);
        // Reach plus the largest particle radius
        for y in 0..60u32 {
            for x in 0..60u32 {
                let d = Vec2::new(x as f32 + 0.5, y as f32 + 0.5).distance(Vec2::new(30.0, 30.0));
                if d > 10.0 + 2.0 + 2.0 {
                    assert_eq!(lightness(&canvas, x, y), 1.0);
                }
            }
        }
    }

    #[test]
    fn test_fast_motion_thins_spray() {
        let params = spray(20.0, 100.0);
        let run = [Vec2::new(30.0, 30.0), Vec2::new(30.0, 30.0)];
        let fast = Velocity::between(&SamplePoint::new(0.0, 0.0, 0), &SamplePoint::new(50.0, 0.0, 1), 10.0);

        let mut slow_canvas = white_canvas(60, 60);
        SprayRenderer.render_run(&mut slow_canvas, &params, &run, Velocity::at_rest(10.0), &mut rng());
        let mut fast_canvas = white_canvas(60, 60);
        SprayRenderer.render_run(&mut fast_canvas, &params, &run, fast, &mut rng());

        assert!(painted(&fast_canvas) < painted(&slow_canvas));
    }

    #[test]
    fn test_run_skips_anchor() {
        let mut canvas = white_canvas(40, 40);
        let params = spray(5.0, 100.0);
        SprayRenderer.render_run(&mut canvas, &params, &[Vec2::new(20.0, 20.0)], Velocity::at_rest(10.0), &mut rng());
        assert_eq!(painted(&canvas), 0);
    }

    #[test]
    fn test_end_burst_flushes() {
        let mut canvas = white_canvas(40, 40);
        let params = spray(10.0, 100.0);
        SprayRenderer.render_end(&mut canvas, &params, &[], Vec2::new(20.0, 20.0), Velocity::at_rest(10.0), &mut rng());
        assert!(painted(&canvas) > 0);
        assert!(!canvas.has_open_path());
    }
}
