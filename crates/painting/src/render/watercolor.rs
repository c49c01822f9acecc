//! Watercolor: overlapping translucent blobs instead of a continuous path
//!
//! Each segment of a run is covered by blobs spaced at 30% of the brush size,
//! scattered around the segment and sized by hardness: softer brushes spread
//! further. Stroke start and end drop a splash of blobs around the point.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand::rngs::StdRng;
use tracing::debug;

use super::{StyleRenderer, irregular_blob, jitter};
use crate::brush::BrushParameters;
use crate::raster::{Paint, RasterTarget};
use crate::stroke::Velocity;
use crate::types::StrokeStyle;

/// Blob spacing along a segment, relative to size
const BLOB_STEP: f32 = 0.3;
/// Positional scatter of a blob, relative to size
const BLOB_OFFSET: f32 = 0.6;
/// Farthest a blob edge strays from its segment, relative to size
const BLOB_REACH: f32 = 1.5;
/// Lower bound on the hardness spread so hard brushes still paint
const MIN_SPREAD: f32 = 0.2;
/// End splash size relative to the brush
const END_SPLASH_SCALE: f32 = 0.7;

pub struct WatercolorRenderer;

fn spread(params: &BrushParameters) -> f32 {
    ((100.0 - params.hardness()) / 100.0).max(MIN_SPREAD)
}

fn prepare(target: &mut dyn RasterTarget, params: &BrushParameters) {
    target.set_composite(params.composite());
    // Alpha is carried per blob in the fill colour
    target.set_global_alpha(1.0);
}

fn paint_blob(target: &mut dyn RasterTarget, params: &BrushParameters, blob: &[Vec2], alpha: f32) {
    target.set_fill_paint(Paint::Solid(params.rgba(alpha)));
    target.fill_polygon(blob);
}

/// Parameter range of `a -> b` inside the target grown by `margin`
/// (Liang-Barsky). `None` when the segment misses it entirely.
fn visible_span(a: Vec2, b: Vec2, width: f32, height: f32, margin: f32) -> Option<(f32, f32)> {
    let d = b - a;
    let (mut t0, mut t1) = (0.0_f32, 1.0_f32);
    let edges = [
        (-d.x, a.x + margin),
        (d.x, width + margin - a.x),
        (-d.y, a.y + margin),
        (d.y, height + margin - a.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
        } else if p < 0.0 {
            t0 = t0.max(q / p);
        } else {
            t1 = t1.min(q / p);
        }
    }
    (t0 <= t1).then_some((t0, t1))
}

/// Scatter blobs along the part of `a -> b` that can reach the target.
/// Returns the number painted.
fn blob_segment(
    target: &mut dyn RasterTarget,
    params: &BrushParameters,
    a: Vec2,
    b: Vec2,
    rng: &mut StdRng,
) -> usize {
    let size = params.size();
    let margin = size * BLOB_REACH;
    let Some((t0, t1)) = visible_span(a, b, target.width() as f32, target.height() as f32, margin) else {
        return 0;
    };
    let (a, b) = (a.lerp(b, t0), a.lerp(b, t1));
    let steps = (a.distance(b) / (size * BLOB_STEP)).ceil() as usize;
    let spread = spread(params);
    for i in 0..steps {
        let along = a.lerp(b, i as f32 / steps as f32);
        let center = along + jitter(rng, size * BLOB_OFFSET);
        let radius = size * (0.3 + rng.random::<f32>() * 0.5) * spread;
        let start_angle = rng.random::<f32>() * TAU;
        let blob = irregular_blob(rng, center, radius, start_angle);
        let alpha = params.opacity() * (0.5 + rng.random::<f32>() * 0.5);
        paint_blob(target, params, &blob, alpha);
    }
    steps
}

/// Splash of `5 + size/5 + (0..3)` blobs around `center`
fn splash(
    target: &mut dyn RasterTarget,
    params: &BrushParameters,
    center: Vec2,
    size: f32,
    rng: &mut StdRng,
) -> usize {
    let count = 5 + (size / 5.0) as usize + rng.random_range(0..3);
    for _ in 0..count {
        let angle = rng.random::<f32>() * TAU;
        let distance = rng.random::<f32>() * size * 0.7;
        let spot = center + distance * Vec2::from_angle(angle);
        let radius = size * (0.2 + rng.random::<f32>() * 0.4);
        let blob = irregular_blob(rng, spot, radius, angle);
        let alpha = params.opacity() * (0.4 + rng.random::<f32>() * 0.4);
        paint_blob(target, params, &blob, alpha);
    }
    count
}

impl StyleRenderer for WatercolorRenderer {
    fn style(&self) -> StrokeStyle {
        StrokeStyle::Watercolor
    }

    fn render_start(
        &self,
        target: &mut dyn RasterTarget,
        params: &BrushParameters,
        origin: Vec2,
        rng: &mut StdRng,
    ) {
        prepare(target, params);
        let count = splash(target, params, origin, params.size(), rng);
        debug!("WatercolorRenderer::render_start: {} splash blobs", count);
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
        prepare(target, params);
        let blobs: usize = run
            .windows(2)
            .map(|pair| blob_segment(target, params, pair[0], pair[1], rng))
            .sum();
        debug!("WatercolorRenderer::render_run: {} blobs over {} points", blobs, run.len());
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
        prepare(target, params);
        splash(target, params, last, params.size() * END_SPLASH_SCALE, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::Canvas;
    use crate::render::test_support::*;

    fn watercolor(size: f32) -> BrushParameters {
        let mut params = BrushParameters::new(StrokeStyle::Watercolor);
        params.set_size(size);
        params
    }

    #[test]
    fn test_spread_floor() {
        let mut params = watercolor(10.0);
        params.set_hardness(100.0);
        assert_eq!(spread(&params), MIN_SPREAD);
        params.set_hardness(0.0);
        assert_eq!(spread(&params), 1.0);
    }

    #[test]
    fn test_blob_count_follows_distance() {
        let params = watercolor(10.0);
        let mut canvas = white_canvas(60, 20);
        let mut rng = rng();
        // 30px at 3px per blob
        let n = blob_segment(&mut canvas, &params, Vec2::new(10.0, 10.0), Vec2::new(40.0, 10.0), &mut rng);
        assert_eq!(n, 10);
        let n = blob_segment(&mut canvas, &params, Vec2::new(10.0, 10.0), Vec2::new(10.0, 10.0), &mut rng);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_far_sample_only_steps_over_canvas() {
        let params = watercolor(1.0);
        let mut canvas = white_canvas(64, 64);
        let mut rng = rng();
        let n = blob_segment(&mut canvas, &params, Vec2::new(10.0, 10.0), Vec2::new(3.0e6, 10.0), &mut rng);
        // 10..65.5 at 0.3px per blob
        assert!((184..=186).contains(&n), "{n} blobs");
        assert!(painted(&canvas) > 0);

        let n = blob_segment(&mut canvas, &params, Vec2::new(1.0e5, 10.0), Vec2::new(3.0e6, 10.0), &mut rng);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_visible_span() {
        let span = |a, b| visible_span(a, b, 100.0, 50.0, 10.0);
        assert_eq!(span(Vec2::new(10.0, 10.0), Vec2::new(20.0, 10.0)), Some((0.0, 1.0)));
        assert_eq!(span(Vec2::new(-110.0, 10.0), Vec2::new(90.0, 10.0)), Some((0.5, 1.0)));
        assert_eq!(span(Vec2::new(10.0, 100.0), Vec2::new(90.0, 100.0)), None);
        assert_eq!(span(Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0)), Some((0.0, 1.0)));
    }

    #[test]
    fn test_splash_count_grows_with_size() {
        let params = watercolor(50.0);
        let mut canvas = white_canvas(10, 10);
        let mut rng = rng();
        for _ in 0..20 {
            let n = splash(&mut canvas, &params, Vec2::new(5.0, 5.0), 50.0, &mut rng);
            assert!((15..=17).contains(&n));
        }
    }

    #[test]
    fn test_overlay_blobs_are_translucent() {
        let mut canvas = white_canvas(40, 40);
        canvas.clear([0.5, 0.5, 0.5, 1.0]);
        let params = watercolor(20.0);
        WatercolorRenderer.render_start(&mut canvas, &params, Vec2::new(20.0, 20.0), &mut rng());
        let mut darkest: f32 = 1.0;
        for y in 0..40 {
            for x in 0..40 {
                darkest = darkest.min(lightness(&canvas, x, y));
            }
        }
        // Black overlaid on mid grey darkens, but never to solid black
        assert!(darkest < 0.5);
        assert!(darkest > 0.0);
    }

    #[test]
    fn test_seeded_output_is_reproducible() {
        let params = watercolor(15.0);
        let run = [Vec2::new(5.0, 5.0), Vec2::new(30.0, 25.0)];
        let draw = || {
            let mut canvas: Canvas = white_canvas(40, 40);
            let mut rng = rng();
            WatercolorRenderer.render_start(&mut canvas, &params, run[0], &mut rng);
            WatercolorRenderer.render_run(&mut canvas, &params, &run, Velocity::at_rest(10.0), &mut rng);
            WatercolorRenderer.render_end(&mut canvas, &params, &[], run[1], Velocity::at_rest(10.0), &mut rng);
            canvas.snapshot()
        };
        assert_eq!(draw(), draw());
    }
}
