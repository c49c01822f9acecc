//! Style renderers
//!
//! Each [`StrokeStyle`] has one [`StyleRenderer`] that knows how to paint a
//! stroke start, a run of points, and a stroke end onto a [`RasterTarget`].
//! Renderers hold no per-stroke state: everything they need arrives with the
//! call (a copy of the parameters, the run, the current velocity, and the
//! random source), so an in-flight run never sees later parameter changes.

mod marker;
mod pen;
mod pencil;
mod spray;
mod watercolor;

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand::rngs::StdRng;

use crate::brush::BrushParameters;
use crate::raster::{LineCap, LineJoin, Paint, RasterTarget};
use crate::stroke::Velocity;
use crate::types::StrokeStyle;

pub use marker::MarkerRenderer;
pub use pen::PenRenderer;
pub use pencil::PencilRenderer;
pub use spray::SprayRenderer;
pub use watercolor::WatercolorRenderer;

/// Procedural painter for one stroke style
pub trait StyleRenderer {
    fn style(&self) -> StrokeStyle;

    /// Initial mark at the pointer-down position
    fn render_start(
        &self,
        target: &mut dyn RasterTarget,
        params: &BrushParameters,
        origin: Vec2,
        rng: &mut StdRng,
    );

    /// Paint a run. `run[0]` is the last rendered point of the stroke.
    fn render_run(
        &self,
        target: &mut dyn RasterTarget,
        params: &BrushParameters,
        run: &[Vec2],
        velocity: Velocity,
        rng: &mut StdRng,
    );

    /// Paint the unrendered `tail` (possibly empty) and the finishing mark
    /// at `last`. The target has no open path afterwards.
    fn render_end(
        &self,
        target: &mut dyn RasterTarget,
        params: &BrushParameters,
        tail: &[Vec2],
        last: Vec2,
        velocity: Velocity,
        rng: &mut StdRng,
    );
}

/// Renderer registered for `style`
pub fn renderer_for(style: StrokeStyle) -> Box<dyn StyleRenderer> {
    match style {
        StrokeStyle::Pencil => Box::new(PencilRenderer),
        StrokeStyle::Pen => Box::new(PenRenderer),
        StrokeStyle::Marker => Box::new(MarkerRenderer),
        StrokeStyle::Watercolor => Box::new(WatercolorRenderer),
        StrokeStyle::Spray => Box::new(SprayRenderer),
    }
}

/// Line state shared by the path-based styles
fn apply_line_state(target: &mut dyn RasterTarget, params: &BrushParameters, width: f32) {
    target.set_composite(params.composite());
    target.set_global_alpha(params.opacity());
    target.set_line_width(width);
    target.set_line_cap(LineCap::Round);
    target.set_line_join(LineJoin::Round);
    target.set_stroke_paint(Paint::Solid(params.rgba(1.0)));
    target.set_fill_paint(Paint::Solid(params.rgba(1.0)));
}

/// Uniform offset in `[-magnitude/2, magnitude/2]` on each axis
fn jitter(rng: &mut StdRng, magnitude: f32) -> Vec2 {
    Vec2::new(
        (rng.random::<f32>() - 0.5) * magnitude,
        (rng.random::<f32>() - 0.5) * magnitude,
    )
}

/// Eight-vertex approximation of a circle with per-vertex radius jitter
/// of 0.8..1.2
fn irregular_blob(rng: &mut StdRng, center: Vec2, radius: f32, start_angle: f32) -> Vec<Vec2> {
    (0..8)
        .map(|j| {
            let r = radius * (0.8 + rng.random::<f32>() * 0.4);
            let angle = start_angle + j as f32 / 8.0 * TAU;
            center + r * Vec2::from_angle(angle)
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use crate::raster::{Canvas, RasterTarget};

    pub const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

    pub fn white_canvas(w: u32, h: u32) -> Canvas {
        let mut canvas = Canvas::new(w, h).unwrap();
        canvas.clear(WHITE);
        canvas
    }

    pub fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    /// Number of pixels that differ from white
    pub fn painted(canvas: &Canvas) -> usize {
        let mut count = 0;
        for y in 0..canvas.height() {
            for x in 0..canvas.width() {
                if canvas.pixel(x, y) != Some(WHITE) {
                    count += 1;
                }
            }
        }
        count
    }

    /// Red channel, 1.0 for untouched white
    pub fn lightness(canvas: &Canvas, x: u32, y: u32) -> f32 {
        canvas.pixel(x, y).map(|p| p[0]).unwrap_or(1.0)
    }
}
