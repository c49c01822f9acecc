//! Solid and gradient paints

use glam::Vec2;
use tiny_skia::{LinearGradient, Point, RadialGradient, Shader, SpreadMode, Transform};

use crate::surface::to_skia_color;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient, 0..1
    pub offset: f32,
    /// Straight-alpha RGBA
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientKind {
    Linear { start: Vec2, end: Vec2 },
    /// Circular gradient from `center` (offset 0) to `radius` (offset 1)
    Radial { center: Vec2, radius: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub kind: GradientKind,
    stops: Vec<GradientStop>,
}

impl Gradient {
    pub fn linear(start: Vec2, end: Vec2) -> Self {
        Self {
            kind: GradientKind::Linear { start, end },
            stops: Vec::new(),
        }
    }

    pub fn radial(center: Vec2, radius: f32) -> Self {
        Self {
            kind: GradientKind::Radial { center, radius },
            stops: Vec::new(),
        }
    }

    /// Add a colour stop; stops stay sorted by offset
    pub fn with_stop(mut self, offset: f32, color: [f32; 4]) -> Self {
        let offset = if offset.is_nan() { 0.0 } else { offset.clamp(0.0, 1.0) };
        let index = self.stops.partition_point(|s| s.offset <= offset);
        self.stops.insert(index, GradientStop { offset, color });
        self
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    fn shader(&self, alpha: f32) -> Option<Shader<'static>> {
        let stops: Vec<_> = self
            .stops
            .iter()
            .map(|s| {
                let mut color = s.color;
                color[3] *= alpha;
                tiny_skia::GradientStop::new(s.offset, to_skia_color(color))
            })
            .collect();
        let last = self.stops.last()?;
        let shader = match self.kind {
            GradientKind::Linear { start, end } => LinearGradient::new(
                point(start),
                point(end),
                stops,
                SpreadMode::Pad,
                Transform::identity(),
            ),
            GradientKind::Radial { center, radius } => RadialGradient::new(
                point(center),
                point(center),
                radius,
                stops,
                SpreadMode::Pad,
                Transform::identity(),
            ),
        };
        // A degenerate axis or radius paints the outermost stop
        shader.or_else(|| {
            let mut color = last.color;
            color[3] *= alpha;
            Some(Shader::SolidColor(to_skia_color(color)))
        })
    }
}

fn point(p: Vec2) -> Point {
    Point::from_xy(p.x, p.y)
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid([f32; 4]),
    Gradient(Gradient),
}

impl Default for Paint {
    fn default() -> Self {
        Paint::Solid([0.0, 0.0, 0.0, 1.0])
    }
}

impl Paint {
    /// Shader for this paint with every alpha scaled by `alpha`. `None`
    /// for a gradient without stops, which paints nothing.
    pub fn to_shader(&self, alpha: f32) -> Option<Shader<'static>> {
        match self {
            Paint::Solid(color) => {
                let mut color = *color;
                color[3] *= alpha;
                Some(Shader::SolidColor(to_skia_color(color)))
            }
            Paint::Gradient(gradient) => gradient.shader(alpha),
        }
    }
}

impl From<Gradient> for Paint {
    fn from(gradient: Gradient) -> Self {
        Paint::Gradient(gradient)
    }
}
