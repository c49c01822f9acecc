//! [`RasterTarget`] implementation over a tiny-skia [`Pixmap`]

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use sketch_config::CanvasConfig;
use tiny_skia::{BlendMode, FillRule, PathBuilder, Pixmap, Rect, Stroke, Transform};
use tracing::{debug, warn};

use super::paint::Paint;
use super::{LineCap, LineJoin, RasterError, RasterTarget};
use crate::color::Rgb24;
use crate::surface::{Snapshot, straight_rgba, to_skia_color};
use crate::types::CompositeOp;

/// Drawing state saved and restored as a unit
#[derive(Debug, Clone, PartialEq)]
pub struct DrawState {
    pub line_width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub global_alpha: f32,
    pub composite: CompositeOp,
    pub stroke_paint: Paint,
    pub fill_paint: Paint,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            global_alpha: 1.0,
            composite: CompositeOp::SourceOver,
            stroke_paint: Paint::default(),
            fill_paint: Paint::default(),
        }
    }
}

impl DrawState {
    fn paint(&self, paint: &Paint) -> Option<tiny_skia::Paint<'static>> {
        let shader = paint.to_shader(self.global_alpha)?;
        Some(tiny_skia::Paint {
            shader,
            blend_mode: blend_mode(self.composite),
            anti_alias: true,
            ..tiny_skia::Paint::default()
        })
    }

    fn stroke(&self) -> Stroke {
        Stroke {
            width: self.line_width,
            line_cap: match self.line_cap {
                LineCap::Butt => tiny_skia::LineCap::Butt,
                LineCap::Round => tiny_skia::LineCap::Round,
                LineCap::Square => tiny_skia::LineCap::Square,
            },
            line_join: match self.line_join {
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            },
            ..Stroke::default()
        }
    }
}

fn blend_mode(op: CompositeOp) -> BlendMode {
    match op {
        CompositeOp::SourceOver => BlendMode::SourceOver,
        CompositeOp::Multiply => BlendMode::Multiply,
        CompositeOp::Overlay => BlendMode::Overlay,
    }
}

fn finite(p: Vec2) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Path under construction, with the bookkeeping canvas semantics need
#[derive(Default)]
struct OpenPath {
    builder: PathBuilder,
    /// Current point of the open subpath
    current: Option<Vec2>,
    subpath_start: Option<Vec2>,
    /// Segments added since the path was last painted or discarded
    segments: usize,
    /// Bounding box of every point, for single-point strokes
    bounds: Option<(Vec2, Vec2)>,
}

impl OpenPath {
    fn touch(&mut self, p: Vec2) {
        self.bounds = Some(match self.bounds {
            Some((min, max)) => (min.min(p), max.max(p)),
            None => (p, p),
        });
    }

    /// A subpath exists to continue from; starts one at `p` otherwise
    fn ensure_subpath(&mut self, p: Vec2) {
        if self.current.is_none() {
            self.move_to(p);
        }
    }

    fn move_to(&mut self, p: Vec2) {
        if !finite(p) {
            return;
        }
        self.builder.move_to(p.x, p.y);
        self.current = Some(p);
        self.subpath_start = Some(p);
        self.touch(p);
    }

    fn line_to(&mut self, p: Vec2) {
        if !finite(p) {
            return;
        }
        if self.current.is_none() {
            self.move_to(p);
            return;
        }
        self.builder.line_to(p.x, p.y);
        self.current = Some(p);
        self.segments += 1;
        self.touch(p);
    }

    fn quad_to(&mut self, control: Vec2, p: Vec2) {
        if !finite(control) || !finite(p) {
            return;
        }
        self.ensure_subpath(control);
        self.builder.quad_to(control.x, control.y, p.x, p.y);
        self.current = Some(p);
        self.segments += 1;
        self.touch(control);
        self.touch(p);
    }

    fn cubic_to(&mut self, c1: Vec2, c2: Vec2, p: Vec2) {
        if !finite(c1) || !finite(c2) || !finite(p) {
            return;
        }
        self.ensure_subpath(c1);
        self.builder.cubic_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y);
        self.current = Some(p);
        self.segments += 1;
        self.touch(c1);
        self.touch(c2);
        self.touch(p);
    }

    /// Clockwise arc as cubic pieces of at most a quarter turn. Sweeps of a
    /// full turn or more draw a full circle.
    fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32) {
        if !finite(center) || !radius.is_finite() || !start_angle.is_finite() || !end_angle.is_finite() {
            return;
        }
        let radius = radius.max(0.0);
        let sweep = end_angle - start_angle;
        let sweep = if sweep >= TAU { TAU } else { sweep.rem_euclid(TAU) };

        let start = center + radius * Vec2::from_angle(start_angle);
        if self.current.is_some() {
            self.line_to(start);
        } else {
            self.move_to(start);
        }

        let pieces = (sweep / FRAC_PI_2).ceil().max(1.0) as usize;
        let step = sweep / pieces as f32;
        let k = 4.0 / 3.0 * (step / 4.0).tan();
        for i in 0..pieces {
            let a0 = start_angle + step * i as f32;
            let a1 = a0 + step;
            let (d0, d1) = (Vec2::from_angle(a0), Vec2::from_angle(a1));
            let p0 = center + radius * d0;
            let p1 = center + radius * d1;
            let c1 = p0 + radius * k * d0.perp();
            let c2 = p1 - radius * k * d1.perp();
            self.cubic_to(c1, c2, p1);
        }
    }

    fn close(&mut self) {
        if self.current.is_none() {
            return;
        }
        self.builder.close();
        self.current = self.subpath_start;
        self.segments += 1;
    }

    /// Single point the path collapses to, if it does
    fn degenerate_point(&self) -> Option<Vec2> {
        let (min, max) = self.bounds?;
        (self.segments > 0 && (max - min).length() < 1e-3).then_some(min)
    }
}

/// Software canvas
pub struct Canvas {
    pixmap: Pixmap,
    state: DrawState,
    stack: Vec<DrawState>,
    path: OpenPath,
}

impl Canvas {
    /// Transparent canvas of the given size
    pub fn new(width: u32, height: u32) -> Result<Self, RasterError> {
        let pixmap = Pixmap::new(width, height).ok_or(RasterError::InvalidSize { width, height })?;
        Ok(Self {
            pixmap,
            state: DrawState::default(),
            stack: Vec::new(),
            path: OpenPath::default(),
        })
    }

    /// Canvas sized by the config's scaled dimensions and cleared to its
    /// background colour
    pub fn from_config(config: &CanvasConfig) -> Result<Self, RasterError> {
        let mut canvas = Self::new(config.scaled_width(), config.scaled_height())?;
        let background = match Rgb24::from_hex(&config.background) {
            Ok(color) => color,
            Err(e) => {
                warn!("Canvas::from_config: {}, using white", e);
                Rgb24::WHITE
            }
        };
        canvas.clear(background.to_rgba(1.0));
        debug!(
            "Canvas::from_config: {}x{} background={}",
            canvas.pixmap.width(),
            canvas.pixmap.height(),
            background
        );
        Ok(canvas)
    }

    /// Overwrite every pixel with a straight-alpha colour
    pub fn clear(&mut self, rgba: [f32; 4]) {
        self.pixmap.fill(to_skia_color(rgba));
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// Disc or square standing in for a stroke that never leaves its point
    fn stroke_dot(&mut self, center: Vec2) {
        let half = self.state.line_width / 2.0;
        let shape = match self.state.line_cap {
            LineCap::Butt => None,
            LineCap::Round => PathBuilder::from_circle(center.x, center.y, half),
            LineCap::Square => Rect::from_xywh(center.x - half, center.y - half, half * 2.0, half * 2.0)
                .map(PathBuilder::from_rect),
        };
        let (Some(shape), Some(paint)) = (shape, self.state.paint(&self.state.stroke_paint)) else {
            return;
        };
        self.pixmap
            .fill_path(&shape, &paint, FillRule::Winding, Transform::identity(), None);
    }
}

impl RasterTarget for Canvas {
    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn set_line_width(&mut self, width: f32) {
        // Non-positive and non-finite widths are ignored
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.state.line_cap = cap;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() {
            self.state.global_alpha = alpha.clamp(0.0, 1.0);
        }
    }

    fn set_composite(&mut self, op: CompositeOp) {
        self.state.composite = op;
    }

    fn set_stroke_paint(&mut self, paint: Paint) {
        self.state.stroke_paint = paint;
    }

    fn set_fill_paint(&mut self, paint: Paint) {
        self.state.fill_paint = paint;
    }

    fn begin_path(&mut self) {
        self.path = OpenPath::default();
    }

    fn move_to(&mut self, p: Vec2) {
        self.path.move_to(p);
    }

    fn line_to(&mut self, p: Vec2) {
        self.path.line_to(p);
    }

    fn quadratic_curve_to(&mut self, control: Vec2, p: Vec2) {
        self.path.quad_to(control, p);
    }

    fn bezier_curve_to(&mut self, control1: Vec2, control2: Vec2, p: Vec2) {
        self.path.cubic_to(control1, control2, p);
    }

    fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32) {
        self.path.arc(center, radius, start_angle, end_angle);
    }

    fn close_path(&mut self) {
        self.path.close();
    }

    fn stroke(&mut self) {
        let path = std::mem::take(&mut self.path);
        if let Some(center) = path.degenerate_point() {
            self.stroke_dot(center);
            return;
        }
        let (Some(shape), Some(paint)) = (path.builder.finish(), self.state.paint(&self.state.stroke_paint)) else {
            return;
        };
        self.pixmap
            .stroke_path(&shape, &paint, &self.state.stroke(), Transform::identity(), None);
    }

    fn fill(&mut self) {
        let path = std::mem::take(&mut self.path);
        let (Some(shape), Some(paint)) = (path.builder.finish(), self.state.paint(&self.state.fill_paint)) else {
            return;
        };
        self.pixmap
            .fill_path(&shape, &paint, FillRule::Winding, Transform::identity(), None);
    }

    fn has_open_path(&self) -> bool {
        self.path.segments > 0
    }

    fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        self.pixmap.pixel(x, y).map(straight_rgba)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::from_pixmap(&self.pixmap)
    }

    fn put_snapshot(&mut self, snapshot: &Snapshot) -> bool {
        snapshot.restore_into(&mut self.pixmap)
    }
}
