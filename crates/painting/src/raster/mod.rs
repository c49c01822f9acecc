//! Raster target abstraction
//!
//! [`RasterTarget`] is the drawing-surface contract the brush renderers paint
//! through: canvas-style path construction, stroke/fill with a paint, line
//! and compositing state with save/restore, and whole-surface snapshots for
//! the history store. [`Canvas`] implements it on a `tiny_skia::Pixmap`.
//!
//! Unlike an HTML canvas, `stroke` and `fill` consume the current path. A
//! target therefore has an open path exactly when segments were added and
//! never painted, which is what [`RasterTarget::has_open_path`] reports.

mod canvas;
mod paint;

use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::surface::Snapshot;
use crate::types::CompositeOp;

pub use canvas::{Canvas, DrawState};
pub use paint::{Gradient, GradientKind, GradientStop, Paint};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RasterError {
    #[error("cannot allocate a {width}x{height} canvas")]
    InvalidSize { width: u32, height: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    Butt,
    #[default]
    Round,
    Square,
}

/// Corner treatment between segments. `Bevel` leaves the outer notch of the
/// corner unfilled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    #[default]
    Round,
    Bevel,
}

/// A 2D pixel surface the brush renderers draw onto
pub trait RasterTarget {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Push the drawing state (line, alpha, composite, paints)
    fn save(&mut self);
    /// Pop the drawing state; the current path is not part of it
    fn restore(&mut self);

    fn set_line_width(&mut self, width: f32);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);
    fn set_global_alpha(&mut self, alpha: f32);
    fn set_composite(&mut self, op: CompositeOp);
    fn set_stroke_paint(&mut self, paint: Paint);
    fn set_fill_paint(&mut self, paint: Paint);

    /// Discard the current path
    fn begin_path(&mut self);
    fn move_to(&mut self, p: Vec2);
    fn line_to(&mut self, p: Vec2);
    fn quadratic_curve_to(&mut self, control: Vec2, p: Vec2);
    fn bezier_curve_to(&mut self, control1: Vec2, control2: Vec2, p: Vec2);
    /// Clockwise arc from `start_angle` to `end_angle` (radians)
    fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32);
    fn close_path(&mut self);

    /// Paint the current path's outline and discard the path
    fn stroke(&mut self);
    /// Paint the current path's interior (non-zero winding) and discard the path
    fn fill(&mut self);

    /// True while path segments exist that were neither stroked nor filled
    fn has_open_path(&self) -> bool;

    fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]>;
    fn snapshot(&self) -> Snapshot;
    /// Overwrite all pixels. Returns false if the snapshot does not fit.
    fn put_snapshot(&mut self, snapshot: &Snapshot) -> bool;

    /// Fill a disc with the current fill paint
    fn fill_circle(&mut self, center: Vec2, radius: f32) {
        self.begin_path();
        self.arc(center, radius, 0.0, TAU);
        self.close_path();
        self.fill();
    }

    /// Fill a closed polygon with the current fill paint
    fn fill_polygon(&mut self, points: &[Vec2]) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        self.begin_path();
        self.move_to(*first);
        for p in rest {
            self.line_to(*p);
        }
        self.close_path();
        self.fill();
    }
}
