//! Sketch painting system - interactive raster stroke engine
//!
//! This crate turns live pointer samples into painted strokes:
//! - [`types`] - Sample points, stroke styles, compositing modes
//! - [`brush`] - Clamped brush parameters
//! - [`stroke`] - Point stream processing: spacing, velocity, smoothing
//! - [`raster`] - Raster target contract and a CPU canvas implementing it
//! - [`render`] - Procedural renderers for the five stroke styles
//! - [`pipeline`] - The brush engine state machine
//! - [`preset`] - Built-in and user brush presets
//! - [`history`] - Snapshot history for undo/redo

pub mod brush;
pub mod color;
pub mod constants;
pub mod history;
pub mod pipeline;
pub mod preset;
pub mod raster;
pub mod render;
pub mod stroke;
pub mod surface;
pub mod types;
pub mod validation;

pub use brush::*;
pub use color::*;
pub use constants::*;
pub use history::*;
pub use pipeline::*;
pub use preset::*;
pub use raster::{Canvas, RasterError, RasterTarget};
pub use render::{StyleRenderer, renderer_for};
pub use stroke::{FinalRun, PointStream, SegmentDecision, Velocity};
pub use surface::*;
pub use types::*;
pub use validation::*;
