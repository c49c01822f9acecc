//! Brush engine
//!
//! This module ties the stroke engine together:
//! - Input comes in via `begin_session`, `add_sample`, `end_session`
//! - The point stream decides when a run is ready
//! - Ready work is queued with the parameters valid at ingestion time
//! - Queued work is painted by the style renderer onto a borrowed
//!   [`RasterTarget`]
//!
//! The engine is caller-owned and holds no reference to a target between
//! calls. Painting can be deferred: `queue_sample` only ingests, and
//! `paint_pending` renders whatever is queued.

mod params;
mod session;

use std::collections::VecDeque;
use std::rc::Rc;

use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use sketch_config::StrokeConfig;
use tracing::{debug, warn};

use crate::brush::BrushParameters;
use crate::constants::MAX_PENDING_OPS;
use crate::raster::RasterTarget;
use crate::render::{StyleRenderer, renderer_for};
use crate::stroke::{PointStream, Velocity};
use crate::types::StrokeStyle;

/// Brush/style selection state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Idle,
    Drawing,
}

/// Render call waiting for a target
#[derive(Debug, Clone, PartialEq)]
pub enum PaintOp {
    Start { origin: Vec2 },
    Run { run: Vec<Vec2>, velocity: Velocity },
    End { tail: Vec<Vec2>, last: Vec2, velocity: Velocity },
}

pub(crate) struct PendingPaint {
    renderer: Rc<dyn StyleRenderer>,
    params: BrushParameters,
    op: PaintOp,
}

/// Caller-owned stroke engine for one brush
pub struct BrushEngine {
    /// Active brush parameters
    pub(crate) params: BrushParameters,
    /// Renderer for `params.style()`, swapped on style change
    pub(crate) renderer: Rc<dyn StyleRenderer>,
    pub(crate) stream: PointStream,
    pub(crate) rng: StdRng,
    pub(crate) state: EngineState,
    /// Queued render calls, oldest first, at most `MAX_PENDING_OPS`
    pub(crate) pending: VecDeque<PendingPaint>,
    /// Runs discarded since the queue was last painted
    pub(crate) dropped_runs: usize,
}

impl Default for BrushEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl BrushEngine {
    /// Engine with default parameters and an entropy-seeded random source
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng(), crate::constants::DEFAULT_MAX_VELOCITY)
    }

    /// Engine whose jitter, splatter and particles are reproducible
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), crate::constants::DEFAULT_MAX_VELOCITY)
    }

    pub fn from_config(config: &StrokeConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        debug!(
            "BrushEngine::from_config: max_velocity={} seed={:?}",
            config.max_velocity(),
            config.rng_seed
        );
        Self::with_rng(rng, config.max_velocity())
    }

    fn with_rng(rng: StdRng, max_velocity: f32) -> Self {
        let params = BrushParameters::default();
        Self {
            renderer: Rc::from(renderer_for(params.style())),
            params,
            stream: PointStream::new(max_velocity),
            rng,
            state: EngineState::Idle,
            pending: VecDeque::new(),
            dropped_runs: 0,
        }
    }

    /// Restart the random source from `seed`
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        self.state == EngineState::Drawing
    }

    pub fn style(&self) -> StrokeStyle {
        self.params.style()
    }

    /// Style of the renderer currently selected
    pub fn renderer_style(&self) -> StrokeStyle {
        self.renderer.style()
    }

    pub fn stream(&self) -> &PointStream {
        &self.stream
    }

    pub fn velocity(&self) -> Velocity {
        self.stream.velocity()
    }

    /// Number of queued render calls
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Queued operations, oldest first
    pub fn pending_ops(&self) -> impl Iterator<Item = &PaintOp> {
        self.pending.iter().map(|p| &p.op)
    }

    /// Number of queued runs discarded because no target was bound
    pub fn dropped_runs(&self) -> usize {
        self.dropped_runs
    }

    pub(crate) fn queue(&mut self, op: PaintOp) {
        self.pending.push_back(PendingPaint {
            renderer: Rc::clone(&self.renderer),
            params: self.params,
            op,
        });
        if self.pending.len() <= MAX_PENDING_OPS {
            return;
        }
        // Oldest run goes first; start and end marks are kept
        let index = self
            .pending
            .iter()
            .position(|p| matches!(p.op, PaintOp::Run { .. }))
            .unwrap_or(0);
        self.pending.remove(index);
        self.dropped_runs += 1;
        if self.dropped_runs == 1 {
            warn!(
                "BrushEngine::queue: {} operations pending without a target, dropping oldest runs",
                MAX_PENDING_OPS
            );
        }
    }

    /// Render all queued work onto `target`.
    ///
    /// Without a target nothing is painted and the queue is kept for a
    /// later call. Returns the number of render calls made.
    pub fn paint_pending(&mut self, target: Option<&mut dyn RasterTarget>) -> usize {
        if self.pending.is_empty() {
            return 0;
        }
        let Some(target) = target else {
            warn!(
                "BrushEngine::paint_pending: no raster target bound, keeping {} queued operations",
                self.pending.len()
            );
            return 0;
        };

        if self.dropped_runs > 0 {
            warn!(
                "BrushEngine::paint_pending: {} runs were dropped while no target was bound",
                self.dropped_runs
            );
            self.dropped_runs = 0;
        }

        let mut painted = 0;
        while let Some(entry) = self.pending.pop_front() {
            target.save();
            match &entry.op {
                PaintOp::Start { origin } => {
                    entry.renderer.render_start(target, &entry.params, *origin, &mut self.rng);
                }
                PaintOp::Run { run, velocity } => {
                    entry.renderer.render_run(target, &entry.params, run, *velocity, &mut self.rng);
                }
                PaintOp::End { tail, last, velocity } => {
                    entry
                        .renderer
                        .render_end(target, &entry.params, tail, *last, *velocity, &mut self.rng);
                    if target.has_open_path() {
                        debug!("BrushEngine::paint_pending: flushing open path after end cap");
                        target.stroke();
                    }
                }
            }
            target.restore();
            painted += 1;
        }
        debug!("BrushEngine::paint_pending: {} render calls", painted);
        painted
    }
}
