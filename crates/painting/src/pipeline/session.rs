//! Stroke session handling for the brush engine

use tracing::debug;

use crate::raster::RasterTarget;
use crate::stroke::{FinalRun, SegmentDecision};
use crate::types::SamplePoint;

use super::{BrushEngine, EngineState, PaintOp};

impl BrushEngine {
    /// Begin a stroke at `origin` and paint the style's start mark.
    ///
    /// Beginning while a stroke is still open ends that stroke first.
    pub fn begin_session(&mut self, origin: SamplePoint, target: Option<&mut dyn RasterTarget>) {
        if let Some(previous) = self.stream.begin_session(origin) {
            self.queue_end(&previous);
        }
        let origin = self
            .stream
            .session()
            .map(|s| s.last_point().position())
            .unwrap_or_else(|| origin.position());
        self.queue(PaintOp::Start { origin });
        self.state = EngineState::Drawing;
        self.paint_pending(target);
    }

    /// Ingest a sample without painting.
    ///
    /// A released run is queued together with a copy of the current
    /// parameters; `paint_pending` renders it later.
    pub fn queue_sample(&mut self, sample: SamplePoint) -> SegmentDecision {
        if self.state == EngineState::Idle {
            debug!("BrushEngine::queue_sample: no active session, ignoring");
            return SegmentDecision::Buffered;
        }
        let decision = self.stream.add_sample(sample, &self.params);
        if let SegmentDecision::ReadyToRender(run) = &decision {
            let run = run.iter().map(SamplePoint::position).collect();
            let velocity = self.stream.velocity();
            self.queue(PaintOp::Run { run, velocity });
        }
        decision
    }

    /// Ingest a sample and paint whatever became ready
    pub fn add_sample(
        &mut self,
        sample: SamplePoint,
        target: Option<&mut dyn RasterTarget>,
    ) -> SegmentDecision {
        let decision = self.queue_sample(sample);
        self.paint_pending(target);
        decision
    }

    /// Close the stroke: paint the remaining tail and the end mark.
    ///
    /// Returns the tail that was handed to the renderer.
    pub fn end_session(&mut self, target: Option<&mut dyn RasterTarget>) -> FinalRun {
        if self.state == EngineState::Idle {
            debug!("BrushEngine::end_session: no active session");
            return FinalRun::default();
        }
        let final_run = self.stream.end_session();
        self.queue_end(&final_run);
        self.state = EngineState::Idle;
        self.paint_pending(target);
        final_run
    }

    /// Cancel the stroke, e.g. when the pointer leaves the canvas.
    ///
    /// The target is left exactly as `end_session` would leave it.
    pub fn abort_session(&mut self, target: Option<&mut dyn RasterTarget>) -> FinalRun {
        debug!("BrushEngine::abort_session");
        self.end_session(target)
    }

    fn queue_end(&mut self, final_run: &FinalRun) {
        let Some(last) = final_run.last_point else {
            return;
        };
        let velocity = final_run.velocity.unwrap_or_else(|| self.stream.velocity());
        let tail = final_run.points.iter().map(SamplePoint::position).collect();
        self.queue(PaintOp::End {
            tail,
            last: last.position(),
            velocity,
        });
    }
}
