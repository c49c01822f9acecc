//! Point stream processing
//!
//! Turns a live sequence of pointer samples into evenly paced runs:
//! - velocity is re-estimated on every sample
//! - a run is released once the pointer has moved a style- and
//!   size-dependent distance from the last rendered point, or once the
//!   buffer hits the style's cap
//! - the released run always starts at the last rendered point, so
//!   consecutive runs join without a seam

mod smoothing;
mod spacing;
mod velocity;

use tracing::{debug, warn};

use crate::brush::BrushParameters;
use crate::types::SamplePoint;
use crate::validation::sanitize_coord;

pub use smoothing::{SmoothingOrder, smooth};
pub use spacing::{SpacingPolicy, spacing_threshold};
pub use velocity::Velocity;

/// Outcome of feeding one sample
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentDecision {
    /// Keep accumulating
    Buffered,
    /// Render this run now. It starts at the last rendered point and ends at
    /// the sample that triggered the release.
    ReadyToRender(Vec<SamplePoint>),
}

impl SegmentDecision {
    pub fn is_ready(&self) -> bool {
        matches!(self, SegmentDecision::ReadyToRender(_))
    }
}

/// Remaining points when a session closes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FinalRun {
    /// Unrendered tail including its anchor; empty when nothing is pending
    pub points: Vec<SamplePoint>,
    /// Last sample of the stroke, for end-cap effects
    pub last_point: Option<SamplePoint>,
    pub velocity: Option<Velocity>,
}

/// State of one pointer-down to pointer-up gesture
#[derive(Debug, Clone)]
pub struct StrokeSession {
    /// Buffered points; `points[0]` is the last rendered point
    points: Vec<SamplePoint>,
    last_point: SamplePoint,
    origin_timestamp_ms: i64,
    velocity: Velocity,
}

impl StrokeSession {
    fn new(origin: SamplePoint, max_velocity: f32) -> Self {
        Self {
            points: vec![origin],
            last_point: origin,
            origin_timestamp_ms: origin.timestamp_ms,
            velocity: Velocity::at_rest(max_velocity),
        }
    }

    pub fn points(&self) -> &[SamplePoint] {
        &self.points
    }

    pub fn last_point(&self) -> SamplePoint {
        self.last_point
    }

    pub fn last_rendered(&self) -> SamplePoint {
        self.points[0]
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    /// Milliseconds since the session began
    pub fn elapsed_ms(&self) -> i64 {
        self.last_point
            .timestamp_ms
            .saturating_sub(self.origin_timestamp_ms)
    }
}

/// Point stream processor; holds at most one active session
pub struct PointStream {
    session: Option<StrokeSession>,
    max_velocity: f32,
}

impl Default for PointStream {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_MAX_VELOCITY)
    }
}

impl PointStream {
    pub fn new(max_velocity: f32) -> Self {
        Self {
            session: None,
            max_velocity: max_velocity.max(f32::EPSILON),
        }
    }

    pub fn max_velocity(&self) -> f32 {
        self.max_velocity
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&StrokeSession> {
        self.session.as_ref()
    }

    /// Current velocity, at rest when idle
    pub fn velocity(&self) -> Velocity {
        self.session
            .as_ref()
            .map(|s| s.velocity)
            .unwrap_or_else(|| Velocity::at_rest(self.max_velocity))
    }

    /// Start a session at `origin`.
    ///
    /// A session that is still open is discarded first (implicit end); its
    /// tail is returned so the caller can still cap it.
    pub fn begin_session(&mut self, origin: SamplePoint) -> Option<FinalRun> {
        let previous = if self.session.is_some() {
            warn!("PointStream::begin_session: session already active, ending it first");
            Some(self.end_session())
        } else {
            None
        };
        let origin = SamplePoint::new(
            sanitize_coord(origin.x, 0.0),
            sanitize_coord(origin.y, 0.0),
            origin.timestamp_ms,
        );
        debug!(
            "PointStream::begin_session at ({:.1}, {:.1}) t={}",
            origin.x, origin.y, origin.timestamp_ms
        );
        self.session = Some(StrokeSession::new(origin, self.max_velocity));
        previous
    }

    /// Feed one sample using the spacing policy of `params`
    pub fn add_sample(&mut self, sample: SamplePoint, params: &BrushParameters) -> SegmentDecision {
        let max_velocity = self.max_velocity;
        let Some(session) = self.session.as_mut() else {
            debug!("PointStream::add_sample: no active session, ignoring");
            return SegmentDecision::Buffered;
        };

        let sample = SamplePoint::new(
            sanitize_coord(sample.x, session.last_point.x),
            sanitize_coord(sample.y, session.last_point.y),
            sample.timestamp_ms,
        );

        session.velocity = Velocity::between(&session.last_point, &sample, max_velocity);
        session.last_point = sample;
        session.points.push(sample);

        let policy = SpacingPolicy::for_style(params.style());
        let threshold = policy.threshold(params.size(), params.spacing());
        let distance = session.points[0].position().distance(sample.position());

        if distance >= threshold || session.points.len() >= policy.buffer_cap {
            let run = std::mem::replace(&mut session.points, vec![sample]);
            debug!(
                "PointStream::add_sample: release {} points (distance {:.2} / threshold {:.2})",
                run.len(),
                distance,
                threshold
            );
            SegmentDecision::ReadyToRender(run)
        } else {
            SegmentDecision::Buffered
        }
    }

    /// Take the buffered run and re-anchor at the last sample, without
    /// closing the session. Used when the brush style changes mid-stroke.
    pub fn drain_buffer(&mut self) -> Vec<SamplePoint> {
        let Some(session) = self.session.as_mut() else {
            return Vec::new();
        };
        let last = session.last_point;
        let run = std::mem::replace(&mut session.points, vec![last]);
        if run.len() > 1 { run } else { Vec::new() }
    }

    /// Close the session and return the unrendered tail
    pub fn end_session(&mut self) -> FinalRun {
        let Some(session) = self.session.take() else {
            return FinalRun::default();
        };
        let elapsed_ms = session.elapsed_ms();
        let points = if session.points.len() > 1 {
            session.points
        } else {
            Vec::new()
        };
        debug!(
            "PointStream::end_session: {} tail points after {}ms",
            points.len(),
            elapsed_ms
        );
        FinalRun {
            points,
            last_point: Some(session.last_point),
            velocity: Some(session.velocity),
        }
    }
}
