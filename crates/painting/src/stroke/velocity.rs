//! Pointer velocity and simulated pressure

use crate::constants::MIN_VELOCITY_DT_MS;
use crate::types::SamplePoint;

/// Current pointer speed together with the clamp it was measured against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Velocity {
    /// Speed in px/ms, always within `0..=max_px_per_ms`
    pub px_per_ms: f32,
    pub max_px_per_ms: f32,
}

impl Velocity {
    pub fn at_rest(max_px_per_ms: f32) -> Self {
        Self {
            px_per_ms: 0.0,
            max_px_per_ms,
        }
    }

    /// Speed between two samples, clamped to `[0, max]`.
    ///
    /// Δt is floored at 1ms so duplicate or reordered timestamps cannot blow
    /// the estimate up.
    pub fn between(previous: &SamplePoint, current: &SamplePoint, max_px_per_ms: f32) -> Self {
        let distance = previous.position().distance(current.position());
        let dt = current
            .timestamp_ms
            .saturating_sub(previous.timestamp_ms)
            .max(MIN_VELOCITY_DT_MS) as f32;
        let speed = distance / dt;
        let px_per_ms = if speed.is_finite() {
            speed.clamp(0.0, max_px_per_ms)
        } else {
            0.0
        };
        Self {
            px_per_ms,
            max_px_per_ms,
        }
    }

    /// Speed as a fraction of the clamp, in `[0, 1]`
    pub fn normalized(&self) -> f32 {
        if self.max_px_per_ms <= 0.0 {
            return 0.0;
        }
        (self.px_per_ms / self.max_px_per_ms).clamp(0.0, 1.0)
    }

    /// Simulated pressure `1 - min(v / max, cap)`.
    ///
    /// `cap_fraction` bounds how much speed may thin the mark, so the factor
    /// stays within `[1 - cap, 1]`.
    pub fn pressure_factor(&self, cap_fraction: f32) -> f32 {
        1.0 - self.normalized().min(cap_fraction.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_velocity_basic() {
        let a = SamplePoint::new(0.0, 0.0, 0);
        let b = SamplePoint::new(30.0, 40.0, 10);
        let v = Velocity::between(&a, &b, 10.0);
        assert!((v.px_per_ms - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_velocity_duplicate_timestamp() {
        let a = SamplePoint::new(0.0, 0.0, 100);
        let b = SamplePoint::new(3.0, 4.0, 100);
        let v = Velocity::between(&a, &b, 10.0);
        // Δt floored to 1ms
        assert!((v.px_per_ms - 5.0).abs() < 1e-6);

        let far = SamplePoint::new(3000.0, 0.0, 100);
        let v = Velocity::between(&a, &far, 10.0);
        assert_eq!(v.px_per_ms, 10.0);
    }

    #[test]
    fn test_velocity_backwards_time_and_same_point() {
        let a = SamplePoint::new(5.0, 5.0, 50);
        let b = SamplePoint::new(5.0, 5.0, 10);
        let v = Velocity::between(&a, &b, 10.0);
        assert_eq!(v.px_per_ms, 0.0);
    }

    #[test]
    fn test_velocity_extreme_timestamps() {
        let a = SamplePoint::new(10.0, 10.0, i64::MIN);
        let b = SamplePoint::new(20.0, 10.0, 0);
        let v = Velocity::between(&a, &b, 10.0);
        assert!((0.0..=10.0).contains(&v.px_per_ms));

        let v = Velocity::between(&b, &SamplePoint::new(20.0, 30.0, i64::MAX), 10.0);
        assert!((0.0..=10.0).contains(&v.px_per_ms));
        let v = Velocity::between(&a, &SamplePoint::new(0.0, 10.0, i64::MAX), 10.0);
        assert!((0.0..=10.0).contains(&v.px_per_ms));
    }

    #[test]
    fn test_pressure_factor_bounds() {
        let fast = Velocity {
            px_per_ms: 10.0,
            max_px_per_ms: 10.0,
        };
        assert!((fast.pressure_factor(0.5) - 0.5).abs() < 1e-6);
        assert!((fast.pressure_factor(0.7) - 0.3).abs() < 1e-6);

        let rest = Velocity::at_rest(10.0);
        assert_eq!(rest.pressure_factor(0.5), 1.0);

        // Cap above 1 still never produces a negative factor
        assert!(fast.pressure_factor(3.0) >= 0.0);
    }
}
