//! Windowed smoothing for point runs
//!
//! Both passes keep the first and last point fixed, so consecutive runs of a
//! stroke still meet exactly at their shared endpoint. Strength scales
//! linearly with smoothness: 0% returns the input unchanged.

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmoothingOrder {
    /// Raw points
    #[default]
    None,
    /// 3-point local average (pencil, marker)
    Local,
    /// 4-neighbour weighted estimate (pen)
    Cubic,
}

impl SmoothingOrder {
    /// Shortest run the pass will touch
    pub fn min_points(&self) -> usize {
        match self {
            SmoothingOrder::None => 0,
            SmoothingOrder::Local => 3,
            SmoothingOrder::Cubic => 4,
        }
    }
}

/// Smooth `points` with the given order and smoothness percentage
pub fn smooth(points: &[Vec2], order: SmoothingOrder, smoothness_pct: f32) -> Vec<Vec2> {
    let strength = (smoothness_pct / 100.0).clamp(0.0, 1.0);
    if points.len() < order.min_points() || strength == 0.0 {
        return points.to_vec();
    }
    match order {
        SmoothingOrder::None => points.to_vec(),
        SmoothingOrder::Local => smooth_local(points, strength),
        SmoothingOrder::Cubic => smooth_cubic(points, strength),
    }
}

/// Each interior point moves toward the midpoint of its neighbours, up to
/// halfway at full strength.
fn smooth_local(points: &[Vec2], strength: f32) -> Vec<Vec2> {
    let last = points.len() - 1;
    let mut result = Vec::with_capacity(points.len());
    result.push(points[0]);
    for i in 1..last {
        let laplacian = points[i - 1] - 2.0 * points[i] + points[i + 1];
        result.push(points[i] + strength * 0.5 * laplacian);
    }
    result.push(points[last]);
    result
}

/// Each interior point blends toward a 1-4-4-1 weighted average of its two
/// neighbours on each side. Beyond the ends the run is extended linearly, so
/// evenly spaced straight runs are left in place.
fn smooth_cubic(points: &[Vec2], strength: f32) -> Vec<Vec2> {
    let last = points.len() - 1;
    let at = |i: isize| -> Vec2 {
        if i < 0 {
            2.0 * points[0] - points[1]
        } else if i as usize > last {
            2.0 * points[last] - points[last - 1]
        } else {
            points[i as usize]
        }
    };
    let mut result = Vec::with_capacity(points.len());
    result.push(points[0]);
    for i in 1..last {
        let i = i as isize;
        let estimate = (at(i - 2) + 4.0 * at(i - 1) + 4.0 * at(i + 1) + at(i + 2)) / 10.0;
        let current = points[i as usize];
        result.push(current + strength * (estimate - current));
    }
    result.push(points[last]);
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag(n: usize) -> Vec<Vec2> {
        (0..n)
            .map(|i| Vec2::new(i as f32 * 10.0, if i % 2 == 0 { 0.0 } else { 8.0 }))
            .collect()
    }

    #[test]
    fn test_zero_smoothness_is_identity() {
        let points = zigzag(7);
        assert_eq!(smooth(&points, SmoothingOrder::Local, 0.0), points);
        assert_eq!(smooth(&points, SmoothingOrder::Cubic, 0.0), points);
    }

    #[test]
    fn test_short_runs_unchanged() {
        let two = zigzag(2);
        assert_eq!(smooth(&two, SmoothingOrder::Local, 100.0), two);
        let three = zigzag(3);
        assert_eq!(smooth(&three, SmoothingOrder::Cubic, 100.0), three);
        assert_ne!(smooth(&three, SmoothingOrder::Local, 100.0), three);
    }

    #[test]
    fn test_endpoints_preserved() {
        let points = zigzag(9);
        for order in [SmoothingOrder::Local, SmoothingOrder::Cubic] {
            let out = smooth(&points, order, 100.0);
            assert_eq!(out.len(), points.len());
            assert_eq!(out[0], points[0]);
            assert_eq!(out[8], points[8]);
        }
    }

    #[test]
    fn test_smoothing_flattens_spike() {
        let mut points: Vec<Vec2> = (0..9).map(|i| Vec2::new(i as f32 * 10.0, 0.0)).collect();
        points[4].y = 8.0;
        let peak = |p: &[Vec2]| p.iter().map(|v| v.y.abs()).fold(0.0, f32::max);
        for order in [SmoothingOrder::Local, SmoothingOrder::Cubic] {
            let out = smooth(&points, order, 100.0);
            assert!(peak(&out) < peak(&points));
        }
    }

    #[test]
    fn test_straight_line_is_fixed_point() {
        let line: Vec<Vec2> = (0..6).map(|i| Vec2::new(i as f32 * 4.0, 2.0)).collect();
        for order in [SmoothingOrder::Local, SmoothingOrder::Cubic] {
            let out = smooth(&line, order, 100.0);
            for (a, b) in out.iter().zip(&line) {
                assert!(a.distance(*b) < 1e-4);
            }
        }
    }

    #[test]
    fn test_strength_is_continuous() {
        let points = zigzag(6);
        let a = smooth(&points, SmoothingOrder::Cubic, 50.0);
        let b = smooth(&points, SmoothingOrder::Cubic, 50.1);
        for (p, q) in a.iter().zip(&b) {
            assert!(p.distance(*q) < 0.05);
        }
    }
}
