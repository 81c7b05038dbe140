//! Piecewise-linear elevation lookup over an ordered polyline.
//!
//! Used both for ground-surface height queries and for resampling the seed
//! phreatic polyline near the toe (see [`crate::phreatic`]).

use crate::types::ProfilePoint;

/// Piecewise-linear interpolant over (x, elevation) samples.
///
/// Samples must be ordered by non-decreasing x. Queries outside the covered
/// x-range return `None`; there is no extrapolation. Exact hits on a shared
/// segment boundary are unambiguous: the first matching segment wins.
///
/// # Example
///
/// ```
/// use dam2geom::interpolate::PiecewiseLinear;
/// use dam2geom::types::ProfilePoint;
///
/// let line = PiecewiseLinear::new(vec![
///     ProfilePoint::new(0.0, 0.0),
///     ProfilePoint::new(10.0, 2.0),
/// ]);
/// assert_eq!(line.at(5.0), Some(1.0));
/// assert_eq!(line.at(-1.0), None);
/// ```
#[derive(Clone, Debug)]
pub struct PiecewiseLinear {
    points: Vec<ProfilePoint>,
}

impl PiecewiseLinear {
    /// Create an interpolant from ordered samples.
    ///
    /// # Panics
    ///
    /// Panics if the sample x-values are not non-decreasing.
    pub fn new(points: Vec<ProfilePoint>) -> Self {
        assert!(
            points.windows(2).all(|w| w[1].x >= w[0].x),
            "interpolation samples must be ordered by non-decreasing x"
        );
        Self { points }
    }

    /// The samples this interpolant was built from.
    pub fn points(&self) -> &[ProfilePoint] {
        &self.points
    }

    /// Linearly interpolated elevation at `x`, or `None` outside the
    /// covered range.
    pub fn at(&self, x: f64) -> Option<f64> {
        for pair in self.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if x < a.x || x > b.x {
                continue;
            }
            if b.x == a.x {
                // Degenerate (vertical) segment: its left sample wins.
                return Some(a.z);
            }
            let t = (x - a.x) / (b.x - a.x);
            return Some(a.z + t * (b.z - a.z));
        }

        // A single-sample polyline still covers its own x.
        if self.points.len() == 1 && self.points[0].x == x {
            return Some(self.points[0].z);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    fn line(samples: &[(f64, f64)]) -> PiecewiseLinear {
        PiecewiseLinear::new(
            samples
                .iter()
                .map(|&(x, z)| ProfilePoint::new(x, z))
                .collect(),
        )
    }

    #[test]
    fn test_exact_linear_interpolation() {
        let l = line(&[(0.0, 1.0), (10.0, 3.0)]);
        assert!((l.at(2.5).unwrap() - 1.5).abs() < TOL);
        assert!((l.at(5.0).unwrap() - 2.0).abs() < TOL);
        assert!((l.at(7.5).unwrap() - 2.5).abs() < TOL);
    }

    #[test]
    fn test_endpoints_are_inclusive() {
        let l = line(&[(0.0, 1.0), (10.0, 3.0)]);
        assert_eq!(l.at(0.0), Some(1.0));
        assert_eq!(l.at(10.0), Some(3.0));
    }

    #[test]
    fn test_no_extrapolation() {
        let l = line(&[(0.0, 1.0), (10.0, 3.0)]);
        assert_eq!(l.at(-0.001), None);
        assert_eq!(l.at(10.001), None);
    }

    #[test]
    fn test_shared_vertex_first_segment_wins() {
        // Kink at x = 5; both segments cover x = 5 and agree on the value.
        let l = line(&[(0.0, 0.0), (5.0, 2.0), (10.0, 0.0)]);
        assert_eq!(l.at(5.0), Some(2.0));
    }

    #[test]
    fn test_vertical_segment_takes_left_sample() {
        let l = line(&[(0.0, 0.0), (5.0, 2.0), (5.0, 3.0), (10.0, 3.0)]);
        assert_eq!(l.at(5.0), Some(2.0));
    }

    #[test]
    fn test_single_sample() {
        let l = line(&[(4.0, 1.5)]);
        assert_eq!(l.at(4.0), Some(1.5));
        assert_eq!(l.at(4.1), None);
    }

    #[test]
    #[should_panic(expected = "non-decreasing")]
    fn test_unordered_samples_panic() {
        line(&[(10.0, 0.0), (0.0, 1.0)]);
    }
}
