//! Nearest-neighbour value function
//!
//! Wraps a [`SpatialIndex`] into a function from query points to quantity
//! values: an inverse-distance-weighted mean of the k nearest samples, or a
//! background value when the closest sample is too far away.

use crate::index::SpatialIndex;
use hydroset_core::{DomainFrame, Error, Result, SamplePoint};
use rayon::prelude::*;

/// Threshold/background default: effectively infinite, so the function
/// never falls back unless the caller asks it to.
pub const EFFECTIVELY_INFINITE: f64 = 9.0e100;

/// Guards the inverse-distance weight against a zero distance.
const DISTANCE_EPSILON: f64 = 1.0e-100;

/// A point-valued function backed by nearest-neighbour interpolation.
///
/// A query point is in range iff its *nearest* sample lies closer than
/// `threshold_distance`. Only that rank-0 distance gates inclusion; for
/// `k > 1` the remaining neighbours contribute to the weighted mean
/// regardless of their own distances. Out-of-range points get
/// `background_value`.
#[derive(Debug)]
pub struct NearestValueFn {
    index: SpatialIndex,
    threshold_distance: f64,
    background_value: f64,
    k: usize,
}

impl NearestValueFn {
    /// Build from sample points with explicit parameters.
    ///
    /// Fails with `InvalidInput` when `points` is empty or `k < 1`.
    pub fn build(
        points: Vec<SamplePoint>,
        threshold_distance: f64,
        background_value: f64,
        k: usize,
    ) -> Result<Self> {
        if k < 1 {
            return Err(Error::InvalidInput(
                "k_nearest_neighbours must be at least 1".into(),
            ));
        }

        Ok(Self {
            index: SpatialIndex::build(points)?,
            threshold_distance,
            background_value,
            k,
        })
    }

    /// Build with the default parameters: single nearest neighbour,
    /// effectively infinite threshold and background.
    pub fn from_points(points: Vec<SamplePoint>) -> Result<Self> {
        Self::build(points, EFFECTIVELY_INFINITE, EFFECTIVELY_INFINITE, 1)
    }

    /// Evaluate at a batch of absolute-frame query points.
    pub fn evaluate(&self, points: &[(f64, f64)]) -> Vec<f64> {
        points
            .par_iter()
            .map(|&(x, y)| self.evaluate_one(x, y))
            .collect()
    }

    /// Evaluate at a batch of domain-local query points.
    pub fn evaluate_local(&self, frame: &DomainFrame, points: &[(f64, f64)]) -> Vec<f64> {
        points
            .par_iter()
            .map(|&(x, y)| {
                let (ax, ay) = frame.to_absolute(x, y);
                self.evaluate_one(ax, ay)
            })
            .collect()
    }

    fn evaluate_one(&self, x: f64, y: f64) -> f64 {
        let neighbours = self.index.k_nearest(x, y, self.k);

        // Only the nearest neighbour's distance decides in/out of range
        if neighbours[0].distance >= self.threshold_distance {
            return self.background_value;
        }

        let mut numerator = 0.0;
        let mut denominator = 0.0;
        for nbr in &neighbours {
            let weight = 1.0 / (nbr.distance + DISTANCE_EPSILON);
            numerator += nbr.value * weight;
            denominator += weight;
        }

        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_samples() -> Vec<SamplePoint> {
        vec![
            SamplePoint::new(0.0, 0.0, 5.0),
            SamplePoint::new(10.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn test_k1_within_threshold_takes_nearest_value() {
        let f = NearestValueFn::build(two_samples(), 100.0, -1.0, 1).unwrap();
        let out = f.evaluate(&[(0.0, 0.0), (10.0, 0.0)]);
        assert_eq!(out, vec![5.0, 1.0]);
    }

    #[test]
    fn test_coincident_points_ignore_tight_threshold() {
        // Each query point sits exactly on a sample, distance 0 < 1
        let f = NearestValueFn::build(two_samples(), 1.0, -1.0, 1).unwrap();
        let out = f.evaluate(&[(0.0, 0.0), (10.0, 0.0)]);
        assert_eq!(out, vec![5.0, 1.0]);
    }

    #[test]
    fn test_background_beyond_threshold() {
        // (5, 0) is 5 units from both samples, threshold 1
        let f = NearestValueFn::build(two_samples(), 1.0, -1.0, 1).unwrap();
        let out = f.evaluate(&[(5.0, 0.0)]);
        assert_eq!(out, vec![-1.0]);
    }

    #[test]
    fn test_k2_weighted_mean() {
        let f = NearestValueFn::build(two_samples(), 100.0, -1.0, 2).unwrap();

        // Equidistant: plain average
        let mid = f.evaluate(&[(5.0, 0.0)])[0];
        assert_relative_eq!(mid, 3.0, epsilon = 1e-12);

        // 2 units from the first sample, 8 from the second:
        // weights 1/2, 1/8 -> (5/2 + 1/8) / (1/2 + 1/8) = 4.2
        let off = f.evaluate(&[(2.0, 0.0)])[0];
        assert_relative_eq!(off, 4.2, epsilon = 1e-12);
    }

    #[test]
    fn test_k2_rank0_gating_only() {
        // Nearest sample within threshold, second far beyond it; both
        // still contribute to the mean
        let f = NearestValueFn::build(two_samples(), 3.0, -1.0, 2).unwrap();
        let out = f.evaluate(&[(1.0, 0.0)])[0];
        // distances 1 and 9: (5/1 + 1/9) / (1 + 1/9)
        let expected = (5.0 + 1.0 / 9.0) / (1.0 + 1.0 / 9.0);
        assert_relative_eq!(out, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_raising_a_neighbour_value_raises_output() {
        let base = NearestValueFn::build(two_samples(), 100.0, -1.0, 2).unwrap();
        let bumped = NearestValueFn::build(
            vec![
                SamplePoint::new(0.0, 0.0, 5.0),
                SamplePoint::new(10.0, 0.0, 2.0),
            ],
            100.0,
            -1.0,
            2,
        )
        .unwrap();

        let q = [(3.0, 0.0)];
        assert!(bumped.evaluate(&q)[0] > base.evaluate(&q)[0]);
    }

    #[test]
    fn test_zero_distance_guard() {
        // Query exactly on a sample with k=2 must stay finite and be
        // dominated by the coincident sample
        let f = NearestValueFn::build(two_samples(), 100.0, -1.0, 2).unwrap();
        let out = f.evaluate(&[(0.0, 0.0)])[0];
        assert!(out.is_finite());
        assert_relative_eq!(out, 5.0, epsilon = 1e-6);
    }

    #[test]
    fn test_default_parameters_never_fall_back() {
        let f = NearestValueFn::from_points(two_samples()).unwrap();
        let out = f.evaluate(&[(1.0e6, 1.0e6)])[0];
        assert_eq!(out, 1.0);
    }

    #[test]
    fn test_single_sample_point() {
        let f = NearestValueFn::from_points(vec![SamplePoint::new(3.0, 4.0, 42.0)]).unwrap();
        assert_eq!(f.evaluate(&[(0.0, 0.0), (100.0, 100.0)]), vec![42.0, 42.0]);
    }

    #[test]
    fn test_local_frame_translation() {
        let f = NearestValueFn::build(two_samples(), 1.0, -1.0, 1).unwrap();
        let frame = DomainFrame::new(10.0, 0.0);
        // Local (0, 0) is absolute (10, 0), on top of the second sample
        let out = f.evaluate_local(&frame, &[(0.0, 0.0)]);
        assert_eq!(out, vec![1.0]);
    }

    #[test]
    fn test_empty_points_fails() {
        assert!(NearestValueFn::from_points(vec![]).is_err());
    }

    #[test]
    fn test_k_zero_fails() {
        assert!(NearestValueFn::build(two_samples(), 1.0, 0.0, 0).is_err());
    }
}
