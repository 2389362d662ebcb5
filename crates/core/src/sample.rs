//! Scattered sample points

use serde::{Deserialize, Serialize};

/// A sample point with absolute x, y coordinates and a quantity value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: f64,
    pub y: f64,
    pub value: f64,
}

impl SamplePoint {
    pub fn new(x: f64, y: f64, value: f64) -> Self {
        Self { x, y, value }
    }

    /// Squared Euclidean distance to `(other_x, other_y)`
    #[inline]
    pub fn dist_sq(&self, other_x: f64, other_y: f64) -> f64 {
        let dx = self.x - other_x;
        let dy = self.y - other_y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to `(other_x, other_y)`
    #[inline]
    pub fn dist(&self, other_x: f64, other_y: f64) -> f64 {
        self.dist_sq(other_x, other_y).sqrt()
    }
}

impl From<(f64, f64, f64)> for SamplePoint {
    fn from((x, y, value): (f64, f64, f64)) -> Self {
        Self { x, y, value }
    }
}

impl From<[f64; 3]> for SamplePoint {
    fn from([x, y, value]: [f64; 3]) -> Self {
        Self { x, y, value }
    }
}
