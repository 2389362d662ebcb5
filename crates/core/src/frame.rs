//! Domain-local coordinate frame
//!
//! Hydrodynamic domains store mesh coordinates relative to a lower-left
//! origin to keep the numbers small. External spatial data (point files,
//! polygons, rasters) live in absolute coordinates, so every source lookup
//! translates query points by the origin offset first.

use serde::{Deserialize, Serialize};

/// Offset between domain-local and absolute coordinates.
///
/// A point `(x, y)` in the domain frame sits at
/// `(x + x_origin, y + y_origin)` in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DomainFrame {
    /// X coordinate of the domain's lower-left corner
    pub x_origin: f64,
    /// Y coordinate of the domain's lower-left corner
    pub y_origin: f64,
}

impl DomainFrame {
    pub fn new(x_origin: f64, y_origin: f64) -> Self {
        Self { x_origin, y_origin }
    }

    /// Translate a domain-local point into absolute coordinates
    #[inline]
    pub fn to_absolute(&self, x: f64, y: f64) -> (f64, f64) {
        (x + self.x_origin, y + self.y_origin)
    }

    /// Translate an absolute point into domain-local coordinates
    #[inline]
    pub fn to_local(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.x_origin, y - self.y_origin)
    }

    /// Translate a batch of domain-local points into absolute coordinates
    pub fn batch_to_absolute(&self, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
        points
            .iter()
            .map(|&(x, y)| self.to_absolute(x, y))
            .collect()
    }
}
