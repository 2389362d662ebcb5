//! Affine georeferencing for raster grids

use geo_types::{LineString, Polygon};
use serde::{Deserialize, Serialize};

/// North-up affine transform between cell indices and absolute coordinates.
///
/// ```text
/// x = origin_x + (col + 0.5) * cell_width
/// y = origin_y + (row + 0.5) * cell_height
/// ```
///
/// `(origin_x, origin_y)` is the upper-left corner of the grid and
/// `cell_height` is negative for the usual top-to-bottom row order.
/// Rotated rasters are not supported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Cell size in the X direction
    pub cell_width: f64,
    /// Cell size in the Y direction (negative for north-up grids)
    pub cell_height: f64,
}

impl GeoTransform {
    pub fn new(origin_x: f64, origin_y: f64, cell_width: f64, cell_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            cell_width,
            cell_height,
        }
    }

    /// Build from a lower-left corner and a square cell size, as used by
    /// ESRI ASCII grid headers (`xllcorner`, `yllcorner`, `cellsize`).
    pub fn from_lower_left(xll: f64, yll: f64, cell_size: f64, rows: usize) -> Self {
        Self {
            origin_x: xll,
            origin_y: yll + rows as f64 * cell_size,
            cell_width: cell_size,
            cell_height: -cell_size,
        }
    }

    /// Build from GDAL-style coefficients
    /// `[origin_x, cell_width, 0, origin_y, 0, cell_height]`.
    /// The rotation terms are ignored.
    pub fn from_gdal(coeffs: [f64; 6]) -> Self {
        Self {
            origin_x: coeffs[0],
            cell_width: coeffs[1],
            origin_y: coeffs[3],
            cell_height: coeffs[5],
        }
    }

    /// Coordinates of the centre of cell `(row, col)`
    #[inline]
    pub fn cell_to_geo(&self, row: usize, col: usize) -> (f64, f64) {
        (
            self.origin_x + (col as f64 + 0.5) * self.cell_width,
            self.origin_y + (row as f64 + 0.5) * self.cell_height,
        )
    }

    /// Fractional cell indices `(row, col)` of an absolute point.
    ///
    /// Use `.floor()` on each component to get the containing cell;
    /// values outside `[0, rows) x [0, cols)` mean the point lies off
    /// the grid.
    #[inline]
    pub fn geo_to_cell(&self, x: f64, y: f64) -> (f64, f64) {
        (
            (y - self.origin_y) / self.cell_height,
            (x - self.origin_x) / self.cell_width,
        )
    }

    /// Bounding box `(min_x, min_y, max_x, max_y)` of a grid with the
    /// given dimensions
    pub fn bounds(&self, rows: usize, cols: usize) -> (f64, f64, f64, f64) {
        let x0 = self.origin_x;
        let x1 = self.origin_x + cols as f64 * self.cell_width;
        let y0 = self.origin_y;
        let y1 = self.origin_y + rows as f64 * self.cell_height;

        (x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }

    /// Bounding box of the grid as a closed polygon, counter-clockwise
    /// from the lower-left corner
    pub fn extent_polygon(&self, rows: usize, cols: usize) -> Polygon<f64> {
        let (min_x, min_y, max_x, max_y) = self.bounds(rows, cols);
        Polygon::new(
            LineString::from(vec![
                (min_x, min_y),
                (max_x, min_y),
                (max_x, max_y),
                (min_x, max_y),
                (min_x, min_y),
            ]),
            vec![],
        )
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cell_geo_roundtrip() {
        let gt = GeoTransform::new(100.0, 200.0, 10.0, -10.0);

        let (x, y) = gt.cell_to_geo(10, 5);
        let (row, col) = gt.geo_to_cell(x, y);

        assert_relative_eq!(row, 10.5, epsilon = 1e-10);
        assert_relative_eq!(col, 5.5, epsilon = 1e-10);
    }

    #[test]
    fn test_from_lower_left() {
        // 4 rows of 2x2 cells starting at (10, 20)
        let gt = GeoTransform::from_lower_left(10.0, 20.0, 2.0, 4);

        assert_relative_eq!(gt.origin_y, 28.0, epsilon = 1e-10);
        // Centre of the top-left cell
        let (x, y) = gt.cell_to_geo(0, 0);
        assert_relative_eq!(x, 11.0, epsilon = 1e-10);
        assert_relative_eq!(y, 27.0, epsilon = 1e-10);
    }

    #[test]
    fn test_bounds() {
        let gt = GeoTransform::new(0.0, 100.0, 1.0, -1.0);
        let (min_x, min_y, max_x, max_y) = gt.bounds(100, 50);

        assert_relative_eq!(min_x, 0.0, epsilon = 1e-10);
        assert_relative_eq!(min_y, 0.0, epsilon = 1e-10);
        assert_relative_eq!(max_x, 50.0, epsilon = 1e-10);
        assert_relative_eq!(max_y, 100.0, epsilon = 1e-10);
    }

    #[test]
    fn test_extent_polygon_is_closed() {
        let gt = GeoTransform::new(5.0, 15.0, 1.0, -1.0);
        let poly = gt.extent_polygon(10, 10);
        let ring = poly.exterior();
        assert_eq!(ring.0.len(), 5);
        assert_eq!(ring.0.first(), ring.0.last());
    }
}
