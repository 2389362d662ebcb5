//! Georeferenced raster grid

use crate::error::{Error, Result};
use crate::raster::GeoTransform;
use geo_types::Polygon;
use ndarray::Array2;

/// A georeferenced grid of `f64` cell values.
///
/// Values are stored row-major with row 0 at the top (north) edge, matching
/// the negative `cell_height` convention of [`GeoTransform`]. Cells equal to
/// the no-data value read back as NaN when sampled.
#[derive(Debug, Clone)]
pub struct Raster {
    data: Array2<f64>,
    transform: GeoTransform,
    nodata: Option<f64>,
}

impl Raster {
    /// Create a raster from a flat row-major vector
    pub fn from_vec(data: Vec<f64>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self {
            data: array,
            transform: GeoTransform::default(),
            nodata: None,
        })
    }

    /// Create a raster filled with a single value
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            data: Array2::from_elem((rows, cols), value),
            transform: GeoTransform::default(),
            nodata: None,
        }
    }

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Get the value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Set the value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let (rows, cols) = (self.rows(), self.cols());
        match self.data.get_mut((row, col)) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(Error::IndexOutOfBounds {
                row,
                col,
                rows,
                cols,
            }),
        }
    }

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: GeoTransform) {
        self.transform = transform;
    }

    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    pub fn set_nodata(&mut self, nodata: Option<f64>) {
        self.nodata = nodata;
    }

    /// Bounding box `(min_x, min_y, max_x, max_y)` in absolute coordinates
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.transform.bounds(self.rows(), self.cols())
    }

    /// Bounding box as a closed polygon in absolute coordinates
    pub fn extent_polygon(&self) -> Polygon<f64> {
        self.transform.extent_polygon(self.rows(), self.cols())
    }

    /// Sample the cell containing the absolute point `(x, y)`.
    ///
    /// Returns NaN if the point falls outside the grid or hits a no-data
    /// cell.
    pub fn sample_at(&self, x: f64, y: f64) -> f64 {
        let (frow, fcol) = self.transform.geo_to_cell(x, y);
        if frow < 0.0 || fcol < 0.0 {
            return f64::NAN;
        }

        let (row, col) = (frow.floor() as usize, fcol.floor() as usize);
        if row >= self.rows() || col >= self.cols() {
            return f64::NAN;
        }

        let value = self.data[(row, col)];
        match self.nodata {
            Some(nd) if value == nd => f64::NAN,
            _ if value.is_nan() => f64::NAN,
            _ => value,
        }
    }

    /// Sample a batch of absolute points, one value per point
    pub fn sample(&self, points: &[(f64, f64)]) -> Vec<f64> {
        points.iter().map(|&(x, y)| self.sample_at(x, y)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2x3 grid over x in [0,3], y in [0,2], cell size 1
    fn sample_raster() -> Raster {
        let mut r = Raster::from_vec(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3).unwrap();
        r.set_transform(GeoTransform::from_lower_left(0.0, 0.0, 1.0, 2));
        r
    }

    #[test]
    fn test_from_vec_bad_shape() {
        assert!(Raster::from_vec(vec![1.0, 2.0, 3.0], 2, 2).is_err());
    }

    #[test]
    fn test_get_set() {
        let mut r = Raster::filled(3, 3, 0.0);
        r.set(1, 2, 7.5).unwrap();
        assert_eq!(r.get(1, 2).unwrap(), 7.5);
        assert!(r.get(3, 0).is_err());
    }

    #[test]
    fn test_sample_at_cell_centres() {
        let r = sample_raster();
        // Top row of the grid is the higher y band
        assert_eq!(r.sample_at(0.5, 1.5), 1.0);
        assert_eq!(r.sample_at(2.5, 1.5), 3.0);
        assert_eq!(r.sample_at(0.5, 0.5), 4.0);
        assert_eq!(r.sample_at(2.5, 0.5), 6.0);
    }

    #[test]
    fn test_sample_outside_is_nan() {
        let r = sample_raster();
        assert!(r.sample_at(-0.5, 0.5).is_nan());
        assert!(r.sample_at(0.5, 2.5).is_nan());
        assert!(r.sample_at(3.5, 0.5).is_nan());
    }

    #[test]
    fn test_sample_nodata_is_nan() {
        let mut r = sample_raster();
        r.set_nodata(Some(5.0));
        assert!(r.sample_at(1.5, 0.5).is_nan());
        assert_eq!(r.sample_at(0.5, 0.5), 4.0);
    }

    #[test]
    fn test_bounds_and_extent() {
        let r = sample_raster();
        let (min_x, min_y, max_x, max_y) = r.bounds();
        assert_eq!((min_x, min_y, max_x, max_y), (0.0, 0.0, 3.0, 2.0));
        assert_eq!(r.extent_polygon().exterior().0.len(), 5);
    }
}
