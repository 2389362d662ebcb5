//! Value sources
//!
//! A value source describes where quantity values come from; resolving one
//! yields a uniform point-valued function. Sources are tagged variants
//! fixed at configuration time, so resolution (file parsing, index
//! construction) happens once and the resolved function is reused for
//! every batch.

use crate::nearest::NearestValueFn;
use hydroset_core::io::{read_raster, read_xyz_points};
use hydroset_core::{DomainFrame, Error, Raster, Result, SamplePoint};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A caller-supplied point function. Receives domain-local coordinates.
pub type PointFn = Arc<dyn Fn(&[(f64, f64)]) -> Vec<f64> + Send + Sync>;

/// Where the values for one region come from.
#[derive(Clone)]
pub enum ValueSource {
    /// The same value at every point
    Constant(f64),
    /// An arbitrary function of domain-local coordinates
    Function(PointFn),
    /// A 3-column `x,y,value` text file, nearest-neighbour interpolated
    PointFile(PathBuf),
    /// A raster file (`.asc` or GeoTIFF), sampled per point
    RasterFile(PathBuf),
    /// In-memory sample points, nearest-neighbour interpolated
    Points(Vec<SamplePoint>),
}

impl ValueSource {
    /// Wrap a closure as a source.
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[(f64, f64)]) -> Vec<f64> + Send + Sync + 'static,
    {
        Self::Function(Arc::new(f))
    }

    /// Classify an existing file by extension: `.txt`/`.csv` are point
    /// files, anything else a raster. Fails with `UnsupportedSource` if
    /// the path does not exist.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::UnsupportedSource(path.display().to_string()));
        }

        let is_point_file = path
            .extension()
            .map(|e| e.eq_ignore_ascii_case("txt") || e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        Ok(if is_point_file {
            Self::PointFile(path.to_path_buf())
        } else {
            Self::RasterFile(path.to_path_buf())
        })
    }

    pub fn is_raster_file(&self) -> bool {
        matches!(self, Self::RasterFile(_))
    }

    /// Resolve into an evaluatable function, reading and indexing any
    /// backing file. Point data uses the nearest-neighbour defaults
    /// (single neighbour, never falls back).
    pub fn resolve(&self) -> Result<ResolvedSource> {
        match self {
            Self::Constant(value) => Ok(ResolvedSource::Constant(*value)),
            Self::Function(f) => Ok(ResolvedSource::Function(f.clone())),
            Self::PointFile(path) => {
                let points = read_xyz_points(path)?;
                Ok(ResolvedSource::Nearest(NearestValueFn::from_points(
                    points,
                )?))
            }
            Self::RasterFile(path) => Ok(ResolvedSource::Raster(read_raster(path)?)),
            Self::Points(points) => Ok(ResolvedSource::Nearest(NearestValueFn::from_points(
                points.clone(),
            )?)),
        }
    }
}

impl fmt::Debug for ValueSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
            Self::PointFile(p) => f.debug_tuple("PointFile").field(p).finish(),
            Self::RasterFile(p) => f.debug_tuple("RasterFile").field(p).finish(),
            Self::Points(pts) => f.debug_tuple("Points").field(&pts.len()).finish(),
        }
    }
}

impl From<f64> for ValueSource {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl From<Vec<SamplePoint>> for ValueSource {
    fn from(points: Vec<SamplePoint>) -> Self {
        Self::Points(points)
    }
}

/// A resolved, reusable point-valued function.
///
/// Query points are domain-local; sources backed by absolute-coordinate
/// data translate by the frame's origin before lookup. Caller functions
/// see the untranslated local coordinates, as they would when attached to
/// the host model directly.
pub enum ResolvedSource {
    Constant(f64),
    Function(PointFn),
    Nearest(NearestValueFn),
    Raster(Raster),
}

impl ResolvedSource {
    /// Evaluate at a batch of domain-local points.
    pub fn evaluate(&self, frame: &DomainFrame, points: &[(f64, f64)]) -> Vec<f64> {
        match self {
            Self::Constant(value) => vec![*value; points.len()],
            Self::Function(f) => f(points),
            Self::Nearest(nn) => nn.evaluate_local(frame, points),
            Self::Raster(raster) => raster.sample(&frame.batch_to_absolute(points)),
        }
    }

    /// The backing raster, when there is one.
    pub fn raster(&self) -> Option<&Raster> {
        match self {
            Self::Raster(r) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Debug for ResolvedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(v) => f.debug_tuple("Constant").field(v).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
            Self::Nearest(_) => f.write_str("Nearest(..)"),
            Self::Raster(r) => f
                .debug_struct("Raster")
                .field("rows", &r.rows())
                .field("cols", &r.cols())
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn frame() -> DomainFrame {
        DomainFrame::default()
    }

    #[test]
    fn test_constant() {
        let resolved = ValueSource::Constant(3.5).resolve().unwrap();
        assert_eq!(
            resolved.evaluate(&frame(), &[(0.0, 0.0), (9.0, 9.0)]),
            vec![3.5, 3.5]
        );
    }

    #[test]
    fn test_function_sees_local_coordinates() {
        let source = ValueSource::function(|pts| pts.iter().map(|&(x, y)| x + y).collect());
        let resolved = source.resolve().unwrap();

        let shifted = DomainFrame::new(1000.0, 1000.0);
        assert_eq!(resolved.evaluate(&shifted, &[(1.0, 2.0)]), vec![3.0]);
    }

    #[test]
    fn test_points_use_nearest_neighbour() {
        let source = ValueSource::Points(vec![
            SamplePoint::new(0.0, 0.0, 5.0),
            SamplePoint::new(10.0, 0.0, 1.0),
        ]);
        let resolved = source.resolve().unwrap();
        assert_eq!(
            resolved.evaluate(&frame(), &[(1.0, 0.0), (9.0, 0.0)]),
            vec![5.0, 1.0]
        );
    }

    #[test]
    fn test_points_translate_by_frame() {
        let source = ValueSource::Points(vec![
            SamplePoint::new(100.0, 0.0, 5.0),
            SamplePoint::new(110.0, 0.0, 1.0),
        ]);
        let resolved = source.resolve().unwrap();

        let shifted = DomainFrame::new(100.0, 0.0);
        assert_eq!(
            resolved.evaluate(&shifted, &[(1.0, 0.0), (9.0, 0.0)]),
            vec![5.0, 1.0]
        );
    }

    #[test]
    fn test_point_file() {
        let mut f = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(f, "x,y,value").unwrap();
        writeln!(f, "0.0,0.0,5.0").unwrap();
        writeln!(f, "10.0,0.0,1.0").unwrap();

        let source = ValueSource::from_path(f.path()).unwrap();
        assert!(matches!(source, ValueSource::PointFile(_)));

        let resolved = source.resolve().unwrap();
        assert_eq!(resolved.evaluate(&frame(), &[(2.0, 0.0)]), vec![5.0]);
    }

    #[test]
    fn test_point_file_wrong_columns() {
        let mut f = NamedTempFile::with_suffix(".csv").unwrap();
        writeln!(f, "0.0,0.0").unwrap();
        writeln!(f, "10.0,0.0").unwrap();

        let source = ValueSource::from_path(f.path()).unwrap();
        assert!(matches!(source.resolve(), Err(Error::Format { .. })));
    }

    #[test]
    fn test_raster_file_samples_and_nan_outside() {
        let mut f = NamedTempFile::with_suffix(".asc").unwrap();
        write!(
            f,
            "ncols 2\nnrows 2\nxllcorner 0\nyllcorner 0\ncellsize 1\n1 2\n3 4\n"
        )
        .unwrap();

        let source = ValueSource::from_path(f.path()).unwrap();
        assert!(source.is_raster_file());

        let resolved = source.resolve().unwrap();
        let out = resolved.evaluate(&frame(), &[(0.5, 0.5), (1.5, 1.5), (5.0, 5.0)]);
        assert_eq!(out[0], 3.0);
        assert_eq!(out[1], 2.0);
        assert!(out[2].is_nan());
    }

    #[test]
    fn test_missing_path_unsupported() {
        assert!(matches!(
            ValueSource::from_path("/no/such/source.csv"),
            Err(Error::UnsupportedSource(_))
        ));
    }
}
