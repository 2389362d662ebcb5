//! Polygon vertex files
//!
//! Delimited text of `x,y` vertex rows (optional header), read into a
//! closed polygon.

use crate::error::Result;
use crate::io::xyz::read_xy_vertices;
use crate::vector::polygon_from_vertices;
use geo_types::Polygon;
use std::path::Path;

/// Read a polygon from a 2-column vertex file.
///
/// The ring is closed implicitly; a file whose last row repeats the first
/// is also accepted.
pub fn read_polygon<P: AsRef<Path>>(path: P) -> Result<Polygon<f64>> {
    let vertices = read_xy_vertices(path)?;
    polygon_from_vertices(&vertices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::inside_polygon;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_polygon() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "x,y").unwrap();
        writeln!(f, "0.0,0.0").unwrap();
        writeln!(f, "10.0,0.0").unwrap();
        writeln!(f, "10.0,10.0").unwrap();
        writeln!(f, "0.0,10.0").unwrap();

        let poly = read_polygon(f.path()).unwrap();
        assert_eq!(poly.exterior().0.len(), 5);
        assert_eq!(inside_polygon(&[(5.0, 5.0), (11.0, 5.0)], &poly), vec![0]);
    }

    #[test]
    fn test_read_polygon_too_few_vertices() {
        let mut f = NamedTempFile::new().unwrap();
        writeln!(f, "0.0,0.0").unwrap();
        writeln!(f, "1.0,1.0").unwrap();
        assert!(read_polygon(f.path()).is_err());
    }
}
