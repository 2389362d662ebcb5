//! Polygon helpers
//!
//! Regions are simple polygons given as ordered vertex lists. The ring is
//! closed implicitly; membership testing delegates to `geo`.

use crate::error::{Error, Result};
use geo::Intersects;
use geo_types::{Coord, LineString, Point, Polygon};

/// Build a polygon from an ordered vertex list, closing the ring if the
/// last vertex does not repeat the first.
///
/// Fails with `InvalidInput` for fewer than 3 distinct vertices.
pub fn polygon_from_vertices(vertices: &[(f64, f64)]) -> Result<Polygon<f64>> {
    let mut ring: Vec<Coord<f64>> = vertices
        .iter()
        .map(|&(x, y)| Coord { x, y })
        .collect();

    if ring.len() > 1 && ring.first() == ring.last() {
        ring.pop();
    }
    if ring.len() < 3 {
        return Err(Error::InvalidInput(format!(
            "polygon needs at least 3 vertices, got {}",
            ring.len()
        )));
    }
    ring.push(ring[0]);

    Ok(Polygon::new(LineString::new(ring), vec![]))
}

/// Indices of the points that fall inside the polygon.
///
/// Points exactly on the boundary count as inside. Mesh vertices routinely
/// sit right on a region border (e.g. a mesh aligned with a raster's
/// extent rectangle) and must not slip between regions.
pub fn inside_polygon(points: &[(f64, f64)], polygon: &Polygon<f64>) -> Vec<usize> {
    points
        .iter()
        .enumerate()
        .filter(|&(_, &(x, y))| polygon.intersects(&Point::new(x, y)))
        .map(|(i, _)| i)
        .collect()
}
