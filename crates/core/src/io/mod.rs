//! I/O for the spatial data formats the assigner consumes

mod ascii_grid;
mod geotiff;
mod polygon;
pub(crate) mod xyz;

pub use ascii_grid::read_ascii_grid;
pub use geotiff::read_geotiff;
pub use polygon::read_polygon;
pub use xyz::{read_xy_vertices, read_xyz_points};

use crate::error::Result;
use crate::raster::Raster;
use std::path::Path;

/// Read a raster file, dispatching on extension: `.asc` is parsed as an
/// ESRI ASCII grid, anything else as GeoTIFF.
pub fn read_raster<P: AsRef<Path>>(path: P) -> Result<Raster> {
    let path = path.as_ref();
    let is_ascii = path
        .extension()
        .map(|e| e.eq_ignore_ascii_case("asc"))
        .unwrap_or(false);

    if is_ascii {
        read_ascii_grid(path)
    } else {
        read_geotiff(path)
    }
}
