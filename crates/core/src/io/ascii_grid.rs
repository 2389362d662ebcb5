//! ESRI ASCII grid reader
//!
//! The plain-text raster format commonly exchanged by hydrodynamic tooling:
//! a 6-line header (`ncols`, `nrows`, `xllcorner`, `yllcorner`, `cellsize`,
//! optional `NODATA_value`) followed by whitespace-separated cell values,
//! row 0 at the north edge.

use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster};
use std::path::Path;

fn header_err(path: &Path, reason: impl Into<String>) -> Error {
    Error::Format {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

/// Read an ESRI ASCII grid into a [`Raster`].
pub fn read_ascii_grid<P: AsRef<Path>>(path: P) -> Result<Raster> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let mut lines = content.lines();

    let mut ncols: Option<usize> = None;
    let mut nrows: Option<usize> = None;
    let mut xll: Option<f64> = None;
    let mut yll: Option<f64> = None;
    let mut cell_size: Option<f64> = None;
    let mut nodata: Option<f64> = None;
    let mut values: Vec<f64> = Vec::new();

    for line in lines.by_ref() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let key = tokens.next().unwrap_or_default();
        let rest = tokens.next();

        // Header entries are `key value`; the first line that does not
        // start with a known key begins the data block.
        match (key.to_ascii_lowercase().as_str(), rest) {
            ("ncols", Some(v)) => {
                ncols = Some(v.parse().map_err(|_| header_err(path, "bad ncols"))?)
            }
            ("nrows", Some(v)) => {
                nrows = Some(v.parse().map_err(|_| header_err(path, "bad nrows"))?)
            }
            ("xllcorner", Some(v)) => {
                xll = Some(v.parse().map_err(|_| header_err(path, "bad xllcorner"))?)
            }
            ("yllcorner", Some(v)) => {
                yll = Some(v.parse().map_err(|_| header_err(path, "bad yllcorner"))?)
            }
            ("cellsize", Some(v)) => {
                cell_size = Some(v.parse().map_err(|_| header_err(path, "bad cellsize"))?)
            }
            ("nodata_value", Some(v)) => {
                nodata = Some(v.parse().map_err(|_| header_err(path, "bad NODATA_value"))?)
            }
            _ => {
                parse_data_line(path, line, &mut values)?;
                break;
            }
        }
    }

    for line in lines {
        let line = line.trim();
        if !line.is_empty() {
            parse_data_line(path, line, &mut values)?;
        }
    }

    let (Some(ncols), Some(nrows), Some(xll), Some(yll), Some(cell_size)) =
        (ncols, nrows, xll, yll, cell_size)
    else {
        return Err(header_err(
            path,
            "header must define ncols, nrows, xllcorner, yllcorner and cellsize",
        ));
    };

    if values.len() != nrows * ncols {
        return Err(header_err(
            path,
            format!(
                "expected {} cell values ({}x{}), found {}",
                nrows * ncols,
                nrows,
                ncols,
                values.len()
            ),
        ));
    }

    let mut raster = Raster::from_vec(values, nrows, ncols)?;
    raster.set_transform(GeoTransform::from_lower_left(xll, yll, cell_size, nrows));
    raster.set_nodata(nodata);

    Ok(raster)
}

fn parse_data_line(path: &Path, line: &str, values: &mut Vec<f64>) -> Result<()> {
    for token in line.split_whitespace() {
        let v: f64 = token
            .parse()
            .map_err(|_| header_err(path, format!("bad cell value '{token}'")))?;
        values.push(v);
    }
    Ok(())
}
