//! Delimited x,y,value point files
//!
//! Comma-separated text with exactly three columns and an optional single
//! header row. A row counts as a header iff it fails to parse as three
//! floats, and only the first row may do so.

use crate::error::{Error, Result};
use crate::sample::SamplePoint;
use std::path::Path;

fn format_err(path: &Path, reason: impl Into<String>) -> Error {
    Error::Format {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

fn parse_row(line: &str, n_columns: usize) -> Option<Vec<f64>> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != n_columns {
        return None;
    }
    fields.iter().map(|f| f.parse::<f64>().ok()).collect()
}

fn read_rows(path: &Path, n_columns: usize) -> Result<Vec<Vec<f64>>> {
    let content = std::fs::read_to_string(path)?;
    let mut rows = Vec::new();
    let mut first_row = true;

    for (line_no, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let is_first = std::mem::take(&mut first_row);

        match parse_row(line, n_columns) {
            Some(row) => rows.push(row),
            None if is_first => {
                // Optional header row
                continue;
            }
            None => {
                return Err(format_err(
                    path,
                    format!(
                        "line {} is not {} comma-separated numbers",
                        line_no + 1,
                        n_columns
                    ),
                ));
            }
        }
    }

    if rows.is_empty() {
        return Err(format_err(path, "no data rows"));
    }

    Ok(rows)
}

/// Read a 3-column `x,y,value` point file.
pub fn read_xyz_points<P: AsRef<Path>>(path: P) -> Result<Vec<SamplePoint>> {
    let path = path.as_ref();
    let rows = read_rows(path, 3)?;
    Ok(rows
        .into_iter()
        .map(|row| SamplePoint::new(row[0], row[1], row[2]))
        .collect())
}

/// Read a 2-column `x,y` vertex file.
pub fn read_xy_vertices<P: AsRef<Path>>(path: P) -> Result<Vec<(f64, f64)>> {
    let path = path.as_ref();
    let rows = read_rows(path, 2)?;
    Ok(rows.into_iter().map(|row| (row[0], row[1])).collect())
}
