//! Error types for hydroset

use thiserror::Error;

/// Main error type for hydroset operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Malformed point file {path}: {reason}")]
    Format { path: String, reason: String },

    #[error("Cannot build a value source from {0}: no such file")]
    UnsupportedSource(String),

    #[error(
        "nan values generated by the region/source pair at index {pair_index}; \
         use NanPolicy::FallThrough to let later pairs set these points"
    )]
    NanValue { pair_index: usize },

    #[error(
        "{unassigned} point(s) were not inside any region, or evaluated to nan \
         over all sources (first few, absolute coordinates: {sample:?})"
    )]
    IncompleteCoverage {
        unassigned: usize,
        sample: Vec<(f64, f64)>,
    },

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Unsupported raster data type: {0}")]
    UnsupportedDataType(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for hydroset operations
pub type Result<T> = std::result::Result<T, Error>;
