//! # Hydroset Core
//!
//! Core types and I/O for the hydroset quantity-setting library.
//!
//! This crate provides:
//! - `Raster`: georeferenced grid of quantity values
//! - `GeoTransform`: affine transform between cells and coordinates
//! - `DomainFrame`: offset between domain-local and absolute coordinates
//! - `SamplePoint`: scattered `(x, y, value)` data
//! - Polygon helpers and readers for the text formats the assigner consumes

pub mod error;
pub mod frame;
pub mod io;
pub mod raster;
pub mod sample;
pub mod vector;

pub use error::{Error, Result};
pub use frame::DomainFrame;
pub use raster::{GeoTransform, Raster};
pub use sample::SamplePoint;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::frame::DomainFrame;
    pub use crate::raster::{GeoTransform, Raster};
    pub use crate::sample::SamplePoint;
}
