//! # Hydroset Assign
//!
//! Composite spatial quantity assignment for hydrodynamic model domains.
//!
//! Hydrodynamic solvers need initial fields (elevation, friction, stage)
//! set over every mesh vertex or centroid from a patchwork of data:
//! surveyed channel cross-sections here, a LiDAR raster there, a constant
//! everywhere else. This crate composes those sources:
//!
//! - [`SpatialIndex`]: k-nearest-neighbour queries over scattered samples
//! - [`NearestValueFn`]: inverse-distance-weighted point interpolation
//!   with a distance threshold and background value
//! - [`ValueSource`]: constants, closures, point files, rasters and
//!   in-memory samples behind one interface
//! - [`CompositeAssigner`]: prioritized region-by-region assignment with
//!   clipping, nan policies and full-coverage checking

pub mod composite;
pub mod index;
pub mod nearest;
pub mod source;

pub use composite::{
    AssignerOptions, AssignmentPair, CompositeAssigner, NanPolicy, Region,
};
pub use index::{Neighbour, SpatialIndex};
pub use nearest::{NearestValueFn, EFFECTIVELY_INFINITE};
pub use source::{ResolvedSource, ValueSource};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::composite::{
        AssignerOptions, AssignmentPair, CompositeAssigner, NanPolicy, Region,
    };
    pub use crate::index::SpatialIndex;
    pub use crate::nearest::NearestValueFn;
    pub use crate::source::ValueSource;
    pub use hydroset_core::prelude::*;
}
