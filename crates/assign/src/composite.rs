//! Composite region assigner
//!
//! Applies an ordered list of (region, value source) pairs to a batch of
//! query points. The first pair covering a point wins; later pairs only
//! see points that are still unassigned. A run either assigns every point
//! a finite value or fails.

use crate::source::{ResolvedSource, ValueSource};
use hydroset_core::io::read_polygon;
use hydroset_core::vector::{inside_polygon, polygon_from_vertices};
use hydroset_core::{DomainFrame, Error, Result};
use geo_types::Polygon;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// How many unassigned coordinates to report on coverage failure.
const COVERAGE_SAMPLE_LEN: usize = 5;

/// Where a value source applies. Polygon coordinates are absolute.
#[derive(Debug, Clone)]
pub enum Region {
    /// Inside a polygon
    Polygon(Polygon<f64>),
    /// Inside a polygon read from a 2-column vertex file
    PolygonFile(PathBuf),
    /// Every point still unassigned. Only valid as the last pair whose
    /// region is not `Skip`.
    All,
    /// The bounding rectangle of the pair's raster source
    Extent,
    /// Matches nothing; the pair is ignored
    Skip,
}

impl Region {
    /// Polygon region from an ordered vertex list (closed implicitly).
    pub fn polygon(vertices: &[(f64, f64)]) -> Result<Self> {
        Ok(Self::Polygon(polygon_from_vertices(vertices)?))
    }
}

/// One (region, source) priority entry.
#[derive(Debug, Clone)]
pub struct AssignmentPair {
    pub region: Region,
    pub source: ValueSource,
}

impl AssignmentPair {
    pub fn new(region: Region, source: impl Into<ValueSource>) -> Self {
        Self {
            region,
            source: source.into(),
        }
    }
}

/// What to do when a source produces nan at candidate points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NanPolicy {
    /// Abort the run, reporting the offending pair
    #[default]
    Fail,
    /// Leave those points unassigned so later pairs can set them
    FallThrough,
}

/// Per-run options.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignerOptions {
    /// One `(min, max)` per pair; values newly assigned by pair `i` are
    /// clamped into `clip_range[i]`.
    pub clip_range: Option<Vec<(f64, f64)>>,
    pub nan_policy: NanPolicy,
}

enum PreparedRegion {
    Polygon(Polygon<f64>),
    All,
    Skip,
}

struct PreparedPair {
    region: PreparedRegion,
    source: ResolvedSource,
}

/// Assigns every query point exactly one value from a prioritized list of
/// (region, source) pairs.
///
/// Construction validates the configuration and resolves every source
/// (file parsing, spatial index construction) once; [`assign`] can then be
/// called for any number of point batches.
///
/// [`assign`]: CompositeAssigner::assign
pub struct CompositeAssigner {
    pairs: Vec<PreparedPair>,
    options: AssignerOptions,
    frame: DomainFrame,
}

impl CompositeAssigner {
    pub fn new(
        pairs: Vec<AssignmentPair>,
        options: AssignerOptions,
        frame: DomainFrame,
    ) -> Result<Self> {
        if pairs.is_empty() {
            return Err(Error::Config(
                "must have at least one region/source pair".into(),
            ));
        }

        if let Some(clip_range) = &options.clip_range {
            if clip_range.len() != pairs.len() {
                return Err(Error::Config(format!(
                    "clip_range has {} entries for {} pairs",
                    clip_range.len(),
                    pairs.len()
                )));
            }
            for (i, (lo, hi)) in clip_range.iter().enumerate() {
                if lo > hi {
                    return Err(Error::Config(format!(
                        "clip_range[{i}] minimum {lo} exceeds maximum {hi}"
                    )));
                }
            }
        }

        // `All` consumes every remaining point, so any later pair that is
        // not `Skip` can never apply
        if let Some(all_at) = pairs
            .iter()
            .position(|p| matches!(p.region, Region::All))
        {
            if pairs[all_at + 1..]
                .iter()
                .any(|p| !matches!(p.region, Region::Skip))
            {
                return Err(Error::Config(
                    "the All region is only allowed as the last active pair".into(),
                ));
            }
        }

        let mut prepared = Vec::with_capacity(pairs.len());
        for (i, pair) in pairs.into_iter().enumerate() {
            let source = pair.source.resolve()?;
            let region = match pair.region {
                Region::Skip => PreparedRegion::Skip,
                Region::All => PreparedRegion::All,
                Region::Polygon(poly) => PreparedRegion::Polygon(poly),
                Region::PolygonFile(path) => PreparedRegion::Polygon(read_polygon(path)?),
                Region::Extent => {
                    if !pair.source.is_raster_file() {
                        return Err(Error::Config(format!(
                            "pair {i}: the Extent region requires a raster file source"
                        )));
                    }
                    // resolve() loaded the raster above
                    let raster = source.raster().ok_or_else(|| {
                        Error::Config(format!("pair {i}: raster source failed to resolve"))
                    })?;
                    PreparedRegion::Polygon(raster.extent_polygon())
                }
            };
            prepared.push(PreparedPair { region, source });
        }

        Ok(Self {
            pairs: prepared,
            options,
            frame,
        })
    }

    /// Assign a value to every domain-local query point.
    ///
    /// Fails with `NanValue` under [`NanPolicy::Fail`] when a source
    /// produces nan, and with `IncompleteCoverage` when any point is left
    /// unassigned after all pairs have run.
    pub fn assign(&self, points: &[(f64, f64)]) -> Result<Vec<f64>> {
        let n = points.len();
        let mut assigned = vec![false; n];
        let mut values = vec![0.0; n];

        // Region polygons live in absolute coordinates
        let abs_points = self.frame.batch_to_absolute(points);

        for (pair_index, pair) in self.pairs.iter().enumerate() {
            let mut candidates: Vec<usize> = match &pair.region {
                PreparedRegion::Skip => continue,
                PreparedRegion::All => (0..n).filter(|&j| !assigned[j]).collect(),
                PreparedRegion::Polygon(poly) => {
                    let unset: Vec<usize> = (0..n).filter(|&j| !assigned[j]).collect();
                    let unset_abs: Vec<(f64, f64)> =
                        unset.iter().map(|&j| abs_points[j]).collect();
                    inside_polygon(&unset_abs, poly)
                        .into_iter()
                        .map(|k| unset[k])
                        .collect()
                }
            };

            if candidates.is_empty() {
                continue;
            }

            let candidate_points: Vec<(f64, f64)> =
                candidates.iter().map(|&j| points[j]).collect();
            let mut raw = pair.source.evaluate(&self.frame, &candidate_points);

            if raw.len() != candidate_points.len() {
                return Err(Error::InvalidInput(format!(
                    "pair {pair_index}: source returned {} values for {} points",
                    raw.len(),
                    candidate_points.len()
                )));
            }

            if raw.iter().any(|v| v.is_nan()) {
                match self.options.nan_policy {
                    NanPolicy::Fail => return Err(Error::NanValue { pair_index }),
                    NanPolicy::FallThrough => {
                        warn!(
                            pair_index,
                            "nan values produced; leaving those points for later pairs"
                        );
                        let kept: Vec<(usize, f64)> = candidates
                            .iter()
                            .zip(&raw)
                            .filter(|(_, v)| !v.is_nan())
                            .map(|(&j, &v)| (j, v))
                            .collect();
                        if kept.is_empty() {
                            // Mirrors the long-standing upstream behaviour:
                            // an all-nan pair is skipped, not an error
                            warn!(pair_index, "all candidate values were nan");
                            continue;
                        }
                        candidates = kept.iter().map(|&(j, _)| j).collect();
                        raw = kept.iter().map(|&(_, v)| v).collect();
                    }
                }
            }

            let clip = self
                .options
                .clip_range
                .as_ref()
                .map(|ranges| ranges[pair_index]);

            for (&j, &value) in candidates.iter().zip(&raw) {
                values[j] = match clip {
                    Some((lo, hi)) => value.clamp(lo, hi),
                    None => value,
                };
                assigned[j] = true;
            }
        }

        let unassigned: Vec<usize> = (0..n).filter(|&j| !assigned[j]).collect();
        if !unassigned.is_empty() {
            let sample = unassigned
                .iter()
                .take(COVERAGE_SAMPLE_LEN)
                .map(|&j| abs_points[j])
                .collect();
            return Err(Error::IncompleteCoverage {
                unassigned: unassigned.len(),
                sample,
            });
        }

        Ok(values)
    }

    /// Convenience builder: nearest-neighbour point patches layered over a
    /// background raster.
    ///
    /// Each patch is a (polygon vertices, sample points) pair applied in
    /// order; everything left over is sampled from the raster.
    pub fn point_patches_over_raster(
        patches: Vec<(Vec<(f64, f64)>, Vec<hydroset_core::SamplePoint>)>,
        raster_file: impl Into<PathBuf>,
        frame: DomainFrame,
    ) -> Result<Self> {
        let mut pairs = Vec::with_capacity(patches.len() + 1);
        for (vertices, samples) in patches {
            pairs.push(AssignmentPair::new(
                Region::polygon(&vertices)?,
                ValueSource::Points(samples),
            ));
        }
        pairs.push(AssignmentPair::new(
            Region::All,
            ValueSource::RasterFile(raster_file.into()),
        ));

        Self::new(pairs, AssignerOptions::default(), frame)
    }
}
