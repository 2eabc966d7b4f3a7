//! Stitch planning.
//!
//! For every segment of every path the planner collects waypoints (the
//! segment endpoints plus every crossing with another path), sorts them in
//! travel order and fills each gap between consecutive waypoints with evenly
//! spaced stitches no farther apart than roughly the pitch.
//!
//! # Algorithm
//!
//! Per segment `S` of path `p`:
//!
//! 1. Waypoints = `S.start`, intersections with segments of paths `q != p`, `S.end`
//! 2. Sort the interior waypoints along `S`, dropping coincident ones
//! 3. Emit `S.start`
//! 4. For each gap of length `d`, emit `max(min_stitches_per_gap, floor(d / pitch) - 1)`
//!    evenly spaced stitches strictly inside the gap, then the crossing that
//!    closes the gap
//! 5. After the last segment, emit the final control point
//!
//! # Performance
//!
//! The intersection search is O(P²·s²) brute force; the default grid index
//! prunes it to segments sharing a cell. Paths are planned in parallel.

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::error::PlanError;
use crate::geometry::{Path, PathSet, Point, Rgb, Segment};
use crate::index::{IntersectionSearch, SegmentIndex};
use crate::intersect::{LENGTH_EPSILON, intersect_segments};
use crate::order::WaypointOrdering;

/// How a collinear overlap between two paths becomes waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapMode {
    /// One waypoint at the mean of the overlap endpoints
    #[default]
    Midpoint,
    /// Two waypoints, one at each end of the overlap
    Endpoints,
}

impl OverlapMode {
    pub fn name(&self) -> &'static str {
        match self {
            OverlapMode::Midpoint => "midpoint",
            OverlapMode::Endpoints => "endpoints",
        }
    }

    pub fn from_name(name: &str) -> Option<OverlapMode> {
        match name.to_lowercase().as_str() {
            "midpoint" | "mean" => Some(OverlapMode::Midpoint),
            "endpoints" | "ends" => Some(OverlapMode::Endpoints),
            _ => None,
        }
    }
}

/// Configuration for stitch planning.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanConfig {
    /// Target spacing between stitches. Must be > 0.
    pub pitch: f64,
    /// Minimum interior stitches in every gap, even gaps shorter than the pitch.
    pub min_stitches_per_gap: usize,
    /// How waypoints are ordered along a segment.
    pub ordering: WaypointOrdering,
    /// How collinear overlaps become waypoints.
    pub overlap: OverlapMode,
    /// Emit a stitch at each crossing. When false, crossings only split gaps.
    pub stitch_at_crossings: bool,
    /// Candidate search strategy.
    pub search: IntersectionSearch,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            pitch: 2.5,
            min_stitches_per_gap: 1,
            ordering: WaypointOrdering::default(),
            overlap: OverlapMode::default(),
            stitch_at_crossings: true,
            search: IntersectionSearch::default(),
        }
    }
}

impl PlanConfig {
    pub fn with_pitch(pitch: f64) -> Self {
        Self {
            pitch,
            ..Self::default()
        }
    }

    /// Reject non-positive or non-finite pitch.
    pub fn validate(&self) -> Result<(), PlanError> {
        if !self.pitch.is_finite() || self.pitch <= 0.0 {
            return Err(PlanError::InvalidPitch(self.pitch));
        }
        Ok(())
    }

    /// Interior stitch count for a gap of length `distance`.
    #[inline]
    pub fn stitches_for_gap(&self, distance: f64) -> usize {
        let steps = (distance / self.pitch).floor();
        let fit = if steps >= 1.0 { steps as usize - 1 } else { 0 };
        fit.max(self.min_stitches_per_gap)
    }
}

/// Why a stitch exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StitchKind {
    /// An original control point of the path
    Control,
    /// A crossing with another path
    Crossing,
    /// Pitch filler between waypoints
    Fill,
}

impl StitchKind {
    pub fn name(&self) -> &'static str {
        match self {
            StitchKind::Control => "control",
            StitchKind::Crossing => "crossing",
            StitchKind::Fill => "fill",
        }
    }
}

/// A single needle penetration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stitch {
    pub point: Point,
    /// Emission order within the path
    pub index: usize,
    pub kind: StitchKind,
}

/// Planned stitches for one path.
#[derive(Debug, Clone, PartialEq)]
pub struct PathStitches {
    /// Index of the source path in its PathSet
    pub path_index: usize,
    pub color: Option<Rgb>,
    pub id: Option<String>,
    pub stitches: Vec<Stitch>,
}

impl PathStitches {
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.stitches.iter().map(|s| s.point)
    }

    pub fn len(&self) -> usize {
        self.stitches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stitches.is_empty()
    }

    pub fn count_of(&self, kind: StitchKind) -> usize {
        self.stitches.iter().filter(|s| s.kind == kind).count()
    }
}

/// Planned stitches for every path, in PathSet order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StitchPlan {
    pub paths: Vec<PathStitches>,
}

impl StitchPlan {
    pub fn stitch_count(&self) -> usize {
        self.paths.iter().map(|p| p.len()).sum()
    }

    pub fn crossing_count(&self) -> usize {
        self.paths.iter().map(|p| p.count_of(StitchKind::Crossing)).sum()
    }
}

/// Accumulates stitches for one path, numbering them in emission order.
struct Emitter {
    stitches: Vec<Stitch>,
}

impl Emitter {
    fn with_capacity(n: usize) -> Self {
        Self {
            stitches: Vec::with_capacity(n),
        }
    }

    #[inline]
    fn emit(&mut self, point: Point, kind: StitchKind) {
        let index = self.stitches.len();
        self.stitches.push(Stitch { point, index, kind });
    }
}

/// Plans stitches for a fixed PathSet.
///
/// Borrowing the paths and building the optional grid once lets every path
/// be planned independently (and in parallel) against the same data.
pub struct StitchPlanner<'a> {
    paths: &'a PathSet,
    config: &'a PlanConfig,
    index: Option<SegmentIndex>,
    tolerance: f64,
}

impl<'a> StitchPlanner<'a> {
    /// Validate inputs and prepare the intersection search.
    pub fn new(paths: &'a PathSet, config: &'a PlanConfig) -> Result<Self, PlanError> {
        config.validate()?;
        for (i, path) in paths.iter().enumerate() {
            if !path.is_valid() {
                return Err(PlanError::TooFewPoints {
                    path: i,
                    points: path.points.len(),
                });
            }
        }

        let tolerance = LENGTH_EPSILON * paths.magnitude().max(1.0);
        let index = match config.search {
            IntersectionSearch::Grid => Some(SegmentIndex::build(paths, tolerance * 16.0)),
            IntersectionSearch::BruteForce => None,
        };

        Ok(Self {
            paths,
            config,
            index,
            tolerance,
        })
    }

    /// Plan every path, in order.
    pub fn plan(&self) -> StitchPlan {
        let paths: Vec<PathStitches> = (0..self.paths.len())
            .into_par_iter()
            .map(|i| self.plan_index(i))
            .collect();

        let plan = StitchPlan { paths };
        debug!(
            paths = plan.paths.len(),
            stitches = plan.stitch_count(),
            crossings = plan.crossing_count(),
            pitch = self.config.pitch,
            "planned stitches"
        );
        plan
    }

    /// Plan a single path by index.
    pub fn plan_path(&self, index: usize) -> Result<PathStitches, PlanError> {
        if index >= self.paths.len() {
            return Err(PlanError::PathOutOfRange {
                index,
                len: self.paths.len(),
            });
        }
        Ok(self.plan_index(index))
    }

    fn plan_index(&self, path_index: usize) -> PathStitches {
        let path = &self.paths.paths()[path_index];
        let segment_count = path.segment_count();
        let mut out = Emitter::with_capacity(path.points.len() * 2);

        for (seg_idx, segment) in path.segments().enumerate() {
            let waypoints = self.waypoints(path_index, &segment);
            self.fill_segment(path_index, seg_idx, &waypoints, &mut out);

            if seg_idx + 1 == segment_count {
                out.emit(segment.end, StitchKind::Control);
            }
        }

        PathStitches {
            path_index,
            color: path.color,
            id: path.id.clone(),
            stitches: out.stitches,
        }
    }

    /// Ordered notable points of `segment`: start, crossings, end.
    fn waypoints(&self, path_index: usize, segment: &Segment) -> Vec<Point> {
        let mut interior = Vec::new();

        let mut visit = |other: &Segment| {
            let hit = intersect_segments(segment, other);
            match (self.config.overlap, hit.overlap) {
                (OverlapMode::Endpoints, Some((lo, hi))) => {
                    interior.push(lo);
                    interior.push(hi);
                }
                _ => {
                    if let Some(point) = hit.point {
                        interior.push(point);
                    }
                }
            }
        };

        match &self.index {
            Some(index) => {
                for r in index.candidates(segment, path_index) {
                    if let Some(other) = self.paths.get(r.path).and_then(|p| p.segment(r.segment)) {
                        visit(&other);
                    }
                }
            }
            None => {
                for (other_idx, other_path) in self.paths.iter().enumerate() {
                    if other_idx == path_index {
                        continue;
                    }
                    other_path.segments().for_each(|other| visit(&other));
                }
            }
        }

        self.config.ordering.comparator(segment).sort(&mut interior);

        let mut waypoints = Vec::with_capacity(interior.len() + 2);
        waypoints.push(segment.start);
        for point in interior {
            let duplicate = waypoints
                .last()
                .is_some_and(|last: &Point| last.approx_eq(point, self.tolerance));
            if !duplicate && !point.approx_eq(segment.end, self.tolerance) {
                waypoints.push(point);
            }
        }
        waypoints.push(segment.end);
        waypoints
    }

    /// Emit the segment start, then fill each gap between waypoints.
    fn fill_segment(
        &self,
        path_index: usize,
        seg_idx: usize,
        waypoints: &[Point],
        out: &mut Emitter,
    ) {
        out.emit(waypoints[0], StitchKind::Control);

        let last_gap = waypoints.len() - 2;
        for (gap, pair) in waypoints.windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            let distance = from.distance(to);
            let count = self.config.stitches_for_gap(distance);

            trace!(
                path = path_index,
                segment = seg_idx,
                gap,
                distance,
                count,
                "filling gap"
            );

            let step = 1.0 / (count + 1) as f64;
            for k in 1..=count {
                out.emit(from.lerp(to, k as f64 * step), StitchKind::Fill);
            }

            if gap < last_gap && self.config.stitch_at_crossings {
                out.emit(to, StitchKind::Crossing);
            }
        }
    }
}

/// Plan stitches for every path in `paths`.
pub fn plan_stitches(paths: &PathSet, config: &PlanConfig) -> Result<StitchPlan, PlanError> {
    Ok(StitchPlanner::new(paths, config)?.plan())
}

/// Plan stitches for the path at `index`, intersecting it against the rest of `paths`.
pub fn plan_path_stitches(
    paths: &PathSet,
    index: usize,
    config: &PlanConfig,
) -> Result<PathStitches, PlanError> {
    StitchPlanner::new(paths, config)?.plan_path(index)
}

/// Plan a lone path with no crossings.
pub fn plan_single_path(path: &Path, config: &PlanConfig) -> Result<PathStitches, PlanError> {
    let set = PathSet::new(vec![path.clone()]);
    plan_path_stitches(&set, 0, config)
}

// ============================================================================
// TESTS
// ============================================================================
