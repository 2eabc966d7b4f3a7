//! Spatial index over path segments.
//!
//! The all-pairs intersection search is O(P²·s²). Hashing every segment's
//! bounding box into a uniform grid lets the planner test only segments that
//! share a cell, without changing which intersections are found.

use std::collections::HashMap;

use crate::geometry::{PathSet, Segment};

/// Upper bound on grid cells along either axis.
const MAX_CELLS_PER_AXIS: f64 = 256.0;

/// Identifies one segment of one path: `(path index, segment index)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SegmentRef {
    pub path: usize,
    pub segment: usize,
}

/// How the planner finds candidate segments on other paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntersectionSearch {
    /// Test every segment of every other path
    BruteForce,
    /// Only test segments sharing a grid cell
    #[default]
    Grid,
}

impl IntersectionSearch {
    pub fn name(&self) -> &'static str {
        match self {
            IntersectionSearch::BruteForce => "brute-force",
            IntersectionSearch::Grid => "grid",
        }
    }

    pub fn from_name(name: &str) -> Option<IntersectionSearch> {
        match name.to_lowercase().as_str() {
            "brute-force" | "brute" | "all-pairs" => Some(IntersectionSearch::BruteForce),
            "grid" => Some(IntersectionSearch::Grid),
            _ => None,
        }
    }
}

/// Uniform grid of segment bounding boxes.
#[derive(Debug, Clone)]
pub struct SegmentIndex {
    cell_size: f64,
    /// Bounding boxes are grown by this much before hashing.
    padding: f64,
    cells: HashMap<(i64, i64), Vec<SegmentRef>>,
}

impl SegmentIndex {
    /// Index every segment of every path.
    ///
    /// Cell size follows the mean segment length, clamped so neither axis
    /// has more than `MAX_CELLS_PER_AXIS` cells.
    pub fn build(paths: &PathSet, padding: f64) -> Self {
        let segment_count = paths.segment_count();
        let (min_x, min_y, max_x, max_y) = paths.bounding_box().unwrap_or((0.0, 0.0, 0.0, 0.0));
        let extent = (max_x - min_x).max(max_y - min_y);

        let mean_length = if segment_count > 0 {
            paths.iter().map(|p| p.length()).sum::<f64>() / segment_count as f64
        } else {
            0.0
        };

        let cell_size = mean_length
            .max(extent / MAX_CELLS_PER_AXIS)
            .max(padding * 4.0)
            .max(1e-6);

        let mut index = Self {
            cell_size,
            padding,
            cells: HashMap::new(),
        };

        for (path_idx, path) in paths.iter().enumerate() {
            for (seg_idx, segment) in path.segments().enumerate() {
                let entry = SegmentRef {
                    path: path_idx,
                    segment: seg_idx,
                };
                for cell in index.cells_for(&segment) {
                    index.cells.entry(cell).or_default().push(entry);
                }
            }
        }

        index
    }

    #[inline]
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Number of occupied cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Convert a coordinate pair to a grid cell.
    #[inline]
    fn point_to_cell(&self, x: f64, y: f64) -> (i64, i64) {
        (
            (x / self.cell_size).floor() as i64,
            (y / self.cell_size).floor() as i64,
        )
    }

    /// All cells covered by the padded bounding box of `segment`.
    fn cells_for(&self, segment: &Segment) -> impl Iterator<Item = (i64, i64)> + use<> {
        let (min_x, min_y, max_x, max_y) = segment.bounding_box();
        let lo = self.point_to_cell(min_x - self.padding, min_y - self.padding);
        let hi = self.point_to_cell(max_x + self.padding, max_y + self.padding);
        (lo.0..=hi.0).flat_map(move |cx| (lo.1..=hi.1).map(move |cy| (cx, cy)))
    }

    /// Segments of paths other than `exclude_path` that may touch `segment`.
    ///
    /// Sorted by (path, segment) and free of duplicates, so callers see the
    /// same order a brute-force scan would produce.
    pub fn candidates(&self, segment: &Segment, exclude_path: usize) -> Vec<SegmentRef> {
        let mut found: Vec<SegmentRef> = self
            .cells_for(segment)
            .filter_map(|cell| self.cells.get(&cell))
            .flatten()
            .filter(|r| r.path != exclude_path)
            .copied()
            .collect();
        found.sort_unstable();
        found.dedup();
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Path, Point};

    fn two_crossing_paths() -> PathSet {
        PathSet::new(vec![
            Path::from_coords(&[0.0, 10.0, 20.0], &[0.0, 0.0, 0.0]),
            Path::from_coords(&[5.0, 5.0], &[-5.0, 5.0]),
            Path::from_coords(&[100.0, 110.0], &[100.0, 100.0]),
        ])
    }

    #[test]
    fn finds_crossing_candidate() {
        let paths = two_crossing_paths();
        let index = SegmentIndex::build(&paths, 1e-6);
        let seg = paths.get(0).and_then(|p| p.segment(0)).unwrap();
        let found = index.candidates(&seg, 0);
        assert!(found.contains(&SegmentRef { path: 1, segment: 0 }));
        assert!(!found.iter().any(|r| r.path == 2), "far segment should be pruned");
    }

    #[test]
    fn excludes_own_path() {
        let paths = two_crossing_paths();
        let index = SegmentIndex::build(&paths, 1e-6);
        let seg = paths.get(1).and_then(|p| p.segment(0)).unwrap();
        let found = index.candidates(&seg, 1);
        assert!(found.iter().all(|r| r.path != 1));
        assert!(found.contains(&SegmentRef { path: 0, segment: 0 }));
    }

    #[test]
    fn candidates_sorted_and_unique() {
        let paths = two_crossing_paths();
        let index = SegmentIndex::build(&paths, 1e-6);
        let long = Segment::new(Point::new(-1.0, 0.0), Point::new(21.0, 0.0));
        let found = index.candidates(&long, usize::MAX);
        let mut sorted = found.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(found, sorted);
    }

    #[test]
    fn touching_endpoints_share_a_cell() {
        let paths = PathSet::new(vec![
            Path::from_coords(&[0.0, 10.0], &[0.0, 0.0]),
            Path::from_coords(&[10.0, 30.0], &[0.0, 25.0]),
        ]);
        let index = SegmentIndex::build(&paths, 1e-6);
        let seg = paths.get(0).and_then(|p| p.segment(0)).unwrap();
        assert_eq!(index.candidates(&seg, 0), vec![SegmentRef { path: 1, segment: 0 }]);
    }

    #[test]
    fn cell_count_is_bounded() {
        // One very long path and many tiny segments elsewhere.
        let mut paths = PathSet::new(vec![Path::from_coords(&[0.0, 1.0e7], &[0.0, 0.0])]);
        for i in 0..50 {
            let x = i as f64 * 0.001;
            paths.push(Path::from_coords(&[x, x + 0.0001], &[1.0, 1.0]));
        }
        let index = SegmentIndex::build(&paths, 1e-6);
        assert!(index.cell_size() >= 1.0e7 / MAX_CELLS_PER_AXIS);
    }

    #[test]
    fn search_parsing() {
        assert_eq!(IntersectionSearch::from_name("grid"), Some(IntersectionSearch::Grid));
        assert_eq!(IntersectionSearch::from_name("brute"), Some(IntersectionSearch::BruteForce));
        assert_eq!(IntersectionSearch::from_name("nope"), None);
    }
}
