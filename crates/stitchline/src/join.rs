//! Path joining - merge consecutive paths that continue one another.
//!
//! Editors often export a drawn outline as many short paths whose ends touch.
//! Stitching each separately would tie off and restart the thread at every
//! seam, so paths are grouped while each one starts where the previous one
//! ended.
//!
//! Unlike a general chaining pass, joining never reorders or reverses paths:
//! the artist's drawing order is the stitching order.

use tracing::debug;

use crate::geometry::{Path, PathSet, Point};

/// Configuration for path joining.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinConfig {
    /// Maximum per-axis distance between one path's end and the next one's
    /// start for them to be joined.
    /// Default: 1e-5
    pub tolerance: f64,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self { tolerance: 1e-5 }
    }
}

impl JoinConfig {
    pub fn with_tolerance(tolerance: f64) -> Self {
        Self { tolerance }
    }

    #[inline]
    fn connects(&self, end: Point, start: Point) -> bool {
        (end.x - start.x).abs() < self.tolerance && (end.y - start.y).abs() < self.tolerance
    }
}

/// Join paths whose start coincides with the previous path's end.
///
/// The shared point is kept once. A joined group takes its colour and id from
/// its first member. Paths with no points pass through unchanged.
pub fn join_connected_paths(paths: &PathSet, config: &JoinConfig) -> PathSet {
    let mut joined: Vec<Path> = Vec::with_capacity(paths.len());

    for path in paths {
        let continues = match (joined.last().and_then(Path::last), path.first()) {
            (Some(end), Some(start)) => config.connects(end, start),
            _ => false,
        };

        match joined.last_mut() {
            Some(group) if continues => group.points.extend_from_slice(&path.points[1..]),
            _ => joined.push(path.clone()),
        }
    }

    debug!(before = paths.len(), after = joined.len(), "joined connected paths");
    PathSet::new(joined)
}

/// Statistics about a join.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinStats {
    pub input_paths: usize,
    pub output_paths: usize,
}

impl JoinStats {
    pub fn from_sets(before: &PathSet, after: &PathSet) -> Self {
        Self {
            input_paths: before.len(),
            output_paths: after.len(),
        }
    }

    /// Number of seams removed.
    pub fn joins(&self) -> usize {
        self.input_paths.saturating_sub(self.output_paths)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rgb;

    #[test]
    fn joins_touching_paths() {
        let mut first = Path::from_coords(&[0.0, 1.0], &[0.0, 0.0]);
        first.color = Some(Rgb::new(1, 2, 3));
        let paths = PathSet::new(vec![
            first,
            Path::from_coords(&[1.0, 1.0], &[0.0, 1.0]),
            Path::from_coords(&[1.0 + 1e-7, 2.0], &[1.0, 1.0]),
        ]);

        let joined = join_connected_paths(&paths, &JoinConfig::default());
        assert_eq!(joined.len(), 1);
        let group = joined.get(0).unwrap();
        assert_eq!(group.points.len(), 4);
        assert_eq!(group.color, Some(Rgb::new(1, 2, 3)));
        assert_eq!(group.last(), Some(Point::new(2.0, 1.0)));
    }

    #[test]
    fn gap_starts_new_group() {
        let paths = PathSet::new(vec![
            Path::from_coords(&[0.0, 1.0], &[0.0, 0.0]),
            Path::from_coords(&[1.5, 2.0], &[0.0, 0.0]),
            Path::from_coords(&[2.0, 3.0], &[0.0, 0.0]),
        ]);

        let joined = join_connected_paths(&paths, &JoinConfig::default());
        assert_eq!(joined.len(), 2);
        assert_eq!(joined.get(1).unwrap().points.len(), 3);

        let stats = JoinStats::from_sets(&paths, &joined);
        assert_eq!(stats.joins(), 1);
    }

    #[test]
    fn order_and_direction_are_kept() {
        // Second path ends where the first starts; joining would need a reversal.
        let paths = PathSet::new(vec![
            Path::from_coords(&[0.0, 1.0], &[0.0, 0.0]),
            Path::from_coords(&[5.0, 0.0], &[5.0, 0.0]),
        ]);
        let joined = join_connected_paths(&paths, &JoinConfig::default());
        assert_eq!(joined, paths);
    }

    #[test]
    fn wider_tolerance() {
        let paths = PathSet::new(vec![
            Path::from_coords(&[0.0, 1.0], &[0.0, 0.0]),
            Path::from_coords(&[1.05, 2.0], &[0.0, 0.0]),
        ]);
        assert_eq!(join_connected_paths(&paths, &JoinConfig::default()).len(), 2);
        assert_eq!(join_connected_paths(&paths, &JoinConfig::with_tolerance(0.1)).len(), 1);
    }

    #[test]
    fn empty_set() {
        let joined = join_connected_paths(&PathSet::default(), &JoinConfig::default());
        assert!(joined.is_empty());
    }
}
