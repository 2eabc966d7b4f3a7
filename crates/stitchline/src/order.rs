//! Waypoint ordering along a segment.
//!
//! Intersections are discovered in path order, not travel order. Before the
//! gaps between them can be filled they must be sorted along the direction
//! the segment is stitched.
//!
//! ## Strategies
//!
//! - **Projection**: scalar projection onto the unit direction. Exact for any
//!   slope.
//! - **SignedAxes**: sort by x then y, each flipped to the direction of travel.
//!   Only exact for segments monotonic in both axes; kept for compatibility
//!   with patterns planned by earlier tools.

use std::cmp::Ordering;

use crate::geometry::{Point, Segment};

/// Ordering strategy for waypoints along a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaypointOrdering {
    /// Distance along the segment direction
    #[default]
    Projection,
    /// Lexicographic (sign_x·x, sign_y·y)
    SignedAxes,
}

impl WaypointOrdering {
    /// Get strategy name as string.
    pub fn name(&self) -> &'static str {
        match self {
            WaypointOrdering::Projection => "projection",
            WaypointOrdering::SignedAxes => "axes",
        }
    }

    /// Parse strategy from string.
    pub fn from_name(name: &str) -> Option<WaypointOrdering> {
        match name.to_lowercase().as_str() {
            "projection" | "proj" | "distance" => Some(WaypointOrdering::Projection),
            "axes" | "signed-axes" | "legacy" => Some(WaypointOrdering::SignedAxes),
            _ => None,
        }
    }

    /// All available strategies.
    pub fn all() -> &'static [WaypointOrdering] {
        &[WaypointOrdering::Projection, WaypointOrdering::SignedAxes]
    }

    /// Build the comparator for waypoints on `segment`.
    pub fn comparator(&self, segment: &Segment) -> WaypointComparator {
        match self {
            WaypointOrdering::Projection => {
                let v = segment.vector();
                let len = v.length();
                let dir = if len > 0.0 { v * (1.0 / len) } else { Point::default() };
                WaypointComparator::Projection {
                    origin: segment.start,
                    dir,
                }
            }
            WaypointOrdering::SignedAxes => WaypointComparator::SignedAxes {
                sign_x: if segment.end.x > segment.start.x { 1.0 } else { -1.0 },
                sign_y: if segment.end.y > segment.start.y { 1.0 } else { -1.0 },
            },
        }
    }
}

/// A ready-to-use ordering for one segment.
#[derive(Debug, Clone, Copy)]
pub enum WaypointComparator {
    Projection { origin: Point, dir: Point },
    SignedAxes { sign_x: f64, sign_y: f64 },
}

impl WaypointComparator {
    /// Distance of `p` along the segment (projection only; 0 otherwise).
    #[inline]
    pub fn key(&self, p: Point) -> f64 {
        match *self {
            WaypointComparator::Projection { origin, dir } => (p - origin).dot(dir),
            WaypointComparator::SignedAxes { .. } => 0.0,
        }
    }

    pub fn compare(&self, a: Point, b: Point) -> Ordering {
        match *self {
            WaypointComparator::Projection { .. } => self.key(a).total_cmp(&self.key(b)),
            WaypointComparator::SignedAxes { sign_x, sign_y } => (sign_x * a.x)
                .total_cmp(&(sign_x * b.x))
                .then_with(|| (sign_y * a.y).total_cmp(&(sign_y * b.y))),
        }
    }

    /// Stable in-place sort of points in travel order.
    pub fn sort(&self, points: &mut [Point]) {
        points.sort_by(|a, b| self.compare(*a, *b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn projection_orders_reverse_diagonal() {
        let s = seg(10.0, 10.0, 0.0, 0.0);
        let mut pts = vec![Point::new(2.0, 2.0), Point::new(8.0, 8.0), Point::new(5.0, 5.0)];
        WaypointOrdering::Projection.comparator(&s).sort(&mut pts);
        assert_eq!(pts, vec![Point::new(8.0, 8.0), Point::new(5.0, 5.0), Point::new(2.0, 2.0)]);
    }

    #[test]
    fn projection_handles_vertical_segment() {
        let s = seg(3.0, 0.0, 3.0, -10.0);
        let mut pts = vec![Point::new(3.0, -7.0), Point::new(3.0, -1.0), Point::new(3.0, -4.0)];
        WaypointOrdering::Projection.comparator(&s).sort(&mut pts);
        let ys: Vec<f64> = pts.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![-1.0, -4.0, -7.0]);
    }

    #[test]
    fn signed_axes_matches_monotonic_segment() {
        let s = seg(0.0, 10.0, 10.0, 0.0);
        let mut pts = vec![Point::new(7.0, 3.0), Point::new(1.0, 9.0), Point::new(4.0, 6.0)];
        WaypointOrdering::SignedAxes.comparator(&s).sort(&mut pts);
        assert_eq!(pts[0], Point::new(1.0, 9.0));
        assert_eq!(pts[2], Point::new(7.0, 3.0));
    }

    #[test]
    fn signed_axes_vertical_uses_y() {
        // x is constant so the y key decides.
        let s = seg(0.0, 0.0, 0.0, 10.0);
        let mut pts = vec![Point::new(0.0, 6.0), Point::new(0.0, 2.0)];
        WaypointOrdering::SignedAxes.comparator(&s).sort(&mut pts);
        assert_eq!(pts[0].y, 2.0);
    }

    #[test]
    fn projection_key_is_distance() {
        let s = seg(0.0, 0.0, 3.0, 4.0);
        let cmp = WaypointOrdering::Projection.comparator(&s);
        assert!((cmp.key(Point::new(3.0, 4.0)) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn strategy_parsing() {
        assert_eq!(WaypointOrdering::from_name("projection"), Some(WaypointOrdering::Projection));
        assert_eq!(WaypointOrdering::from_name("AXES"), Some(WaypointOrdering::SignedAxes));
        assert_eq!(WaypointOrdering::from_name("invalid"), None);
        for s in WaypointOrdering::all() {
            assert_eq!(WaypointOrdering::from_name(s.name()), Some(*s));
        }
    }
}
