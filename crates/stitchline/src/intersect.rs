//! Segment-segment intersection.
//!
//! This is the HOT PATH of stitch planning: every segment of every path is
//! tested against every segment of every other path.
//!
//! With `p = a.start`, `r = a.end - a.start`, `q = b.start`, `s = b.end - b.start`
//! the segments meet where `p + t·r = q + u·s` for `t, u ∈ [0, 1]`. The 2D cross
//! product `cross(r, s)` decides between the crossing, parallel and collinear
//! cases. All zero tests are tolerance based.

use crate::geometry::{Point, Segment};

/// Segments shorter than this (times the coordinate magnitude) are degenerate.
pub const LENGTH_EPSILON: f64 = 1e-9;

/// `|sin θ|` below this means the segment directions are parallel.
pub const ANGLE_EPSILON: f64 = 1e-9;

/// Slack allowed on the `[0, 1]` segment parameters.
pub const PARAM_EPSILON: f64 = 1e-9;

/// How two segments relate to each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectionKind {
    /// Non-parallel segments that meet at a single point.
    Crossing,
    /// Non-parallel segments whose supporting lines meet outside the segments.
    Disjoint,
    /// Parallel segments on different lines.
    Parallel,
    /// Segments on the same line. Overlapping when a point is present.
    Collinear,
    /// At least one segment has zero length.
    Degenerate,
}

/// Result of [`intersect_segments`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentIntersection {
    pub kind: IntersectionKind,
    /// Representative intersection point. For a collinear overlap this is the
    /// mean of the endpoints lying on the other segment.
    pub point: Option<Point>,
    /// For a collinear overlap, the extreme overlap points ordered along the
    /// first segment.
    pub overlap: Option<(Point, Point)>,
}

impl SegmentIntersection {
    fn none(kind: IntersectionKind) -> Self {
        Self {
            kind,
            point: None,
            overlap: None,
        }
    }

    #[inline]
    pub fn is_parallel(&self) -> bool {
        self.kind == IntersectionKind::Parallel
    }

    #[inline]
    pub fn is_collinear(&self) -> bool {
        self.kind == IntersectionKind::Collinear
    }
}

/// Distance tolerance for a pair of segments, scaled to their coordinates.
#[inline]
fn distance_tolerance(a: &Segment, b: &Segment) -> f64 {
    LENGTH_EPSILON * a.magnitude().max(b.magnitude()).max(1.0)
}

#[inline]
fn param_in_unit(t: f64) -> bool {
    (-PARAM_EPSILON..=1.0 + PARAM_EPSILON).contains(&t)
}

/// Intersect two finite segments, classifying parallel and collinear cases.
pub fn intersect_segments(a: &Segment, b: &Segment) -> SegmentIntersection {
    let p = a.start;
    let q = b.start;
    let r = a.vector();
    let s = b.vector();

    let len_r = r.length();
    let len_s = s.length();
    let tolerance = distance_tolerance(a, b);

    if len_r <= tolerance || len_s <= tolerance {
        return SegmentIntersection::none(IntersectionKind::Degenerate);
    }

    let qp = q - p;
    let rxs = r.cross(s);

    if (rxs / (len_r * len_s)).abs() <= ANGLE_EPSILON {
        // Perpendicular distance from q to the line through a.
        let offset = qp.cross(r).abs() / len_r;
        if offset <= tolerance {
            return collinear_overlap(a, b);
        }
        return SegmentIntersection::none(IntersectionKind::Parallel);
    }

    let t = qp.cross(s) / rxs;
    let u = qp.cross(r) / rxs;

    if param_in_unit(t) && param_in_unit(u) {
        SegmentIntersection {
            kind: IntersectionKind::Crossing,
            point: Some(a.point_at(t.clamp(0.0, 1.0))),
            overlap: None,
        }
    } else {
        SegmentIntersection::none(IntersectionKind::Disjoint)
    }
}

/// Overlap of two collinear segments.
///
/// Each endpoint is expressed in the other segment's parameter frame; those
/// landing inside `[0, 1]` bound the overlap.
fn collinear_overlap(a: &Segment, b: &Segment) -> SegmentIntersection {
    let p = a.start;
    let q = b.start;
    let r = a.vector();
    let s = b.vector();
    let rr = r.dot(r);
    let ss = s.dot(s);

    // (parameter along a, point)
    let mut on_other: Vec<(f64, Point)> = Vec::with_capacity(4);

    for t in [(q - p).dot(r) / rr, (b.end - p).dot(r) / rr] {
        if param_in_unit(t) {
            on_other.push((t, a.point_at(t)));
        }
    }
    for u in [(p - q).dot(s) / ss, (a.end - q).dot(s) / ss] {
        if param_in_unit(u) {
            let point = b.point_at(u);
            on_other.push(((point - p).dot(r) / rr, point));
        }
    }

    if on_other.is_empty() {
        return SegmentIntersection::none(IntersectionKind::Collinear);
    }

    let n = on_other.len() as f64;
    let sum = on_other
        .iter()
        .fold(Point::default(), |acc, &(_, pt)| acc + pt);
    let mean = sum * (1.0 / n);

    let lo = on_other
        .iter()
        .min_by(|x, y| x.0.total_cmp(&y.0))
        .map(|&(_, pt)| pt);
    let hi = on_other
        .iter()
        .max_by(|x, y| x.0.total_cmp(&y.0))
        .map(|&(_, pt)| pt);

    SegmentIntersection {
        kind: IntersectionKind::Collinear,
        point: Some(mean),
        overlap: lo.zip(hi),
    }
}

/// Intersection point of two segments, if any.
#[inline]
pub fn segment_intersection(a: &Segment, b: &Segment) -> Option<Point> {
    intersect_segments(a, b).point
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> Segment {
        Segment::new(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn perpendicular_crossing() {
        let hit = intersect_segments(&seg(0.0, 0.0, 10.0, 0.0), &seg(5.0, -5.0, 5.0, 5.0));
        assert_eq!(hit.kind, IntersectionKind::Crossing);
        let p = hit.point.unwrap();
        assert_abs_diff_eq!(p.x, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn diagonal_crossing() {
        let p = segment_intersection(&seg(0.0, 0.0, 10.0, 10.0), &seg(0.0, 10.0, 10.0, 0.0)).unwrap();
        assert_abs_diff_eq!(p.x, 5.0, epsilon = 1e-10);
        assert_abs_diff_eq!(p.y, 5.0, epsilon = 1e-10);
    }

    #[test]
    fn parallel_segments() {
        let hit = intersect_segments(&seg(0.0, 0.0, 10.0, 0.0), &seg(0.0, 1.0, 10.0, 1.0));
        assert!(hit.is_parallel());
        assert_eq!(hit.point, None);
    }

    #[test]
    fn nearly_parallel_noise_is_parallel() {
        let hit = intersect_segments(&seg(0.0, 0.0, 10.0, 0.0), &seg(0.0, 1.0, 10.0, 1.0 + 1e-15));
        assert!(hit.is_parallel());
    }

    #[test]
    fn lines_meet_outside_segments() {
        let hit = intersect_segments(&seg(0.0, 0.0, 1.0, 0.0), &seg(5.0, -1.0, 5.0, 1.0));
        assert_eq!(hit.kind, IntersectionKind::Disjoint);
        assert_eq!(hit.point, None);
    }

    #[test]
    fn touching_at_endpoint_counts() {
        let p = segment_intersection(&seg(0.0, 0.0, 10.0, 0.0), &seg(10.0, 0.0, 10.0, 5.0)).unwrap();
        assert_abs_diff_eq!(p.x, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(p.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn collinear_overlap_midpoint() {
        let hit = intersect_segments(&seg(0.0, 0.0, 10.0, 0.0), &seg(5.0, 0.0, 15.0, 0.0));
        assert!(hit.is_collinear());
        let p = hit.point.unwrap();
        assert!((5.0..=10.0).contains(&p.x));
        assert_abs_diff_eq!(p.y, 0.0);
        assert_abs_diff_eq!(p.x, 7.5, epsilon = 1e-12);

        let (lo, hi) = hit.overlap.unwrap();
        assert_abs_diff_eq!(lo.x, 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(hi.x, 10.0, epsilon = 1e-12);
    }

    #[test]
    fn collinear_overlap_reversed_second_segment() {
        let hit = intersect_segments(&seg(0.0, 0.0, 10.0, 10.0), &seg(12.0, 12.0, 4.0, 4.0));
        let (lo, hi) = hit.overlap.unwrap();
        assert_abs_diff_eq!(lo.x, 4.0, epsilon = 1e-9);
        assert_abs_diff_eq!(hi.x, 10.0, epsilon = 1e-9);
        let p = hit.point.unwrap();
        assert!(p.x >= 4.0 - 1e-9 && p.x <= 10.0 + 1e-9);
        assert_abs_diff_eq!(p.x, p.y, epsilon = 1e-9);
    }

    #[test]
    fn collinear_contained() {
        let hit = intersect_segments(&seg(0.0, 0.0, 10.0, 0.0), &seg(2.0, 0.0, 4.0, 0.0));
        let p = hit.point.unwrap();
        assert_abs_diff_eq!(p.x, 3.0, epsilon = 1e-12);
    }

    #[test]
    fn collinear_disjoint() {
        let hit = intersect_segments(&seg(0.0, 0.0, 10.0, 0.0), &seg(11.0, 0.0, 20.0, 0.0));
        assert!(hit.is_collinear());
        assert_eq!(hit.point, None);
        assert_eq!(hit.overlap, None);
    }

    #[test]
    fn degenerate_segment_is_no_intersection() {
        let hit = intersect_segments(&seg(5.0, 0.0, 5.0, 0.0), &seg(0.0, 0.0, 10.0, 0.0));
        assert_eq!(hit.kind, IntersectionKind::Degenerate);
        assert_eq!(hit.point, None);

        let hit = intersect_segments(&seg(0.0, 0.0, 10.0, 0.0), &seg(3.0, 3.0, 3.0, 3.0));
        assert_eq!(hit.kind, IntersectionKind::Degenerate);
    }

    #[test]
    fn crossing_satisfies_both_parametric_equations() {
        let a = seg(-3.2, 1.7, 8.9, -4.4);
        let b = seg(0.5, -6.0, 2.25, 7.75);
        let p = segment_intersection(&a, &b).unwrap();

        // Project onto each segment and rebuild the point from its parameter.
        for s in [a, b] {
            let v = s.vector();
            let t = (p - s.start).dot(v) / v.dot(v);
            assert!((0.0..=1.0).contains(&t));
            let rebuilt = s.point_at(t);
            assert_abs_diff_eq!(rebuilt.x, p.x, epsilon = 1e-6);
            assert_abs_diff_eq!(rebuilt.y, p.y, epsilon = 1e-6);
        }
    }

    #[test]
    fn large_coordinates_stay_stable() {
        let hit = intersect_segments(
            &seg(1.0e6, 1.0e6, 1.0e6 + 10.0, 1.0e6),
            &seg(1.0e6 + 5.0, 1.0e6 - 5.0, 1.0e6 + 5.0, 1.0e6 + 5.0),
        );
        let p = hit.point.unwrap();
        assert_abs_diff_eq!(p.x, 1.0e6 + 5.0, epsilon = 1e-6);
        assert_abs_diff_eq!(p.y, 1.0e6, epsilon = 1e-6);
    }
}
