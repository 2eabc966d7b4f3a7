//! Core geometry types for stitchline.
//!
//! ## Rust Lesson #3: Structs & Derives
//!
//! The `#[derive(...)]` macro auto-generates common functionality:
//! - `Debug` = print with `{:?}`
//! - `Clone` / `Copy` = duplicate the value (Copy only for small stack values)
//! - `PartialEq` = compare with `==`
//!
//! `Point` is `Copy`, so passing it by value is as cheap as passing a reference.

use std::ops::{Add, Mul, Sub};

/// A 2D point with x,y coordinates. Also used as a 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A line segment defined by two endpoints. May be degenerate (start == end).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

/// An 8-bit RGB stroke colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A polyline: an ordered sequence of control points.
///
/// Point order matters - it is the direction the needle travels.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub points: Vec<Point>,
    /// Stroke colour from the source artwork
    pub color: Option<Rgb>,
    /// Optional ID from the SVG element
    pub id: Option<String>,
}

/// Ordered collection of paths. The index of a path is its identity.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathSet {
    paths: Vec<Path>,
}

// ============================================================================
// IMPLEMENTATIONS
// ============================================================================

impl Point {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).length()
    }

    /// Length of this point taken as a vector.
    #[inline]
    pub fn length(&self) -> f64 {
        self.dot(*self).sqrt()
    }

    #[inline]
    pub fn dot(&self, other: Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Scalar 2D cross product: `self.x * other.y - self.y * other.x`.
    #[inline]
    pub fn cross(&self, other: Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Linear interpolation: `t = 0` is self, `t = 1` is other.
    #[inline]
    pub fn lerp(&self, other: Point, t: f64) -> Point {
        *self + (other - *self) * t
    }

    /// Largest absolute coordinate.
    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.x.abs().max(self.y.abs())
    }

    /// Per-axis comparison within an absolute tolerance.
    #[inline]
    pub fn approx_eq(&self, other: Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

// ## Rust Lesson #4: Operator Overloading
//
// Implementing `std::ops::Sub` lets us write `a - b` for points.
// Because Point is Copy, the operators can take `self` by value.

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    #[inline]
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

impl Segment {
    #[inline]
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Direction vector `end - start`.
    #[inline]
    pub fn vector(&self) -> Point {
        self.end - self.start
    }

    #[inline]
    pub fn length(&self) -> f64 {
        self.vector().length()
    }

    /// Get the midpoint of the segment.
    #[inline]
    pub fn midpoint(&self) -> Point {
        self.start.lerp(self.end, 0.5)
    }

    /// Point at parameter `t` (0 = start, 1 = end).
    #[inline]
    pub fn point_at(&self, t: f64) -> Point {
        self.start.lerp(self.end, t)
    }

    /// Bounding box as (min_x, min_y, max_x, max_y).
    #[inline]
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        (
            self.start.x.min(self.end.x),
            self.start.y.min(self.end.y),
            self.start.x.max(self.end.x),
            self.start.y.max(self.end.y),
        )
    }

    /// Largest absolute coordinate of either endpoint.
    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.start.magnitude().max(self.end.magnitude())
    }
}

impl Rgb {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Unpack a `0xRRGGBB` integer.
    pub fn from_packed(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    /// `#rrggbb` hex notation.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl Path {
    /// Create a path with no metadata.
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points,
            color: None,
            id: None,
        }
    }

    /// Create a path with colour and id.
    pub fn with_metadata(points: Vec<Point>, color: Option<Rgb>, id: Option<String>) -> Self {
        Self { points, color, id }
    }

    /// Build a path from parallel x and y coordinate lists.
    pub fn from_coords(xs: &[f64], ys: &[f64]) -> Self {
        Self::new(
            xs.iter()
                .zip(ys)
                .map(|(&x, &y)| Point::new(x, y))
                .collect(),
        )
    }

    /// A path needs at least two points to define a segment.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn first(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<Point> {
        self.points.last().copied()
    }

    #[inline]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Consecutive point pairs as segments.
    ///
    /// ## Rust Lesson #5: impl Trait in return position
    ///
    /// `impl Iterator<Item = Segment> + '_` means "some iterator borrowing
    /// self". The caller never sees the concrete adapter type.
    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points
            .windows(2)
            .map(|pair| Segment::new(pair[0], pair[1]))
    }

    /// The `index`th segment, if it exists.
    pub fn segment(&self, index: usize) -> Option<Segment> {
        if index + 1 < self.points.len() {
            Some(Segment::new(self.points[index], self.points[index + 1]))
        } else {
            None
        }
    }

    /// Total polyline length.
    pub fn length(&self) -> f64 {
        self.segments().map(|s| s.length()).sum()
    }

    /// Get the bounding box as (min_x, min_y, max_x, max_y).
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        bounding_box_of_points(self.points.iter().copied())
    }
}

impl PathSet {
    pub fn new(paths: Vec<Path>) -> Self {
        Self { paths }
    }

    /// Build a set from per-path coordinate lists, `xs[p][i]`, `ys[p][i]`.
    pub fn from_coords(xs: &[Vec<f64>], ys: &[Vec<f64>]) -> Self {
        Self::new(
            xs.iter()
                .zip(ys)
                .map(|(x, y)| Path::from_coords(x, y))
                .collect(),
        )
    }

    pub fn push(&mut self, path: Path) {
        self.paths.push(path);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Path> {
        self.paths.get(index)
    }

    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    pub fn paths_mut(&mut self) -> &mut [Path] {
        &mut self.paths
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Path> {
        self.paths.iter()
    }

    pub fn into_paths(self) -> Vec<Path> {
        self.paths
    }

    /// Keep only paths matching the predicate.
    pub fn retain<F: FnMut(&Path) -> bool>(&mut self, f: F) {
        self.paths.retain(f);
    }

    pub fn point_count(&self) -> usize {
        self.paths.iter().map(|p| p.points.len()).sum()
    }

    pub fn segment_count(&self) -> usize {
        self.paths.iter().map(|p| p.segment_count()).sum()
    }

    /// Bounding box over every point of every path.
    pub fn bounding_box(&self) -> Option<(f64, f64, f64, f64)> {
        bounding_box_of_points(self.paths.iter().flat_map(|p| p.points.iter().copied()))
    }

    /// Largest absolute coordinate in the set (0 for an empty set).
    pub fn magnitude(&self) -> f64 {
        self.paths
            .iter()
            .flat_map(|p| p.points.iter())
            .map(|p| p.magnitude())
            .fold(0.0, f64::max)
    }
}

impl FromIterator<Path> for PathSet {
    fn from_iter<I: IntoIterator<Item = Path>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a Path;
    type IntoIter = std::slice::Iter<'a, Path>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Bounding box of a point sequence, `None` when empty.
pub fn bounding_box_of_points<I>(points: I) -> Option<(f64, f64, f64, f64)>
where
    I: IntoIterator<Item = Point>,
{
    let mut iter = points.into_iter();
    let first = iter.next()?;
    Some(iter.fold(
        (first.x, first.y, first.x, first.y),
        |(min_x, min_y, max_x, max_y), p| {
            (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
        },
    ))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert_eq!(p1.distance(p2), 5.0); // 3-4-5 triangle
    }

    #[test]
    fn cross_product_sign() {
        let x = Point::new(1.0, 0.0);
        let y = Point::new(0.0, 1.0);
        assert_eq!(x.cross(y), 1.0);
        assert_eq!(y.cross(x), -1.0);
        assert_eq!(x.cross(x), 0.0);
    }

    #[test]
    fn lerp_endpoints_exact() {
        let a = Point::new(1.5, -2.0);
        let b = Point::new(7.25, 3.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 0.5), Point::new(4.375, 0.5));
    }

    #[test]
    fn segment_length_and_bbox() {
        let seg = Segment::new(Point::new(3.0, 4.0), Point::new(0.0, 0.0));
        assert_eq!(seg.length(), 5.0);
        assert_eq!(seg.bounding_box(), (0.0, 0.0, 3.0, 4.0));
        assert_eq!(seg.midpoint(), Point::new(1.5, 2.0));
    }

    #[test]
    fn path_segments() {
        let path = Path::from_coords(&[0.0, 10.0, 10.0], &[0.0, 0.0, 5.0]);
        assert!(path.is_valid());
        assert_eq!(path.segment_count(), 2);
        let segs: Vec<Segment> = path.segments().collect();
        assert_eq!(segs[1], Segment::new(Point::new(10.0, 0.0), Point::new(10.0, 5.0)));
        assert_eq!(path.segment(2), None);
        assert_eq!(path.length(), 15.0);
    }

    #[test]
    fn single_point_path_is_invalid() {
        let path = Path::new(vec![Point::new(1.0, 1.0)]);
        assert!(!path.is_valid());
        assert_eq!(path.segment_count(), 0);
        assert_eq!(path.segments().count(), 0);
    }

    #[test]
    fn pathset_bbox_and_counts() {
        let set = PathSet::from_coords(
            &[vec![0.0, 10.0], vec![-5.0, 5.0, 5.0]],
            &[vec![0.0, 0.0], vec![2.0, 2.0, 8.0]],
        );
        assert_eq!(set.len(), 2);
        assert_eq!(set.point_count(), 5);
        assert_eq!(set.segment_count(), 3);
        assert_eq!(set.bounding_box(), Some((-5.0, 0.0, 10.0, 8.0)));
        assert_eq!(set.magnitude(), 10.0);
    }

    #[test]
    fn empty_pathset_bbox() {
        assert_eq!(PathSet::default().bounding_box(), None);
    }

    #[test]
    fn rgb_unpack_and_hex() {
        let c = Rgb::from_packed(0x12ab7f);
        assert_eq!(c, Rgb::new(0x12, 0xab, 0x7f));
        assert_eq!(c.to_hex(), "#12ab7f");
    }
}
