//! SVG import - extract stitchable polylines from SVG documents.
//!
//! Uses usvg for complete SVG resolution (CSS, transforms, shapes to paths)
//! then walks the tree to extract every subpath as a [`Path`].
//!
//! ## Curve Flattening
//!
//! SVG paths contain Bézier curves (cubic and quadratic). Stitches run along
//! straight segments, so curves are flattened with lyon_geom at
//! [`ImportOptions::curve_tolerance`].
//!
//! ## Physical size
//!
//! usvg normalises lengths to pixels, so the root element's `width`/`height`
//! strings are read separately with quick-xml and converted to the target
//! unit. The artwork is then scaled so its extent matches that size.

use lyon_geom::{CubicBezierSegment, QuadraticBezierSegment, point};
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use tracing::{debug, warn};
use usvg::tiny_skia_path::PathSegment;

use crate::error::SvgError;
use crate::geometry::{Path, PathSet, Point, Rgb};
use crate::prepare;
use crate::units::{TargetUnit, parse_size};

/// Default tolerance for curve flattening, in user units.
pub const CURVE_TOLERANCE: f32 = 0.1;

/// How an SVG document becomes a [`PathSet`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOptions {
    /// Negate y so the artwork is y-up
    pub flip_y: bool,
    /// Scale to the document's physical size in this unit
    pub target_units: Option<TargetUnit>,
    /// Extra multiplier applied after unit scaling
    pub scale: f64,
    /// Remove successive duplicate points
    pub remove_duplicates: bool,
    /// Max deviation of flattened curves
    pub curve_tolerance: f32,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            flip_y: true,
            target_units: None,
            scale: 1.0,
            remove_duplicates: true,
            curve_tolerance: CURVE_TOLERANCE,
        }
    }
}

/// Extract every stroked or filled subpath from an SVG document.
pub fn extract_paths_from_svg(svg_content: &str, options: &ImportOptions) -> Result<PathSet, SvgError> {
    let tree = usvg::Tree::from_str(svg_content, &usvg::Options::default())
        .map_err(|e| SvgError::Parse(e.to_string()))?;

    let mut paths = PathSet::default();
    extract_from_group(tree.root(), options.curve_tolerance, &mut paths);
    prepare::drop_short_paths(&mut paths);

    if options.flip_y {
        prepare::flip_y(&mut paths);
    }

    if let Some(target) = options.target_units {
        apply_document_size(svg_content, target, &mut paths)?;
    }

    if options.scale != 1.0 {
        prepare::scale(&mut paths, options.scale);
    }

    if options.remove_duplicates {
        prepare::dedupe_consecutive(&mut paths);
        prepare::drop_short_paths(&mut paths);
    }

    debug!(
        paths = paths.len(),
        points = paths.point_count(),
        "imported SVG"
    );

    if paths.is_empty() {
        Err(SvgError::NoPaths)
    } else {
        Ok(paths)
    }
}

/// Scale `paths` so their extent matches the root element's physical size.
fn apply_document_size(svg_content: &str, target: TargetUnit, paths: &mut PathSet) -> Result<(), SvgError> {
    let Some((width, height)) = read_document_size(svg_content) else {
        warn!("SVG has no width/height; coordinates left unscaled");
        return Ok(());
    };

    let width = parse_size(&width, target)?;
    let height = parse_size(&height, target)?;

    match prepare::document_scale_factor(paths, width, height) {
        Some(factor) => prepare::scale(paths, factor),
        None => warn!("artwork has no extent; coordinates left unscaled"),
    }
    Ok(())
}

/// The root `<svg>` element's raw `width` and `height` attributes.
///
/// `None` when either is missing or the document is not well formed.
pub fn read_document_size(svg_content: &str) -> Option<(String, String)> {
    let mut reader = Reader::from_str(svg_content);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() != b"svg" {
                    // The root is always the first element.
                    return None;
                }
                let mut width = None;
                let mut height = None;
                for attr in e.attributes().flatten() {
                    let value = std::str::from_utf8(&attr.value).unwrap_or("").to_string();
                    match attr.key.as_ref() {
                        b"width" => width = Some(value),
                        b"height" => height = Some(value),
                        _ => {}
                    }
                }
                return width.zip(height);
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
        buf.clear();
    }
}

/// Recursively extract paths from a usvg Group.
fn extract_from_group(group: &usvg::Group, tolerance: f32, paths: &mut PathSet) {
    for child in group.children() {
        match child {
            usvg::Node::Group(group) => extract_from_group(group, tolerance, paths),
            usvg::Node::Path(path) => {
                for subpath in path_to_polylines(path, tolerance) {
                    paths.push(subpath);
                }
            }
            // Text is converted to paths by usvg only with fonts loaded; images are ignored.
            _ => {}
        }
    }
}

fn stroke_color(path: &usvg::Path) -> Option<Rgb> {
    match path.stroke()?.paint() {
        usvg::Paint::Color(c) => Some(Rgb::new(c.red, c.green, c.blue)),
        _ => None,
    }
}

/// Split a usvg path into one polyline per subpath, in absolute coordinates.
fn path_to_polylines(path: &usvg::Path, tolerance: f32) -> Vec<Path> {
    let color = stroke_color(path);
    let id = if path.id().is_empty() {
        None
    } else {
        Some(path.id().to_string())
    };
    let ts = path.abs_transform();
    let to_abs = |x: f32, y: f32| {
        let (x, y) = (x as f64, y as f64);
        Point::new(
            ts.sx as f64 * x + ts.kx as f64 * y + ts.tx as f64,
            ts.ky as f64 * x + ts.sy as f64 * y + ts.ty as f64,
        )
    };

    let mut polylines = Vec::new();
    let mut current: Vec<Point> = Vec::new();
    let mut subpath_start = (0.0f32, 0.0f32);
    let mut last = (0.0f32, 0.0f32);

    for segment in path.data().segments() {
        match segment {
            PathSegment::MoveTo(p) => {
                if !current.is_empty() {
                    polylines.push(std::mem::take(&mut current));
                }
                current.push(to_abs(p.x, p.y));
                subpath_start = (p.x, p.y);
                last = (p.x, p.y);
            }
            PathSegment::LineTo(p) => {
                current.push(to_abs(p.x, p.y));
                last = (p.x, p.y);
            }
            PathSegment::QuadTo(ctrl, p) => {
                let curve = QuadraticBezierSegment {
                    from: point(last.0, last.1),
                    ctrl: point(ctrl.x, ctrl.y),
                    to: point(p.x, p.y),
                };
                curve.for_each_flattened(tolerance, &mut |line| {
                    current.push(to_abs(line.to.x, line.to.y));
                });
                last = (p.x, p.y);
            }
            PathSegment::CubicTo(ctrl1, ctrl2, p) => {
                let curve = CubicBezierSegment {
                    from: point(last.0, last.1),
                    ctrl1: point(ctrl1.x, ctrl1.y),
                    ctrl2: point(ctrl2.x, ctrl2.y),
                    to: point(p.x, p.y),
                };
                curve.for_each_flattened(tolerance, &mut |line| {
                    current.push(to_abs(line.to.x, line.to.y));
                });
                last = (p.x, p.y);
            }
            PathSegment::Close => {
                if last != subpath_start {
                    current.push(to_abs(subpath_start.0, subpath_start.1));
                }
                last = subpath_start;
            }
        }
    }
    if !current.is_empty() {
        polylines.push(current);
    }

    polylines
        .into_iter()
        .map(|points| Path::with_metadata(points, color, id.clone()))
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn no_flip() -> ImportOptions {
        ImportOptions {
            flip_y: false,
            ..ImportOptions::default()
        }
    }

    #[test]
    fn parse_polyline() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
                <polyline points="0,0 10,0 10,10" stroke="black" fill="none"/>
            </svg>
        "#;

        let paths = extract_paths_from_svg(svg, &ImportOptions::default()).unwrap();
        assert_eq!(paths.len(), 1);
        let pts = &paths.get(0).unwrap().points;
        assert_eq!(pts.len(), 3);
        assert_relative_eq!(pts[2].x, 10.0);
        assert_relative_eq!(pts[2].y, -10.0);
    }

    #[test]
    fn subpaths_are_separate_paths() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
                <path d="M 0,0 L 10,0 M 0,5 L 10,5" stroke="black" fill="none"/>
            </svg>
        "#;

        let paths = extract_paths_from_svg(svg, &no_flip()).unwrap();
        assert_eq!(paths.len(), 2);
        assert_relative_eq!(paths.get(1).unwrap().points[0].y, 5.0);
    }

    #[test]
    fn close_returns_to_start() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
                <path d="M 0,0 L 10,0 L 10,10 Z" stroke="black" fill="none"/>
            </svg>
        "#;

        let paths = extract_paths_from_svg(svg, &no_flip()).unwrap();
        let path = paths.get(0).unwrap();
        assert_eq!(path.points.len(), 4);
        assert_eq!(path.first(), path.last());
    }

    #[test]
    fn group_transform_is_applied() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
                <g transform="translate(5,0)">
                    <g>
                        <polyline points="0,0 10,0" stroke="black" fill="none"/>
                    </g>
                </g>
            </svg>
        "#;

        let paths = extract_paths_from_svg(svg, &no_flip()).unwrap();
        let pts = &paths.get(0).unwrap().points;
        assert_relative_eq!(pts[0].x, 5.0, epsilon = 1e-4);
        assert_relative_eq!(pts[1].x, 15.0, epsilon = 1e-4);
    }

    #[test]
    fn stroke_color_and_id() {
        let svg = r##"
            <svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
                <polyline id="outline" points="0,0 10,0" stroke="#ff8000" fill="none"/>
            </svg>
        "##;

        let paths = extract_paths_from_svg(svg, &no_flip()).unwrap();
        let path = paths.get(0).unwrap();
        assert_eq!(path.color, Some(Rgb::new(255, 128, 0)));
        assert_eq!(path.id.as_deref(), Some("outline"));
    }

    #[test]
    fn curves_are_flattened() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
                <circle cx="50" cy="50" r="40" stroke="black" fill="none"/>
            </svg>
        "#;

        let paths = extract_paths_from_svg(svg, &no_flip()).unwrap();
        assert!(
            paths.get(0).unwrap().points.len() > 20,
            "circle should flatten into many points"
        );
    }

    #[test]
    fn scaled_to_document_size() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="20mm" height="20mm" viewBox="0 0 10 10">
                <polyline points="0,0 10,10" stroke="black" fill="none"/>
            </svg>
        "#;

        let options = ImportOptions {
            target_units: Some(TargetUnit::Millimeters),
            ..ImportOptions::default()
        };
        let paths = extract_paths_from_svg(svg, &options).unwrap();
        let (min_x, min_y, max_x, max_y) = paths.bounding_box().unwrap();
        assert_relative_eq!(max_x - min_x, 20.0, epsilon = 1e-3);
        assert_relative_eq!(max_y - min_y, 20.0, epsilon = 1e-3);

        let inches = ImportOptions {
            target_units: Some(TargetUnit::Centimeters),
            scale: 2.0,
            ..ImportOptions::default()
        };
        let paths = extract_paths_from_svg(svg, &inches).unwrap();
        let (min_x, _, max_x, _) = paths.bounding_box().unwrap();
        assert_relative_eq!(max_x - min_x, 4.0, epsilon = 1e-3);
    }

    #[test]
    fn relative_document_size_is_error() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" width="100%" height="100%" viewBox="0 0 10 10">
                <polyline points="0,0 10,10" stroke="black" fill="none"/>
            </svg>
        "#;

        let options = ImportOptions {
            target_units: Some(TargetUnit::Millimeters),
            ..ImportOptions::default()
        };
        assert!(matches!(extract_paths_from_svg(svg, &options), Err(SvgError::Size(_))));
    }

    #[test]
    fn missing_document_size_leaves_coordinates() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
                <polyline points="0,0 10,0" stroke="black" fill="none"/>
            </svg>
        "#;

        let options = ImportOptions {
            target_units: Some(TargetUnit::Millimeters),
            flip_y: false,
            ..ImportOptions::default()
        };
        let paths = extract_paths_from_svg(svg, &options).unwrap();
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn read_size_attributes() {
        let svg = r#"<?xml version="1.0"?><svg xmlns="http://www.w3.org/2000/svg" width="4in" height="3in"/>"#;
        assert_eq!(
            read_document_size(svg),
            Some(("4in".to_string(), "3in".to_string()))
        );
        assert_eq!(read_document_size(r#"<svg width="4in"/>"#), None);
    }

    #[test]
    fn no_paths_error() {
        let svg = r#"
            <svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 100">
            </svg>
        "#;

        let result = extract_paths_from_svg(svg, &ImportOptions::default());
        assert!(matches!(result, Err(SvgError::NoPaths)));
    }

    #[test]
    fn invalid_document_is_parse_error() {
        let result = extract_paths_from_svg("not svg", &ImportOptions::default());
        assert!(matches!(result, Err(SvgError::Parse(_))));
    }
}
