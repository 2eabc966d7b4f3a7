//! Output encoders for planned stitches.
//!
//! CSV and SVG are [`PatternWriter`]s fed by [`StitchSequence::write_to`];
//! JSON serialises the plan directly so each stitch keeps its kind.

use std::fmt::Write as _;

use quick_xml::escape::escape;
use serde::Serialize;

use stitchline::{PathSet, PatternWriter, Point, Rgb, StitchPlan, bounding_box_of_points};

// ============================================================================
// CSV
// ============================================================================

/// `path,x,y` rows, one per stitch.
pub struct CsvWriter {
    out: String,
    path: usize,
    started: bool,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self {
            out: String::from("path,x,y\n"),
            path: 0,
            started: false,
        }
    }

    pub fn finish(self) -> String {
        self.out
    }
}

impl PatternWriter for CsvWriter {
    fn begin_path(&mut self, _color: Option<Rgb>) {
        if self.started {
            self.path += 1;
        }
        self.started = true;
    }

    fn add_stitch_absolute(&mut self, x: f64, y: f64) {
        let _ = writeln!(self.out, "{},{:.4},{:.4}", self.path, x, y);
    }
}

// ============================================================================
// SVG preview
// ============================================================================

/// Renders each run as a polyline with a dot per stitch.
///
/// With `flip_y` set the planned coordinates are y-up, and the preview
/// negates y again so it displays the same way up as the source artwork.
pub struct SvgWriter {
    runs: Vec<(Option<Rgb>, Vec<Point>)>,
    dot_radius: f64,
    flip_y: bool,
}

impl SvgWriter {
    pub fn new(dot_radius: f64, flip_y: bool) -> Self {
        Self {
            runs: Vec::new(),
            dot_radius,
            flip_y,
        }
    }

    pub fn finish(self) -> String {
        let all = self.runs.iter().flat_map(|(_, pts)| pts.iter().copied());
        let viewbox = viewbox_for(all, self.dot_radius * 4.0);

        let mut svg = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{}\">\n",
            viewbox
        );
        for (color, points) in &self.runs {
            let stroke = color.map_or_else(|| "black".to_string(), |c| c.to_hex());
            let _ = writeln!(
                svg,
                "<g stroke=\"{0}\" fill=\"{0}\" stroke-width=\"{1:.3}\">",
                stroke,
                self.dot_radius / 2.0
            );
            let _ = writeln!(svg, "  <polyline fill=\"none\" points=\"{}\"/>", points_attr(points));
            for p in points {
                let _ = writeln!(
                    svg,
                    "  <circle cx=\"{:.4}\" cy=\"{:.4}\" r=\"{:.3}\"/>",
                    p.x, p.y, self.dot_radius
                );
            }
            svg.push_str("</g>\n");
        }
        svg.push_str("</svg>\n");
        svg
    }
}

impl PatternWriter for SvgWriter {
    fn begin_path(&mut self, color: Option<Rgb>) {
        self.runs.push((color, Vec::new()));
    }

    fn add_stitch_absolute(&mut self, x: f64, y: f64) {
        if self.runs.is_empty() {
            self.runs.push((None, Vec::new()));
        }
        if let Some((_, points)) = self.runs.last_mut() {
            let y = if self.flip_y { -y } else { y };
            points.push(Point::new(x, y));
        }
    }
}

/// Polylines for a path set, in the set's own coordinates.
pub fn paths_to_svg(paths: &PathSet) -> String {
    let all = paths.iter().flat_map(|p| p.points.iter().copied());
    let mut svg = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"{}\">\n<g stroke-width=\"0.5\" fill=\"none\">\n",
        viewbox_for(all, 1.0)
    );
    for path in paths {
        let stroke = path.color.map_or_else(|| "black".to_string(), |c| c.to_hex());
        let id = path
            .id
            .as_ref()
            .map(|id| format!(" id=\"{}\"", escape(id.as_str())))
            .unwrap_or_default();
        let _ = writeln!(
            svg,
            "  <polyline{} stroke=\"{}\" points=\"{}\"/>",
            id,
            stroke,
            points_attr(&path.points)
        );
    }
    svg.push_str("</g>\n</svg>\n");
    svg
}

/// Build points string: "x1,y1 x2,y2 x3,y3 ..."
fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{:.4},{:.4}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn viewbox_for<I: IntoIterator<Item = Point>>(points: I, margin: f64) -> String {
    match bounding_box_of_points(points) {
        Some((min_x, min_y, max_x, max_y)) => format!(
            "{:.4} {:.4} {:.4} {:.4}",
            min_x - margin,
            min_y - margin,
            max_x - min_x + 2.0 * margin,
            max_y - min_y + 2.0 * margin
        ),
        None => "0 0 100 100".to_string(),
    }
}

// ============================================================================
// JSON
// ============================================================================

#[derive(Serialize)]
struct JsonStitch {
    x: f64,
    y: f64,
    kind: &'static str,
}

#[derive(Serialize)]
struct JsonPath {
    index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    stitches: Vec<JsonStitch>,
}

#[derive(Serialize)]
struct JsonPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    units: Option<String>,
    pitch: f64,
    stitch_count: usize,
    crossing_count: usize,
    paths: Vec<JsonPath>,
}

/// Serialise a plan with per-stitch kinds.
pub fn plan_to_json(plan: &StitchPlan, pitch: f64, units: Option<&str>) -> serde_json::Result<String> {
    let paths = plan
        .paths
        .iter()
        .map(|p| JsonPath {
            index: p.path_index,
            id: p.id.clone(),
            color: p.color.map(|c| c.to_hex()),
            stitches: p
                .stitches
                .iter()
                .map(|s| JsonStitch {
                    x: s.point.x,
                    y: s.point.y,
                    kind: s.kind.name(),
                })
                .collect(),
        })
        .collect();

    serde_json::to_string_pretty(&JsonPlan {
        units: units.map(str::to_string),
        pitch,
        stitch_count: plan.stitch_count(),
        crossing_count: plan.crossing_count(),
        paths,
    })
}
