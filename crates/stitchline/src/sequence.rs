//! Stitch sequences and the hand-off to pattern writers.
//!
//! A [`PatternWriter`] is anything that accepts absolute stitch coordinates in
//! order - an embroidery format encoder, a JSON dump, an SVG preview.
//! [`StitchSequenceBuilder`] is itself a writer: it collects runs so a plan can
//! be inspected, measured and replayed into any other writer later.

use crate::geometry::{Point, Rgb, bounding_box_of_points};
use crate::plan::{PathStitches, StitchPlan};

/// Receives stitches in emission order.
pub trait PatternWriter {
    /// Called before the first stitch of each path.
    fn begin_path(&mut self, _color: Option<Rgb>) {}

    /// Append a stitch at absolute coordinates.
    fn add_stitch_absolute(&mut self, x: f64, y: f64);

    /// Called after the last stitch of each path.
    fn end_path(&mut self) {}
}

/// Stitches of one path, as handed to a writer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StitchRun {
    pub color: Option<Rgb>,
    pub points: Vec<Point>,
}

impl StitchRun {
    /// Length of the thread laid by this run.
    pub fn length(&self) -> f64 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

/// Immutable, ordered stitch runs ready to be written out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StitchSequence {
    runs: Vec<StitchRun>,
}

impl StitchSequence {
    pub fn runs(&self) -> &[StitchRun] {
        &self.runs
    }

    pub fn stitch_count(&self) -> usize {
        self.runs.iter().map(|r| r.points.len()).sum()
    }

    /// Every stitch, flattened in emission order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.runs.iter().flat_map(|r| r.points.iter().copied())
    }

    /// Bounding box as (min_x, min_y, max_x, max_y).
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        bounding_box_of_points(self.points())
    }

    /// Longest distance between consecutive stitches within a run.
    pub fn longest_stitch(&self) -> f64 {
        self.runs
            .iter()
            .flat_map(|r| r.points.windows(2).map(|w| w[0].distance(w[1])))
            .fold(0.0, f64::max)
    }

    /// Total thread length across runs (jumps between runs excluded).
    pub fn thread_length(&self) -> f64 {
        self.runs.iter().map(|r| r.length()).sum()
    }

    /// Replay every run into `writer`, preserving order.
    pub fn write_to<W: PatternWriter + ?Sized>(&self, writer: &mut W) {
        for run in &self.runs {
            writer.begin_path(run.color);
            for p in &run.points {
                writer.add_stitch_absolute(p.x, p.y);
            }
            writer.end_path();
        }
    }
}

/// Accumulates per-path stitch runs.
#[derive(Debug, Default)]
pub struct StitchSequenceBuilder {
    runs: Vec<StitchRun>,
    open: Option<StitchRun>,
}

impl StitchSequenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one planned path as a run.
    pub fn push_path(&mut self, path: &PathStitches) -> &mut Self {
        self.close_open();
        self.runs.push(StitchRun {
            color: path.color,
            points: path.points().collect(),
        });
        self
    }

    /// Append every path of a plan, in order.
    pub fn push_plan(&mut self, plan: &StitchPlan) -> &mut Self {
        for path in &plan.paths {
            self.push_path(path);
        }
        self
    }

    fn close_open(&mut self) {
        if let Some(run) = self.open.take() {
            self.runs.push(run);
        }
    }

    /// Finish and return the collected sequence.
    pub fn build(mut self) -> StitchSequence {
        self.close_open();
        StitchSequence { runs: self.runs }
    }
}

impl PatternWriter for StitchSequenceBuilder {
    fn begin_path(&mut self, color: Option<Rgb>) {
        self.close_open();
        self.open = Some(StitchRun {
            color,
            points: Vec::new(),
        });
    }

    fn add_stitch_absolute(&mut self, x: f64, y: f64) {
        self.open
            .get_or_insert_with(StitchRun::default)
            .points
            .push(Point::new(x, y));
    }

    fn end_path(&mut self) {
        self.close_open();
    }
}

/// Collect a whole plan into a sequence.
pub fn sequence_from_plan(plan: &StitchPlan) -> StitchSequence {
    let mut builder = StitchSequenceBuilder::new();
    builder.push_plan(plan);
    builder.build()
}
